// ── PoE modes ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Power delivery mode of a switch port.
///
/// Closed set: anything the controller reports outside the known modes,
/// or a missing mode on a capable port, is [`PoeMode::Unsupported`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum PoeMode {
    #[strum(to_string = "off")]
    Off,
    /// Negotiated 802.3af/at/bt power.
    #[strum(to_string = "auto")]
    Auto,
    /// Fixed 24V passive output.
    #[serde(rename = "pasv24")]
    #[strum(to_string = "pasv24", serialize = "24v")]
    PassiveHighVoltage,
    #[strum(to_string = "passthrough")]
    Passthrough,
    #[strum(to_string = "unsupported")]
    Unsupported,
}

impl PoeMode {
    /// Map a raw controller mode string. Unknown or absent → `Unsupported`.
    pub fn from_wire(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or(Self::Unsupported)
    }

    /// The controller's string for this mode.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Auto => "auto",
            Self::PassiveHighVoltage => "pasv24",
            Self::Passthrough => "passthrough",
            Self::Unsupported => "unsupported",
        }
    }
}

/// The operator's requested PoE state for a set of ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum DesiredState {
    #[strum(
        to_string = "enable",
        serialize = "on",
        serialize = "enabled",
        serialize = "true",
        serialize = "1"
    )]
    Enable,
    #[strum(
        to_string = "disable",
        serialize = "off",
        serialize = "disabled",
        serialize = "false",
        serialize = "0"
    )]
    Disable,
}

impl DesiredState {
    /// The port mode that realizes this state.
    pub fn target_mode(self) -> PoeMode {
        match self {
            Self::Enable => PoeMode::Auto,
            Self::Disable => PoeMode::Off,
        }
    }
}

impl From<bool> for DesiredState {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Enable } else { Self::Disable }
    }
}
