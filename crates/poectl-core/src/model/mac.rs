// ── Hardware address ──

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Normalize a MAC address from any common format, without validation.
    ///
    /// Colon, dash, and dot separators are stripped. Twelve hex digits are
    /// re-joined with colons; anything else is kept lowercased as-is so
    /// comparisons against controller data still behave.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref();
        let digits = hex_digits(raw);
        if digits.len() == 12 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            Self(join_octets(&digits))
        } else {
            Self(raw.to_lowercase())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn hex_digits(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ':' | '-' | '.'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn join_octets(digits: &str) -> String {
    let mut out = String::with_capacity(17);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 2 == 0 {
            out.push(':');
        }
        out.push(c);
    }
    out
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = CoreError;

    /// Strict parse: exactly twelve hex digits, optionally separated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = hex_digits(s.trim());
        if digits.len() != 12 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::ValidationFailed {
                message: format!("'{s}' is not a MAC address"),
            });
        }
        Ok(Self(join_octets(&digits)))
    }
}
