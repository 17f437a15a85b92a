// ── Device domain types ──

use serde::{Deserialize, Serialize};

use super::mac::MacAddress;
use super::poe::PoeMode;

/// One switch port as seen at a single point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSnapshot {
    /// 1-based port index, unique within the device.
    pub index: u32,
    /// Operator-assigned name. Informational only.
    pub label: Option<String>,
    pub poe_capable: bool,
    /// Current mode; always `Unsupported` when the port is not PoE-capable.
    pub mode: PoeMode,
}

impl PortSnapshot {
    pub fn new(index: u32, mode: PoeMode, poe_capable: bool) -> Self {
        Self {
            index,
            label: None,
            poe_capable,
            mode: if poe_capable { mode } else { PoeMode::Unsupported },
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label for display, falling back to `Port N`.
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("Port {}", self.index))
    }
}

/// A switch and its ports, as read from the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    /// Controller-side object id (used for configuration writes).
    pub id: String,
    pub mac: MacAddress,
    pub name: Option<String>,
    pub model: Option<String>,
    /// Ordered by port index.
    pub ports: Vec<PortSnapshot>,
}

impl DeviceSnapshot {
    pub fn port(&self, index: u32) -> Option<&PortSnapshot> {
        self.ports.iter().find(|p| p.index == index)
    }
}
