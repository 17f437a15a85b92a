// ── API-to-domain type conversions ──
//
// Bridges raw `poectl_api` response types into `poectl_core::model`
// types. Normalizes MACs, decides PoE capability, and maps free-form
// mode strings onto the closed `PoeMode` enum.

use tracing::debug;

use poectl_api::legacy::models::{LegacyDevice, LegacyPort};

use crate::error::CoreError;
use crate::model::{DeviceSnapshot, MacAddress, PoeMode, PortSnapshot};

/// A port can source power when the controller flags it `port_poe` or
/// reports any capability bits.
fn is_poe_capable(port: &LegacyPort) -> bool {
    port.port_poe.unwrap_or(false) || port.poe_caps.unwrap_or(0) != 0
}

/// Convert one `port_table` entry. Entries without an index are dropped.
fn port_snapshot(port: &LegacyPort) -> Option<PortSnapshot> {
    let index = port.port_idx?;
    let capable = is_poe_capable(port);
    let mode = PoeMode::from_wire(port.poe_mode.as_deref());
    if capable && mode == PoeMode::Unsupported {
        debug!(port = index, raw = ?port.poe_mode, "unrecognized PoE mode on capable port");
    }
    let snapshot = PortSnapshot::new(index, mode, capable);
    Some(match &port.name {
        Some(name) => snapshot.with_label(name.clone()),
        None => snapshot,
    })
}

impl TryFrom<LegacyDevice> for DeviceSnapshot {
    type Error = CoreError;

    /// Fails with [`CoreError::NotASwitch`] when the device has no port table.
    fn try_from(d: LegacyDevice) -> Result<Self, Self::Error> {
        let mac = MacAddress::new(&d.mac);
        let table = match d.port_table {
            Some(ref table) if !table.is_empty() => table,
            _ => {
                return Err(CoreError::NotASwitch {
                    identifier: mac.to_string(),
                });
            }
        };

        let mut ports: Vec<PortSnapshot> = table.iter().filter_map(port_snapshot).collect();
        ports.sort_by_key(|p| p.index);

        Ok(DeviceSnapshot {
            id: d.id,
            mac,
            name: d.name,
            model: d.model,
            ports,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy(value: serde_json::Value) -> LegacyDevice {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn switch_ports_convert_and_sort() {
        let snap = DeviceSnapshot::try_from(legacy(json!({
            "_id": "sw",
            "mac": "AA-BB-CC-DD-EE-FF",
            "type": "usw",
            "name": "Rack",
            "port_table": [
                { "port_idx": 2, "poe_mode": "off", "poe_caps": 7 },
                { "port_idx": 1, "poe_mode": "auto", "port_poe": true, "name": "AP" },
                { "port_idx": 3, "poe_mode": "pasv24", "poe_caps": 1 }
            ]
        })))
        .unwrap();

        assert_eq!(snap.mac.as_str(), "aa:bb:cc:dd:ee:ff");
        let idx: Vec<u32> = snap.ports.iter().map(|p| p.index).collect();
        assert_eq!(idx, vec![1, 2, 3]);
        assert_eq!(snap.port(1).unwrap().label.as_deref(), Some("AP"));
        assert_eq!(snap.port(2).unwrap().mode, PoeMode::Off);
        assert_eq!(snap.port(3).unwrap().mode, PoeMode::PassiveHighVoltage);
    }

    #[test]
    fn zero_caps_port_is_not_capable() {
        let snap = DeviceSnapshot::try_from(legacy(json!({
            "_id": "sw",
            "mac": "aa:bb:cc:dd:ee:ff",
            "port_table": [
                { "port_idx": 9, "poe_mode": "off", "poe_caps": 0, "port_poe": false }
            ]
        })))
        .unwrap();

        let port = snap.port(9).unwrap();
        assert!(!port.poe_capable);
        assert_eq!(port.mode, PoeMode::Unsupported);
    }

    #[test]
    fn capable_port_with_unknown_mode_is_unsupported_but_capable() {
        let snap = DeviceSnapshot::try_from(legacy(json!({
            "_id": "sw",
            "mac": "aa:bb:cc:dd:ee:ff",
            "port_table": [ { "port_idx": 4, "poe_caps": 3 } ]
        })))
        .unwrap();

        let port = snap.port(4).unwrap();
        assert!(port.poe_capable);
        assert_eq!(port.mode, PoeMode::Unsupported);
    }

    #[test]
    fn device_without_ports_is_not_a_switch() {
        let err = DeviceSnapshot::try_from(legacy(json!({
            "_id": "ap",
            "mac": "aa:bb:cc:dd:ee:01",
            "type": "uap"
        })))
        .unwrap_err();
        assert!(matches!(err, CoreError::NotASwitch { .. }));
    }
}
