// Legacy API response types
//
// Models for the UniFi controller's legacy JSON API. All responses are wrapped
// in the `LegacyResponse<T>` envelope. Fields use `#[serde(default)]` liberally
// because the API is inconsistent about field presence across firmware versions.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard UniFi legacy API response envelope.
///
/// Every legacy endpoint wraps its payload:
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct LegacyResponse<T> {
    pub meta: Meta,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Metadata from the legacy envelope. `rc` == `"ok"` means success.
#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

// ── Device ───────────────────────────────────────────────────────────

/// Device object from `stat/device`.
///
/// The legacy API returns 100+ fields per device. Only the identity and
/// port configuration fields are modeled; everything else lands in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyDevice {
    #[serde(rename = "_id")]
    pub id: String,
    pub mac: String,
    #[serde(rename = "type", default)]
    pub device_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// 0=offline, 1=online, 2=pending, 4=upgrading, 5=provisioning
    #[serde(default)]
    pub state: i32,
    /// Live per-port status. Absent on non-switching devices.
    #[serde(default)]
    pub port_table: Option<Vec<LegacyPort>>,
    /// Per-port configuration overrides, as stored on the controller.
    #[serde(default)]
    pub port_overrides: Vec<PortOverride>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One entry of a device's `port_table`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyPort {
    #[serde(default)]
    pub port_idx: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    /// `off`, `auto`, `pasv24`, `passthrough` -- absent on non-PoE ports.
    #[serde(default)]
    pub poe_mode: Option<String>,
    /// Capability bitmask; 0 means the port cannot source power.
    #[serde(default)]
    pub poe_caps: Option<u32>,
    #[serde(default)]
    pub port_poe: Option<bool>,
    #[serde(default)]
    pub poe_enable: Option<bool>,
    #[serde(default)]
    pub portconf_id: Option<String>,
    #[serde(default)]
    pub up: Option<bool>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One entry of a device's `port_overrides` array.
///
/// Unknown keys are carried through `extra` so a read-modify-write cycle
/// never drops configuration the controller stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortOverride {
    pub port_idx: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poe_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portconf_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
