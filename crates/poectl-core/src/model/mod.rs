// ── Domain model ──
//
// Canonical types the reconciliation engine works on. Raw API shapes are
// converted into these in `crate::convert`.

pub mod device;
pub mod mac;
pub mod poe;

pub use device::{DeviceSnapshot, PortSnapshot};
pub use mac::MacAddress;
pub use poe::{DesiredState, PoeMode};
