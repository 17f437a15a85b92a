// Legacy API device endpoints
//
// Device reads via stat/device and port configuration writes via
// rest/device/{id}. PoE modes are written as `port_overrides` entries.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::legacy::client::LegacyClient;
use crate::legacy::models::{LegacyDevice, PortOverride};

impl LegacyClient {
    /// Get a single device by MAC address.
    ///
    /// `POST /api/s/{site}/stat/device` with `{"macs": [...]}`.
    /// Returns `None` if no device matches.
    pub async fn get_device(&self, mac: &str) -> Result<Option<LegacyDevice>, Error> {
        let url = self.site_url("stat/device")?;
        debug!(mac, "fetching device");
        let body = json!({ "macs": [mac.to_lowercase()] });
        let devices: Vec<LegacyDevice> = self.post(url, &body).await?;
        Ok(devices.into_iter().next())
    }

    /// Replace a device's port overrides in one request.
    ///
    /// `PUT /api/s/{site}/rest/device/{device_id}` with
    /// `{"port_overrides": [...]}`. The controller treats the array as the
    /// complete override set, so callers should start from the device's
    /// current overrides (see [`merge_poe_overrides`]).
    pub async fn set_port_overrides(
        &self,
        device_id: &str,
        overrides: &[PortOverride],
    ) -> Result<(), Error> {
        let url = self.site_url(&format!("rest/device/{device_id}"))?;
        debug!(device_id, count = overrides.len(), "updating port overrides");
        let _: Vec<serde_json::Value> = self
            .put(url, &json!({ "port_overrides": overrides }))
            .await?;
        Ok(())
    }
}

/// Fold PoE mode changes into a device's existing port overrides.
///
/// An existing override for the port gets its `poe_mode` replaced; other
/// ports get a new entry, carrying the port's `portconf_id` when the
/// port table has one. Overrides for untouched ports pass through as-is.
pub fn merge_poe_overrides(device: &LegacyDevice, targets: &[(u32, &str)]) -> Vec<PortOverride> {
    let mut overrides = device.port_overrides.clone();

    for &(port_idx, mode) in targets {
        if let Some(existing) = overrides.iter_mut().find(|o| o.port_idx == port_idx) {
            existing.poe_mode = Some(mode.to_owned());
            continue;
        }

        let portconf_id = device
            .port_table
            .iter()
            .flatten()
            .find(|p| p.port_idx == Some(port_idx))
            .and_then(|p| p.portconf_id.clone());

        overrides.push(PortOverride {
            port_idx,
            poe_mode: Some(mode.to_owned()),
            portconf_id,
            extra: serde_json::Map::new(),
        });
    }

    overrides
}
