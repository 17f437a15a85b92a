// ── Controller session ──
//
// An authenticated legacy-API session, passed explicitly into the
// reconciliation engine as both the read and the write collaborator.

use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

use poectl_api::legacy::models::LegacyDevice;
use poectl_api::transport::{TlsMode, TransportConfig};
use poectl_api::LegacyClient;
use poectl_api::legacy::merge_poe_overrides;

use crate::config::{ControllerConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{DeviceSnapshot, MacAddress};
use crate::reconcile::{ChangeSet, PortModeWriter, PortStateReader};

/// A logged-in controller session scoped to one site.
pub struct ControllerSession {
    client: LegacyClient,
}

impl ControllerSession {
    /// Detect the platform, build the client and log in.
    pub async fn connect(config: &ControllerConfig) -> Result<Self, CoreError> {
        let transport = build_transport(config);

        let platform = LegacyClient::detect_platform(&config.url, &transport)
            .await
            .map_err(|e| connect_error(config, e))?;
        debug!(?platform, "detected controller platform");

        let client = LegacyClient::new(
            config.url.clone(),
            config.site.clone(),
            platform,
            &transport,
        )?;

        if config.password.expose_secret().is_empty() {
            return Err(CoreError::AuthenticationFailed {
                message: "no password configured".into(),
            });
        }
        client.login(&config.username, &config.password).await?;
        info!(url = %config.url, site = %config.site, "controller session established");

        Ok(Self { client })
    }

    /// End the session. Failures are logged, never returned.
    pub async fn disconnect(self) {
        match self.client.logout().await {
            Ok(()) => {}
            Err(e) if e.is_auth_expired() => debug!("session already expired at logout"),
            Err(e) => warn!(error = %e, "logout failed"),
        }
    }

    /// Fetch the raw device record by MAC.
    async fn find_device(&self, mac: &MacAddress) -> Result<LegacyDevice, CoreError> {
        let device = self.client.get_device(mac.as_str()).await?;
        device
            .filter(|d| MacAddress::new(&d.mac) == *mac)
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: mac.to_string(),
            })
    }

    /// Current port states of a switch.
    pub async fn device_snapshot(&self, mac: &MacAddress) -> Result<DeviceSnapshot, CoreError> {
        let device = self.find_device(mac).await?;
        DeviceSnapshot::try_from(device)
    }
}

impl PortStateReader for ControllerSession {
    async fn fetch_port_states(&self, device: &MacAddress) -> Result<DeviceSnapshot, CoreError> {
        self.device_snapshot(device).await
    }
}

impl PortModeWriter for ControllerSession {
    async fn apply_port_modes(
        &self,
        device: &MacAddress,
        changes: &ChangeSet,
    ) -> Result<(), CoreError> {
        let raw = self.find_device(device).await?;
        let targets: Vec<(u32, &str)> = changes.iter().map(|(i, m)| (i, m.as_wire())).collect();
        let overrides = merge_poe_overrides(&raw, &targets);

        self.client
            .set_port_overrides(&raw.id, &overrides)
            .await
            .map_err(|e| match CoreError::from(e) {
                CoreError::Api { message, .. } => CoreError::Rejected { message },
                other => other,
            })
    }
}

fn build_transport(config: &ControllerConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

/// Platform probe failures mean the controller is not reachable at all.
fn connect_error(config: &ControllerConfig, err: poectl_api::Error) -> CoreError {
    match CoreError::from(err) {
        CoreError::Api { message, .. } | CoreError::Internal(message) => {
            CoreError::ConnectionFailed {
                url: config.url.to_string(),
                reason: message,
            }
        }
        CoreError::ConnectionFailed { reason, .. } => CoreError::ConnectionFailed {
            url: config.url.to_string(),
            reason,
        },
        other => other,
    }
}
