// ── Runtime connection configuration ──
//
// These types describe *how* to connect to a UniFi controller.
// They carry credential data and connection tuning, but never touch disk.
// The CLI constructs a `ControllerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::reconcile::VerifyPolicy;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs). Default for local controllers.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single controller.
///
/// Built by the CLI, passed to [`ControllerSession::connect`](crate::ControllerSession::connect).
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller URL (e.g., `https://192.168.1.1`).
    pub url: Url,
    /// Local controller account used for the legacy session login.
    pub username: String,
    pub password: SecretString,
    /// Site to operate on (defaults to "default").
    pub site: String,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout, applied by the HTTP transport to every call.
    pub timeout: Duration,
    /// Post-apply convergence checks.
    pub verify: VerifyPolicy,
}

impl ControllerConfig {
    /// Config with the usual defaults: site `default`, self-signed TLS
    /// accepted, 30 second timeout, default verification policy.
    pub fn new(url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            username: username.into(),
            password,
            site: "default".into(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            verify: VerifyPolicy::default(),
        }
    }
}
