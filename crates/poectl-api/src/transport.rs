// HTTP client construction.
//
// The platform probe needs a throwaway client; the legacy session needs
// one that keeps the login cookie. Both share TLS and timeout settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::error::Error;

const USER_AGENT: &str = concat!("poectl/", env!("CARGO_PKG_VERSION"));

/// How the controller's certificate is checked.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// System trust store.
    System,
    /// Trust the CA in this PEM file in addition to the system store.
    CustomCa(PathBuf),
    /// Accept any certificate. Local controllers ship self-signed ones.
    DangerAcceptInvalid,
}

impl TlsMode {
    fn configure(&self, builder: ClientBuilder) -> Result<ClientBuilder, Error> {
        Ok(match self {
            Self::System => builder,
            Self::CustomCa(path) => builder.add_root_certificate(load_ca(path)?),
            Self::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        })
    }
}

fn load_ca(path: &Path) -> Result<reqwest::Certificate, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("cannot read CA certificate {}: {e}", path.display())))?;
    reqwest::Certificate::from_pem(&pem)
        .map_err(|e| Error::Tls(format!("{} is not a PEM certificate: {e}", path.display())))
}

/// TLS and timeout settings shared by every request to one controller.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Client without a cookie store, for one-off probes.
    pub fn probe_client(&self) -> Result<reqwest::Client, Error> {
        self.build(false)
    }

    /// Client that keeps session cookies between requests.
    pub fn session_client(&self) -> Result<reqwest::Client, Error> {
        self.build(true)
    }

    fn build(&self, cookies: bool) -> Result<reqwest::Client, Error> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .cookie_store(cookies);

        self.tls
            .configure(builder)?
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_accepts_self_signed() {
        let cfg = TransportConfig::default();
        assert!(matches!(cfg.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_ca_file_names_the_path() {
        let cfg = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/poectl-ca.pem")),
            ..TransportConfig::default()
        };
        match cfg.session_client() {
            Err(Error::Tls(msg)) => assert!(msg.contains("/nonexistent/poectl-ca.pem"), "{msg}"),
            other => panic!("expected Tls error, got: {other:?}"),
        }
    }

    #[test]
    fn both_client_kinds_build() {
        let cfg = TransportConfig::default();
        assert!(cfg.probe_client().is_ok());
        assert!(cfg.session_client().is_ok());
    }
}
