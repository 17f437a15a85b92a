// ── Core error types ──
//
// User-facing errors from poectl-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<poectl_api::Error>`
// impl translates transport-layer errors into domain variants.
//
// Only run-level failures live here. Per-port problems (missing port,
// no PoE capability, rejected apply, slow convergence) are outcomes in
// the reconciliation report, not errors.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Controller request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("Device {identifier} has no port table (not a switch?)")]
    NotASwitch { identifier: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation rejected by controller: {message}")]
    Rejected { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The controller could not be reached (network, TLS, timeout).
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Timeout)
    }

    /// The controller refused our credentials or session.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<poectl_api::Error> for CoreError {
    fn from(err: poectl_api::Error) -> Self {
        let status = err.status();
        let unreachable = err.is_unreachable();
        match err {
            poectl_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            poectl_api::Error::Transport(ref e) if e.is_timeout() => CoreError::Timeout,
            poectl_api::Error::Transport(ref e) if unreachable => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            poectl_api::Error::Transport(ref e) => CoreError::Api {
                message: e.to_string(),
                status,
            },
            poectl_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            poectl_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            poectl_api::Error::LegacyApi { message, status } => CoreError::Api { message, status },
            poectl_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
