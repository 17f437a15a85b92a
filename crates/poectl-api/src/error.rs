use thiserror::Error;

/// Top-level error type for the `poectl-api` crate.
///
/// Covers the failure modes of the legacy API surface: authentication,
/// transport, envelope-level rejections, and payload decoding.
/// `poectl-core` maps these into domain diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or the session was rejected (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Legacy API ──────────────────────────────────────────────────
    /// Error from the legacy API (parsed from the `{meta: {rc, msg}}` envelope,
    /// or a non-success HTTP status).
    #[error("Legacy API error: {message}")]
    LegacyApi {
        message: String,
        status: Option<u16>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the controller rejected our credentials or session.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if the controller could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            Self::Tls(_) => true,
            _ => false,
        }
    }

    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::LegacyApi { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_is_auth_expired() {
        let err = Error::Authentication {
            message: "bad password".into(),
        };
        assert!(err.is_auth_expired());
        assert!(!err.is_unreachable());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn legacy_error_carries_status() {
        let err = Error::LegacyApi {
            message: "insufficient permissions".into(),
            status: Some(403),
        };
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn tls_error_counts_as_unreachable() {
        assert!(Error::Tls("handshake".into()).is_unreachable());
    }
}
