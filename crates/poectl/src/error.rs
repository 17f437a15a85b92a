//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use poectl_core::CoreError;

/// Process exit codes. Success is 0.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(poectl::connection_failed),
        help(
            "Check that the controller is running and accessible.\n\
             Self-signed certificate? Try --insecure (-k) or set ca_cert in your profile."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Controller did not respond in time")]
    #[diagnostic(
        code(poectl::timeout),
        help("Increase the timeout with --timeout or check controller responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed for profile '{profile}': {reason}")]
    #[diagnostic(
        code(poectl::auth_failed),
        help(
            "Verify the username and password of a local controller account.\n\
             Cloud/SSO accounts cannot log in to the local API."
        )
    )]
    AuthFailed { profile: String, reason: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(poectl::no_credentials),
        help(
            "Set username/password in the profile, store the password in the system\n\
             keyring (service 'poectl', account '{profile}/password'), or export\n\
             POECTL_USERNAME and POECTL_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Switch '{identifier}' not found on this site")]
    #[diagnostic(
        code(poectl::not_found),
        help("Check the MAC address and the --site the switch is adopted in.")
    )]
    DeviceNotFound { identifier: String },

    #[error("Device '{identifier}' has no switch ports")]
    #[diagnostic(
        code(poectl::not_a_switch),
        help("PoE can only be controlled on UniFi switches.")
    )]
    NotASwitch { identifier: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Controller error: {message}")]
    #[diagnostic(code(poectl::api_error))]
    ApiError { message: String },

    // ── Reconciliation ───────────────────────────────────────────────
    #[error("{unsettled} of {total} ports did not reach the requested state")]
    #[diagnostic(
        code(poectl::incomplete),
        help("See the per-port outcomes above. Re-running is safe; converged ports are skipped.")
    )]
    Incomplete { unsettled: usize, total: usize },

    #[error("Aborted; no changes were applied")]
    #[diagnostic(code(poectl::cancelled))]
    Cancelled,

    #[error("Changes to '{device}' require confirmation")]
    #[diagnostic(
        code(poectl::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { device: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(poectl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(poectl::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No controller configured")]
    #[diagnostic(
        code(poectl::no_config),
        help(
            "Pass --controller (or POECTL_CONTROLLER), or add a profile to\n\
             {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(poectl::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to render TOML: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::DeviceNotFound { .. } | Self::NotASwitch { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile name to authentication failures.
    pub fn for_profile(self, profile: &str) -> Self {
        match self {
            Self::AuthFailed { reason, .. } => Self::AuthFailed {
                profile: profile.into(),
                reason,
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "current".into(),
                reason: message,
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::DeviceNotFound { identifier } => CliError::DeviceNotFound { identifier },

            CoreError::NotASwitch { identifier } => CliError::NotASwitch { identifier },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Rejected { message } | CoreError::Api { message, .. } => {
                CliError::ApiError { message }
            }

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}
