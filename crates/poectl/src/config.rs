//! CLI-owned configuration: TOML profiles, credential resolution, and
//! translation to `poectl_core::ControllerConfig`.
//!
//! Core never sees these types -- it receives a pre-built `ControllerConfig`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

use poectl_core::{ControllerConfig, TlsVerification, VerifyPolicy};

use crate::cli::GlobalOpts;
use crate::error::CliError;

const KEYRING_SERVICE: &str = "poectl";

// ── TOML config structs ──────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when --profile is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Local controllers usually run on self-signed certificates.
    #[serde(default = "default_insecure")]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_verify_attempts")]
    pub verify_attempts: u32,

    #[serde(default = "default_verify_delay")]
    pub verify_delay_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: default_insecure(),
            timeout: default_timeout(),
            verify_attempts: default_verify_attempts(),
            verify_delay_secs: default_verify_delay(),
        }
    }
}

fn default_insecure() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}
fn default_verify_attempts() -> u32 {
    3
}
fn default_verify_delay() -> u64 {
    2
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Controller base URL (e.g., "https://192.168.1.1").
    pub controller: String,

    #[serde(default = "default_site")]
    pub site: String,

    pub username: Option<String>,

    /// Plaintext password -- prefer the keyring or POECTL_PASSWORD.
    pub password: Option<String>,

    /// PEM file with the controller's CA certificate.
    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,
    pub timeout: Option<u64>,
    pub verify_attempts: Option<u32>,
    pub verify_delay_secs: Option<u64>,
}

fn default_site() -> String {
    "default".into()
}

// ── Config file path ─────────────────────────────────────────────────

/// `--config` / `POECTL_CONFIG`, else the platform config directory.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    if let Some(ref path) = global.config {
        return path.clone();
    }
    ProjectDirs::from("com", "poectl", "poectl").map_or_else(
        || PathBuf::from(".poectl").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ───────────────────────────────────────────────────

/// Defaults ← TOML file ← `POECTL_` environment (`__` separates nesting).
pub fn load_config(path: &Path) -> Result<Config, CliError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("POECTL_").split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), profiles = config.profiles.len(), "configuration loaded");
    Ok(config)
}

pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

// ── Profile resolution ───────────────────────────────────────────────

/// Everything a controller-bound command needs.
#[derive(Debug)]
pub struct Resolved {
    pub profile: String,
    pub controller: ControllerConfig,
}

/// Resolve the active profile plus flag overrides into core config.
///
/// Without a matching profile, `--controller` alone is enough as long as
/// credentials come from flags or the environment.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let path = config_path(global);
    let cfg = load_config(&path)?;
    let name = active_profile_name(global, &cfg);

    let profile = match (cfg.profiles.get(&name), &global.controller) {
        (Some(p), _) => p.clone(),
        (None, Some(url)) => Profile {
            controller: url.clone(),
            site: default_site(),
            username: None,
            password: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            verify_attempts: None,
            verify_delay_secs: None,
        },
        (None, None) if global.profile.is_some() => {
            let available: Vec<_> = cfg.profiles.keys().cloned().collect();
            return Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: path.display().to_string(),
            });
        }
    };

    let controller = resolve_profile(&profile, &name, &cfg.defaults, global)?;
    Ok(Resolved {
        profile: name,
        controller,
    })
}

/// Translate a `Profile` + global flags into a `ControllerConfig`.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ControllerConfig, CliError> {
    // 1. Controller URL (flag > env > profile)
    let url_str = global.controller.as_deref().unwrap_or(&profile.controller);
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "controller".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. Credentials
    let (username, password) = resolve_credentials(profile, profile_name, global)?;

    // 3. TLS verification
    let insecure = global.insecure || profile.insecure.unwrap_or(defaults.insecure);
    let tls = match (&profile.ca_cert, global.insecure) {
        (Some(ca), false) => TlsVerification::CustomCa(ca.clone()),
        _ if insecure => TlsVerification::DangerAcceptInvalid,
        _ => TlsVerification::SystemDefaults,
    };

    // 4. Site and timeout (flag > env > profile)
    let site = global.site.clone().unwrap_or_else(|| profile.site.clone());
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(defaults.timeout);

    let mut config = ControllerConfig::new(url, username, password);
    config.site = site;
    config.tls = tls;
    config.timeout = Duration::from_secs(timeout);

    // 5. Verification policy (profile > defaults)
    config.verify = VerifyPolicy::new(
        profile
            .verify_attempts
            .unwrap_or(defaults.verify_attempts),
        Duration::from_secs(
            profile
                .verify_delay_secs
                .unwrap_or(defaults.verify_delay_secs),
        ),
    );
    Ok(config)
}

// ── Credential helpers ───────────────────────────────────────────────

/// Username from flag/env or profile; password from flag/env, then the
/// system keyring, then the plaintext profile value.
fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(String, SecretString), CliError> {
    let no_credentials = || CliError::NoCredentials {
        profile: profile_name.into(),
    };

    let username = global
        .username
        .clone()
        .or_else(|| profile.username.clone())
        .ok_or_else(no_credentials)?;

    // 1. Flag / env
    if let Some(ref pw) = global.password {
        return Ok((username, SecretString::from(pw.clone())));
    }

    // 2. Keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        match entry.get_password() {
            Ok(pw) => return Ok((username, SecretString::from(pw))),
            Err(e) => debug!(error = %e, "no keyring password"),
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok((username, SecretString::from(pw.clone())));
    }

    Err(no_credentials())
}
