//! Shared configuration for the canvass CLI.
//!
//! TOML profiles, credential resolution (env var + plaintext fallback),
//! and translation to `canvass_core::ConsoleConfig`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use canvass_core::{ConsoleConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}'")]
    UnknownProfile { profile: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named platform profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named platform profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Platform base URL (e.g., "https://platform.example.com").
    pub url: String,

    /// Admin email for session login.
    pub email: Option<String>,

    /// Password (plaintext -- prefer the CANVASS_PASSWORD env var or the
    /// interactive prompt).
    pub password: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "canvass", "canvass").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("canvass");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit path (tests point this at a temp dir).
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CANVASS_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

/// The profile a command should use: explicit flag, then config default,
/// then "default".
pub fn active_profile_name(explicit: Option<&str>, cfg: &Config) -> String {
    explicit
        .map(str::to_owned)
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Translate a profile into a core `ConsoleConfig`.
pub fn resolve_console_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ConsoleConfig, ConfigError> {
    let base_url: url::Url = profile.url.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {}", profile.url),
    })?;

    let tls = if let Some(ref ca) = profile.ca_cert {
        TlsVerification::CustomCa(ca.clone())
    } else if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ConsoleConfig {
        base_url,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
    })
}

/// Resolve sign-in credentials for a profile.
///
/// The password comes from `CANVASS_PASSWORD`, then the profile's
/// plaintext field. `Ok(None)` means the email is known but the password
/// must be prompted for interactively.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, Option<SecretString>), ConfigError> {
    let email = profile
        .email
        .clone()
        .or_else(|| std::env::var("CANVASS_EMAIL").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    if let Ok(pw) = std::env::var("CANVASS_PASSWORD") {
        return Ok((email, Some(SecretString::from(pw))));
    }
    if let Some(ref pw) = profile.password {
        return Ok((email, Some(SecretString::from(pw.clone()))));
    }

    Ok((email, None))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_profiles_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
                default_profile = "staging"

                [profiles.staging]
                url = "https://staging.example.com"
                email = "admin@example.com"
                insecure = true
            "#,
        );

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("staging"));
        assert_eq!(cfg.defaults.timeout, 30);

        let profile = &cfg.profiles["staging"];
        assert_eq!(profile.email.as_deref(), Some("admin@example.com"));
        assert_eq!(profile.insecure, Some(true));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.defaults.output, "table");
    }

    #[test]
    fn console_config_resolution_maps_tls_modes() {
        let defaults = Defaults::default();

        let strict = Profile {
            url: "https://prod.example.com".into(),
            ..Profile::default()
        };
        let resolved = resolve_console_config(&strict, &defaults).unwrap();
        assert_eq!(resolved.tls, TlsVerification::SystemDefaults);
        assert_eq!(resolved.timeout, Duration::from_secs(30));

        let insecure = Profile {
            url: "https://localhost:8000".into(),
            insecure: Some(true),
            timeout: Some(5),
            ..Profile::default()
        };
        let resolved = resolve_console_config(&insecure, &defaults).unwrap();
        assert_eq!(resolved.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(resolved.timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_url_is_a_validation_error() {
        let profile = Profile {
            url: "not a url".into(),
            ..Profile::default()
        };
        let err = resolve_console_config(&profile, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn active_profile_prefers_explicit_flag() {
        let cfg = Config {
            default_profile: Some("staging".into()),
            ..Config::default()
        };
        assert_eq!(active_profile_name(Some("prod"), &cfg), "prod");
        assert_eq!(active_profile_name(None, &cfg), "staging");
    }
}
