//! Shared configuration for the Comelit CLI.
//!
//! TOML profiles, PIN resolution (env + plaintext), and translation to
//! `comelit_core::{ClientConfig, HostConfig}`. The CLI layers its global
//! flags on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use comelit_core::config::{DEFAULT_BRIDGE_CALL_INTERVAL, DEFAULT_VEDO_CALL_INTERVAL};
use comelit_core::{ClientConfig, DEFAULT_PORT, HostConfig};

/// Environment variable consulted for the bridge PIN.
pub const BRIDGE_PIN_ENV: &str = "COMELIT_BRIDGE_PIN";
/// Environment variable consulted for the VEDO PIN.
pub const VEDO_PIN_ENV: &str = "COMELIT_VEDO_PIN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no PIN configured for the {device} of profile '{profile}'")]
    NoPin { profile: String, device: String },

    #[error("profile '{profile}' has no {device} section")]
    MissingDevice { profile: String, device: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
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

    /// Named installation profiles.
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

impl Config {
    /// The profile to use when none is named explicitly.
    pub fn default_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Minimum gap between climate commands, in milliseconds.
    #[serde(default = "default_bridge_call_interval_ms")]
    pub bridge_call_interval_ms: u64,

    /// Delay before each alarm page fetch, in milliseconds.
    #[serde(default = "default_vedo_call_interval_ms")]
    pub vedo_call_interval_ms: u64,

    /// Re-probe VEDO-through-bridge availability on every check.
    #[serde(default)]
    pub recheck_vedo: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            bridge_call_interval_ms: default_bridge_call_interval_ms(),
            vedo_call_interval_ms: default_vedo_call_interval_ms(),
            recheck_vedo: false,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    comelit_core::ClientConfig::default().timeout.as_secs()
}
fn default_bridge_call_interval_ms() -> u64 {
    u64::try_from(DEFAULT_BRIDGE_CALL_INTERVAL.as_millis()).unwrap_or(1500)
}
fn default_vedo_call_interval_ms() -> u64 {
    u64::try_from(DEFAULT_VEDO_CALL_INTERVAL.as_millis()).unwrap_or(250)
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

/// A named installation: a Serial Bridge, a VEDO panel, or both.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    pub bridge: Option<BridgeProfile>,
    pub vedo: Option<VedoProfile>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BridgeProfile {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// PIN (plaintext -- prefer `pin_env`).
    pub pin: Option<String>,

    /// Environment variable name containing the PIN.
    pub pin_env: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VedoProfile {
    /// Panel address; unused when `via_bridge` is set.
    pub host: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    /// PIN (plaintext -- prefer `pin_env`).
    pub pin: Option<String>,

    /// Environment variable name containing the PIN.
    pub pin_env: Option<String>,

    /// Reach the panel through the profile's Serial Bridge.
    #[serde(default)]
    pub via_bridge: bool,
}

/// Where the alarm panel is reached.
#[derive(Debug, Clone)]
pub enum VedoTarget {
    Direct(HostConfig),
    ViaBridge { pin: SecretString },
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "comelit").map_or_else(
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
    p.push("comelit");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the default file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// Environment keys use `__` as the nesting separator, e.g.
/// `COMELIT_DEFAULTS__TIMEOUT=5`. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("COMELIT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Translation to core types ───────────────────────────────────────

/// Client tuning from the global defaults plus profile overrides.
pub fn client_config(defaults: &Defaults, profile: Option<&Profile>) -> ClientConfig {
    let timeout = profile
        .and_then(|p| p.timeout)
        .unwrap_or(defaults.timeout);
    ClientConfig {
        timeout: Duration::from_secs(timeout),
        bridge_call_interval: Duration::from_millis(defaults.bridge_call_interval_ms),
        vedo_call_interval: Duration::from_millis(defaults.vedo_call_interval_ms),
        recheck_vedo: defaults.recheck_vedo,
    }
}

/// Resolve a PIN: profile `pin_env` variable, then the global PIN
/// variable, then the plaintext value.
pub fn resolve_pin(
    pin: Option<&str>,
    pin_env: Option<&str>,
    global_env: &str,
    profile_name: &str,
    device: &str,
) -> Result<SecretString, ConfigError> {
    if let Some(env_name) = pin_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(val) = std::env::var(global_env) {
        return Ok(SecretString::from(val));
    }

    if let Some(pin) = pin {
        return Ok(SecretString::from(pin.to_owned()));
    }

    Err(ConfigError::NoPin {
        profile: profile_name.into(),
        device: device.into(),
    })
}

/// The bridge address and PIN of a profile.
pub fn bridge_host(profile: &Profile, profile_name: &str) -> Result<HostConfig, ConfigError> {
    let bridge = profile
        .bridge
        .as_ref()
        .ok_or_else(|| ConfigError::MissingDevice {
            profile: profile_name.into(),
            device: "bridge".into(),
        })?;
    if bridge.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "bridge.host".into(),
            reason: "must not be empty".into(),
        });
    }
    let pin = resolve_pin(
        bridge.pin.as_deref(),
        bridge.pin_env.as_deref(),
        BRIDGE_PIN_ENV,
        profile_name,
        "bridge",
    )?;
    Ok(HostConfig::new(bridge.host.clone(), bridge.port, pin))
}

/// How to reach the VEDO panel of a profile.
pub fn vedo_target(profile: &Profile, profile_name: &str) -> Result<VedoTarget, ConfigError> {
    let vedo = profile
        .vedo
        .as_ref()
        .ok_or_else(|| ConfigError::MissingDevice {
            profile: profile_name.into(),
            device: "vedo".into(),
        })?;
    let pin = resolve_pin(
        vedo.pin.as_deref(),
        vedo.pin_env.as_deref(),
        VEDO_PIN_ENV,
        profile_name,
        "vedo",
    )?;

    if vedo.via_bridge {
        if profile.bridge.is_none() {
            return Err(ConfigError::Validation {
                field: "vedo.via_bridge".into(),
                reason: format!("profile '{profile_name}' has no bridge to route through"),
            });
        }
        return Ok(VedoTarget::ViaBridge { pin });
    }

    let host = vedo
        .host
        .clone()
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| ConfigError::Validation {
            field: "vedo.host".into(),
            reason: "required unless via_bridge is set".into(),
        })?;
    Ok(VedoTarget::Direct(HostConfig::new(host, vedo.port, pin)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.default_profile_name(), "default");
        assert_eq!(config.defaults.timeout, 10);
        assert_eq!(config.defaults.bridge_call_interval_ms, 1500);
        assert_eq!(config.defaults.vedo_call_interval_ms, 250);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn profiles_load_from_toml() {
        let file = write_config(
            r#"
            default_profile = "home"

            [defaults]
            timeout = 5
            recheck_vedo = true

            [profiles.home]
            timeout = 3

            [profiles.home.bridge]
            host = "192.168.1.2"
            pin = "1234"

            [profiles.home.vedo]
            pin = "5678"
            via_bridge = true
            "#,
        );
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.default_profile_name(), "home");

        let home = &config.profiles["home"];
        let client = client_config(&config.defaults, Some(home));
        assert_eq!(client.timeout, Duration::from_secs(3));
        assert!(client.recheck_vedo);

        let bridge = bridge_host(home, "home").unwrap();
        assert_eq!(bridge.host, "192.168.1.2");
        assert_eq!(bridge.port, 80);

        assert!(matches!(vedo_target(home, "home").unwrap(), VedoTarget::ViaBridge { .. }));
    }

    #[test]
    fn direct_vedo_requires_host() {
        let profile = Profile {
            vedo: Some(VedoProfile {
                host: None,
                port: 80,
                pin: Some("1".into()),
                pin_env: None,
                via_bridge: false,
            }),
            ..Profile::default()
        };
        let err = vedo_target(&profile, "p").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn via_bridge_without_bridge_is_rejected() {
        let profile = Profile {
            vedo: Some(VedoProfile {
                host: None,
                port: 80,
                pin: Some("1".into()),
                pin_env: None,
                via_bridge: true,
            }),
            ..Profile::default()
        };
        assert!(vedo_target(&profile, "p").is_err());
    }

    #[test]
    fn missing_section_is_reported() {
        let err = bridge_host(&Profile::default(), "empty").unwrap_err();
        assert!(matches!(err, ConfigError::MissingDevice { .. }));
    }

    #[test]
    fn plaintext_pin_is_last_resort() {
        let pin = resolve_pin(
            Some("4321"),
            Some("COMELIT_TEST_UNSET_PIN_VARIABLE"),
            "COMELIT_TEST_UNSET_GLOBAL_PIN",
            "p",
            "bridge",
        )
        .unwrap();
        assert_eq!(pin.expose_secret(), "4321");

        let err = resolve_pin(None, None, "COMELIT_TEST_UNSET_GLOBAL_PIN", "p", "bridge");
        assert!(matches!(err, Err(ConfigError::NoPin { .. })));
    }
}
