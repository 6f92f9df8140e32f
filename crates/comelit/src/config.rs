//! Resolution of connection settings: TOML profile first, then global
//! flags / environment on top. Produces the ready-to-use core types.

use clap::ValueEnum;
use secrecy::SecretString;
use tracing::debug;

use comelit_config::{BRIDGE_PIN_ENV, Config, Profile, VEDO_PIN_ENV, VedoTarget};
use comelit_core::{ClientConfig, DEFAULT_PORT, HostConfig};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// How the VEDO commands reach the panel.
#[derive(Debug)]
pub enum VedoPlan {
    Direct(HostConfig),
    ViaBridge { bridge: HostConfig, pin: SecretString },
}

/// Name of the profile in effect: `--profile`, else the config default.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| cfg.default_profile_name().to_owned())
}

/// The active profile. Naming a missing profile explicitly is an error;
/// a missing default profile just means "flags only".
fn active_profile<'a>(global: &GlobalOpts, cfg: &'a Config) -> Result<Option<&'a Profile>, CliError> {
    let name = active_profile_name(global, cfg);
    match cfg.profiles.get(&name) {
        Some(profile) => Ok(Some(profile)),
        None if global.profile.is_some() => {
            let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
            available.sort();
            Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            })
        }
        None => Ok(None),
    }
}

/// The `defaults.output` format from the config file.
pub fn default_output(cfg: &Config) -> Result<OutputFormat, CliError> {
    OutputFormat::from_str(cfg.defaults.output.trim(), true).map_err(|_| CliError::Validation {
        field: "defaults.output".into(),
        reason: format!(
            "unknown format '{}' (expected table, json, json-compact or plain)",
            cfg.defaults.output
        ),
    })
}

/// Client tuning: config defaults, profile overrides, then `--timeout`.
pub fn client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let profile = active_profile(global, cfg)?;
    let mut config = comelit_config::client_config(&cfg.defaults, profile);
    if let Some(secs) = global.timeout {
        config.timeout = std::time::Duration::from_secs(secs);
    }
    Ok(config)
}

fn no_config(device: &str) -> CliError {
    CliError::NoConfig {
        device: device.into(),
        path: comelit_config::config_path().display().to_string(),
    }
}

/// Bridge address and PIN with flag overrides applied.
pub fn resolve_bridge(global: &GlobalOpts, cfg: &Config) -> Result<HostConfig, CliError> {
    let name = active_profile_name(global, cfg);
    let profile = active_profile(global, cfg)?;
    let bridge = profile.and_then(|p| p.bridge.as_ref());

    let mut resolved = match profile {
        Some(p) if bridge.is_some() && global.bridge.is_none() && global.bridge_pin.is_none() => {
            comelit_config::bridge_host(p, &name)?
        }
        _ => {
            let host = global
                .bridge
                .clone()
                .or_else(|| bridge.map(|b| b.host.clone()))
                .ok_or_else(|| no_config("bridge"))?;
            let pin = match &global.bridge_pin {
                Some(pin) => SecretString::from(pin.clone()),
                None => comelit_config::resolve_pin(
                    bridge.and_then(|b| b.pin.as_deref()),
                    bridge.and_then(|b| b.pin_env.as_deref()),
                    BRIDGE_PIN_ENV,
                    &name,
                    "bridge",
                )?,
            };
            HostConfig::new(host, bridge.map_or(DEFAULT_PORT, |b| b.port), pin)
        }
    };
    if let Some(port) = global.bridge_port {
        resolved.port = port;
    }

    debug!(profile = %name, host = %resolved.host, port = resolved.port, "bridge resolved");
    Ok(resolved)
}

/// VEDO route, address and PIN with flag overrides applied.
///
/// `--via-bridge` forces the bridge route; a direct `--vedo` host wins
/// over a profile configured for the bridge route.
pub fn resolve_vedo(
    global: &GlobalOpts,
    cfg: &Config,
    via_bridge: bool,
) -> Result<VedoPlan, CliError> {
    let name = active_profile_name(global, cfg);
    let profile = active_profile(global, cfg)?;
    let vedo = profile.and_then(|p| p.vedo.as_ref());

    let use_profile =
        vedo.is_some() && global.vedo.is_none() && global.vedo_pin.is_none() && !via_bridge;
    if let Some(p) = profile.filter(|_| use_profile) {
        return match comelit_config::vedo_target(p, &name)? {
            VedoTarget::Direct(mut host) => {
                if let Some(port) = global.vedo_port {
                    host.port = port;
                }
                debug!(profile = %name, host = %host.host, port = host.port, "vedo resolved");
                Ok(VedoPlan::Direct(host))
            }
            VedoTarget::ViaBridge { pin } => Ok(VedoPlan::ViaBridge {
                bridge: resolve_bridge(global, cfg)?,
                pin,
            }),
        };
    }

    let pin = match &global.vedo_pin {
        Some(pin) => SecretString::from(pin.clone()),
        None => comelit_config::resolve_pin(
            vedo.and_then(|v| v.pin.as_deref()),
            vedo.and_then(|v| v.pin_env.as_deref()),
            VEDO_PIN_ENV,
            &name,
            "vedo",
        )?,
    };

    if via_bridge || (vedo.is_some_and(|v| v.via_bridge) && global.vedo.is_none()) {
        let bridge = resolve_bridge(global, cfg)?;
        debug!(profile = %name, bridge = %bridge.host, "vedo through bridge");
        return Ok(VedoPlan::ViaBridge { bridge, pin });
    }

    let host = global
        .vedo
        .clone()
        .or_else(|| vedo.and_then(|v| v.host.clone()))
        .ok_or_else(|| no_config("vedo"))?;
    let port = global
        .vedo_port
        .or_else(|| vedo.map(|v| v.port))
        .unwrap_or(DEFAULT_PORT);

    debug!(profile = %name, host = %host, port, "vedo resolved");
    Ok(VedoPlan::Direct(HostConfig::new(host, port, pin)))
}
