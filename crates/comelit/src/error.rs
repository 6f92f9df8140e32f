//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use comelit_config::ConfigError;
use comelit_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const DATA: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(comelit::connection_failed),
        help(
            "Check that the device is powered and reachable on the network.\n\
             Reason: {reason}\n\
             Try a longer --timeout if the link is slow."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed")]
    #[diagnostic(
        code(comelit::auth_failed),
        help(
            "The device refused the PIN: {message}\n\
             Check --bridge-pin / --vedo-pin or the pin in your profile."
        )
    )]
    AuthFailed { message: String },

    #[error("No PIN configured for the {device} of profile '{profile}'")]
    #[diagnostic(
        code(comelit::no_pin),
        help("Pass --{device}-pin, set COMELIT_{env_device}_PIN, or add `pin` to the profile.")
    )]
    NoPin {
        profile: String,
        device: String,
        env_device: String,
    },

    // ── Data ─────────────────────────────────────────────────────────

    #[error("Device returned unusable data: {message}")]
    #[diagnostic(
        code(comelit::data),
        help("The session may have expired or the device is busy; retry in a moment.")
    )]
    DataUnavailable { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(comelit::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(comelit::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No {device} configured")]
    #[diagnostic(
        code(comelit::no_config),
        help(
            "Pass --{device} <HOST> or add a [profiles.<name>.{device}] section to\n\
             {path}"
        )
    )]
    NoConfig { device: String, path: String },

    #[error(transparent)]
    #[diagnostic(code(comelit::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not serialize output: {0}")]
    #[diagnostic(code(comelit::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoPin { .. } => exit_code::AUTH,
            Self::DataUnavailable { .. } => exit_code::DATA,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::NoConfig { .. } => {
                exit_code::USAGE
            }
            Self::Config(_) | Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }

    pub(crate) fn no_pin(profile: &str, device: &str) -> Self {
        Self::NoPin {
            profile: profile.into(),
            device: device.into(),
            env_device: device.to_uppercase(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CannotConnect { url, reason } => CliError::ConnectionFailed {
                url: if url.is_empty() { "device".into() } else { url },
                reason,
            },
            CoreError::CannotAuthenticate { message } => CliError::AuthFailed { message },
            CoreError::CannotRetrieveData { message, status } => CliError::DataUnavailable {
                message: match status {
                    Some(status) => format!("{message} (HTTP {status})"),
                    None => message,
                },
            },
            CoreError::Config { message } => CliError::Validation {
                field: "host".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoPin { profile, device } => CliError::no_pin(&profile, &device),
            ConfigError::MissingDevice { profile: _, device } => CliError::NoConfig {
                device,
                path: comelit_config::config_path().display().to_string(),
            },
            ConfigError::Figment(err) => CliError::Config(err),
        }
    }
}
