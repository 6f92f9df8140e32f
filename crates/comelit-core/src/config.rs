// ── Runtime connection configuration ──
//
// These types describe *how* to reach a Comelit device and how to pace
// calls to it. They carry the PIN but never touch disk; the CLI builds
// them (usually via comelit-config) and hands them in.

use std::time::Duration;

use secrecy::SecretString;

/// Minimum spacing between two climate/humidity commands.
pub const DEFAULT_BRIDGE_CALL_INTERVAL: Duration = Duration::from_millis(1500);
/// Delay before every alarm page fetch.
pub const DEFAULT_VEDO_CALL_INTERVAL: Duration = Duration::from_millis(250);
/// Default HTTP port of both the Serial Bridge and the VEDO panel.
pub const DEFAULT_PORT: u16 = 80;

/// Address and PIN of one device.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub host: String,
    pub port: u16,
    pub pin: SecretString,
}

impl HostConfig {
    pub fn new(host: impl Into<String>, port: u16, pin: SecretString) -> Self {
        Self {
            host: host.into(),
            port,
            pin,
        }
    }
}

/// Per-client tuning shared by bridge and alarm clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Minimum gap between the end of one climate command and the next.
    pub bridge_call_interval: Duration,
    /// Sleep before each alarm page fetch (and before its retry).
    pub vedo_call_interval: Duration,
    /// Re-probe `vedo_enabled` on every call instead of caching the first
    /// answer for the client lifetime.
    pub recheck_vedo: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: comelit_api::transport::DEFAULT_TIMEOUT,
            bridge_call_interval: DEFAULT_BRIDGE_CALL_INTERVAL,
            vedo_call_interval: DEFAULT_VEDO_CALL_INTERVAL,
            recheck_vedo: false,
        }
    }
}

impl ClientConfig {
    pub(crate) fn transport(&self) -> comelit_api::TransportConfig {
        comelit_api::TransportConfig::with_timeout(self.timeout)
    }
}
