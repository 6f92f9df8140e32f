use std::fmt;

use crate::session::models::LoginStatus;

/// Sentinel `domus` identifier the bridge reports for a logged-out session.
pub const BRIDGE_LOGGED_OUT_DOMUS: &str = "000000000000";

/// The kind of Comelit host a session authenticates against.
///
/// Determines the login form field and how the `/login.json` liveness
/// probe is interpreted. The two hosts disagree on what "logged in" looks
/// like, so the probe must always be read through [`is_logged_in`](Self::is_logged_in).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKind {
    /// Serial Bridge -- lights, covers, climate, irrigation, scenarios.
    Bridge,
    /// VEDO alarm panel, reached directly or through the bridge.
    Vedo,
}

impl HostKind {
    /// The form field carrying the PIN on `POST /login.cgi`.
    pub fn login_field(self) -> &'static str {
        match self {
            Self::Bridge => "dom",
            Self::Vedo => "code",
        }
    }

    /// Human-readable host name used in logs and diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bridge => "Serial bridge",
            Self::Vedo => "Vedo system",
        }
    }

    /// Interpret a liveness probe reply.
    ///
    /// - Bridge: the `domus` identifier differs from the all-zero sentinel.
    /// - VEDO: the `logged` flag is set.
    pub fn is_logged_in(self, status: &LoginStatus) -> bool {
        match self {
            Self::Bridge => status
                .domus
                .as_deref()
                .is_some_and(|domus| domus != BRIDGE_LOGGED_OUT_DOMUS),
            Self::Vedo => status.logged.is_set(),
        }
    }
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
