use thiserror::Error;

/// Top-level error type for the `comelit-api` crate.
///
/// Covers transport, authentication, and data failures for both the
/// Serial Bridge and the VEDO alarm panel. `comelit-core` maps these into
/// the three caller-facing categories (connect / authenticate / retrieve).
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected: no session cookie issued, or the liveness probe
    /// still reports a logged-out session after the cookie was installed.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The session transport was never opened or has been closed.
    #[error("Session is not open -- call login() first")]
    SessionClosed,

    // ── Data ────────────────────────────────────────────────────────
    /// The device answered with a non-success HTTP status.
    #[error("{method} {path} returned HTTP {status}")]
    Http {
        method: &'static str,
        path: String,
        status: u16,
    },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the failure happened below HTTP (timeout, refused
    /// connection, closed session).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Timeout { .. } | Self::SessionClosed => true,
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// The HTTP status code, if the device answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
