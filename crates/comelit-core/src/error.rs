// ── Core error types ──
//
// Caller-facing errors from comelit-core. Every failure lands in one of
// three categories: the device could not be reached, it refused the PIN,
// or it answered with something unusable. The `From<comelit_api::Error>`
// impl translates transport-layer errors into these categories.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    /// Timeout, refused connection, or a session used before `login()`.
    #[error("Cannot connect to {url}: {reason}")]
    CannotConnect { url: String, reason: String },

    // ── Authentication errors ────────────────────────────────────────
    /// No session cookie issued, or the session stayed inactive after login.
    #[error("Authentication failed: {message}")]
    CannotAuthenticate { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    /// Non-success HTTP status, malformed payload, or an alarm page still
    /// reporting an expired session after the single re-login retry.
    #[error("Cannot retrieve data: {message}")]
    CannotRetrieveData {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn data(message: impl Into<String>) -> Self {
        Self::CannotRetrieveData {
            message: message.into(),
            status: None,
        }
    }

    /// `true` for [`CannotConnect`](Self::CannotConnect).
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::CannotConnect { .. })
    }

    /// `true` for [`CannotAuthenticate`](Self::CannotAuthenticate).
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::CannotAuthenticate { .. })
    }

    /// `true` for [`CannotRetrieveData`](Self::CannotRetrieveData).
    pub fn is_data(&self) -> bool {
        matches!(self, Self::CannotRetrieveData { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<comelit_api::Error> for CoreError {
    fn from(err: comelit_api::Error) -> Self {
        match err {
            comelit_api::Error::Authentication { message } => {
                CoreError::CannotAuthenticate { message }
            }
            comelit_api::Error::Transport(ref e) => {
                if e.is_timeout() || e.is_connect() || e.is_request() {
                    CoreError::CannotConnect {
                        url: e.url().map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::CannotRetrieveData {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            comelit_api::Error::Timeout { timeout_secs } => CoreError::CannotConnect {
                url: String::new(),
                reason: format!("request timed out after {timeout_secs}s"),
            },
            comelit_api::Error::SessionClosed => CoreError::CannotConnect {
                url: String::new(),
                reason: "session is not open -- call login() first".into(),
            },
            comelit_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            comelit_api::Error::Http {
                method,
                path,
                status,
            } => CoreError::CannotRetrieveData {
                message: format!("{method} {path} response status {status}"),
                status: Some(status),
            },
            comelit_api::Error::Deserialization { message, body: _ } => {
                CoreError::data(format!("Deserialization error: {message}"))
            }
        }
    }
}
