// Shared transport configuration for building reqwest::Client instances.
//
// Bridge and VEDO sessions share timeout, header, and cookie settings
// through this module. The vendor web server serves stale cached JSON
// unless requests look like browser XHR calls, hence the fixed header set.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{self, HeaderMap, HeaderValue};
use url::Url;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "Mozilla/5.0 (X11; Fedora; Linux x86_64; rv:78.0) Gecko/20100101 Firefox/78.0";
const ACCEPT_LANGUAGE: &str = "en-GB,en;q=0.5";

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: USER_AGENT.into(),
            accept_language: ACCEPT_LANGUAGE.into(),
        }
    }
}

impl TransportConfig {
    /// Config with a custom request timeout, other settings default.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Headers attached to every request.
    pub fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.accept_language) {
            headers.insert(header::ACCEPT_LANGUAGE, value);
        }
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers
    }

    /// Build a `reqwest::Client` bound to the given cookie store.
    pub fn build_client(
        &self,
        cookies: Arc<SessionCookies>,
    ) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .default_headers(self.default_headers())
            .cookie_provider(cookies)
            .build()
            .map_err(crate::error::Error::Transport)
    }
}

// ── Cookie store ─────────────────────────────────────────────────────

/// Cookie store backing a device session.
///
/// `reqwest::cookie::Jar` cannot be emptied in place, so the jar is swapped
/// for a fresh one on [`clear`](Self::clear). Clients built on top of this
/// store keep working across a clear.
#[derive(Debug, Default)]
pub struct SessionCookies {
    jar: RwLock<Arc<Jar>>,
}

impl SessionCookies {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&self) -> Arc<Jar> {
        Arc::clone(&self.jar.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Drop every stored cookie.
    pub fn clear(&self) {
        *self.jar.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(Jar::default());
    }

    /// The `Cookie` header value that would be sent to `url`, if any.
    pub fn header_for(&self, url: &Url) -> Option<String> {
        self.current()
            .cookies(url)
            .and_then(|v| v.to_str().ok().map(String::from))
    }
}

impl CookieStore for SessionCookies {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        self.current().set_cookies(cookie_headers, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.current().cookies(url)
    }
}
