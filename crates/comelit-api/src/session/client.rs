// Device session HTTP client
//
// Wraps `reqwest::Client` with Comelit-specific URL construction,
// cache-busting, and status/JSON handling. Endpoint groups (auth, bridge,
// vedo) are implemented as inherent methods in sibling files to keep this
// module focused on transport mechanics.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::{SessionCookies, TransportConfig};

/// A cookie-bearing pseudo-session against one Comelit host.
///
/// The device API is stateless apart from the session cookie set by
/// `POST /login.cgi`. The HTTP transport is created lazily by
/// [`login`](Self::login) and dropped by [`close`](Self::close).
///
/// Cheaply cloneable: clones share the transport and cookie store. That is
/// how a VEDO client rides on the bridge's session.
///
/// Concurrent `login`/`logout` calls on the same session race on the shared
/// cookie store; callers serialize them.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    base_url: Url,
    host: String,
    transport: TransportConfig,
    cookies: Arc<SessionCookies>,
    http: RwLock<Option<reqwest::Client>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.inner.host)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session for `http://{host}:{port}`. No I/O happens here.
    pub fn new(host: &str, port: u16, transport: TransportConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("http://{host}:{port}"))?;
        Ok(Self::with_base_url(base_url, transport))
    }

    /// Create a session for an explicit base URL (e.g. a mock server).
    pub fn with_base_url(base_url: Url, transport: TransportConfig) -> Self {
        let host = match (base_url.host_str(), base_url.port_or_known_default()) {
            (Some(h), Some(p)) => format!("{h}:{p}"),
            (Some(h), None) => h.to_owned(),
            _ => base_url.to_string(),
        };
        Self {
            inner: Arc::new(SessionInner {
                base_url,
                host,
                transport,
                cookies: Arc::new(SessionCookies::new()),
                http: RwLock::new(None),
            }),
        }
    }

    /// `host:port` of the device, for logging.
    pub fn host(&self) -> &str {
        &self.inner.host
    }

    /// `true` once [`login`](Self::login) has opened the transport and
    /// [`close`](Self::close) has not dropped it.
    pub fn is_open(&self) -> bool {
        self.inner
            .http
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The `Cookie` header currently sent to the device, if any.
    pub fn cookie_header(&self) -> Option<String> {
        self.inner.cookies.header_for(&self.inner.base_url)
    }

    pub(crate) fn clear_cookies(&self) {
        self.inner.cookies.clear();
    }

    /// Open the transport if it is not open yet.
    pub(crate) fn open(&self) -> Result<reqwest::Client, Error> {
        let mut guard = self
            .inner
            .http
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(ref http) = *guard {
            return Ok(http.clone());
        }
        debug!(host = %self.inner.host, "creating HTTP client");
        let http = self
            .inner
            .transport
            .build_client(Arc::clone(&self.inner.cookies))?;
        *guard = Some(http.clone());
        Ok(http)
    }

    fn http(&self) -> Result<reqwest::Client, Error> {
        self.inner
            .http
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(Error::SessionClosed)
    }

    /// Release the HTTP transport and forget the session cookie.
    ///
    /// Idempotent; fine to call on a session that never logged in.
    pub fn close(&self) {
        let dropped = self
            .inner
            .http
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if dropped.is_some() {
            debug!(host = %self.inner.host, "closing HTTP client");
        }
        self.inner.cookies.clear();
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a page URL with the given query pairs plus the `_=<timestamp>`
    /// cache-buster the device needs to serve fresh JSON.
    pub(crate) fn page_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, Error> {
        let mut url = self.inner.base_url.join(path)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("_", &cache_buster());
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.inner.transport.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Send a GET and check the HTTP status.
    pub(crate) async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, Error> {
        let url = self.page_url(path, query)?;
        debug!(host = %self.inner.host, "GET {}", url);

        let resp = self
            .http()?
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        check_status(resp, "GET", path)
    }

    /// Send a GET and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let resp = self.get(path, query).await?;
        let body = resp.text().await.map_err(|e| self.map_send_error(e))?;
        trace!(host = %self.inner.host, path, body = %body, "GET response");
        decode(&body)
    }

    /// Send a GET whose reply carries no meaningful body.
    pub(crate) async fn get_empty(&self, path: &str, query: &[(&str, &str)]) -> Result<(), Error> {
        let resp = self.get(path, query).await?;
        debug!(host = %self.inner.host, path, status = %resp.status(), "GET response is empty");
        Ok(())
    }

    /// Send a form-encoded POST and check the HTTP status.
    pub(crate) async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<reqwest::Response, Error> {
        let url = self.inner.base_url.join(path)?;
        debug!(host = %self.inner.host, "POST {}", url);

        let resp = self
            .http()?
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        check_status(resp, "POST", path)
    }
}

fn check_status(
    resp: reqwest::Response,
    method: &'static str,
    path: &str,
) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(Error::Http {
            method,
            path: path.to_owned(),
            status: status.as_u16(),
        })
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview = body.chars().take(200).collect::<String>();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

fn cache_buster() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
