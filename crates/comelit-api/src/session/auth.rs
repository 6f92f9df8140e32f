// Session authentication
//
// Cookie-based pseudo-session login/logout plus the `/login.json` liveness
// probe. The login endpoint sets a session cookie in the shared store;
// subsequent requests carry it automatically.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::auth::HostKind;
use crate::error::Error;
use crate::session::client::Session;
use crate::session::models::LoginStatus;

const LOGIN_STATUS_PAGE: &str = "/login.json";
const LOGIN_PAGE: &str = "/login.cgi";

impl Session {
    /// Probe `/login.json` and interpret it for `kind`.
    pub async fn check_logged_in(&self, kind: HostKind) -> Result<bool, Error> {
        let status: LoginStatus = self.get_json(LOGIN_STATUS_PAGE, &[]).await?;
        let logged = kind.is_logged_in(&status);
        debug!(host = %self.host(), %kind, logged, "login status");
        Ok(logged)
    }

    /// Authenticate against the device with its PIN.
    ///
    /// Idempotent: when the liveness probe already reports an active
    /// session no credentials are sent. Otherwise the PIN is posted under
    /// the host-specific field. A reply without any cookie, or a probe
    /// that still reports logged-out afterwards, is an
    /// [`Error::Authentication`].
    ///
    /// Returns `Ok(true)` once the session is authenticated.
    pub async fn login(&self, kind: HostKind, pin: &SecretString) -> Result<bool, Error> {
        debug!(host = %self.host(), %kind, "logging in");
        self.open()?;

        if self.check_logged_in(kind).await? {
            return Ok(true);
        }

        let resp = self
            .post_form(LOGIN_PAGE, &[(kind.login_field(), pin.expose_secret())])
            .await?;
        let issued = resp.cookies().count();
        debug!(host = %self.host(), %kind, cookies = issued, "login reply");

        if issued == 0 {
            warn!(host = %self.host(), %kind, "authentication failed: no cookies received");
            return Err(Error::Authentication {
                message: format!("{kind} at {} issued no session cookie", self.host()),
            });
        }

        if !self.check_logged_in(kind).await? {
            warn!(host = %self.host(), %kind, "authentication failed: session not active after login");
            return Err(Error::Authentication {
                message: format!("{kind} at {} rejected the session cookie", self.host()),
            });
        }

        info!(host = %self.host(), %kind, "logged in");
        Ok(true)
    }

    /// End the server-side session.
    ///
    /// The local cookie store is cleared whatever the server answers; a
    /// transport or HTTP failure of the logout call is still returned.
    /// Does nothing when the transport is not open.
    pub async fn logout(&self) -> Result<(), Error> {
        if !self.is_open() {
            return Ok(());
        }
        debug!(host = %self.host(), "logging out");
        let result = self.post_form(LOGIN_PAGE, &[("logout", "1")]).await;
        self.clear_cookies();
        result?;
        debug!(host = %self.host(), "logout complete");
        Ok(())
    }
}
