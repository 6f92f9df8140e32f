// ── VEDO alarm client ──
//
// Reads areas and zones from a VEDO panel, directly or through a Serial
// Bridge, and arms/disarms zones. Every page fetch is preceded by a short
// pause; a reply showing an expired session gets exactly one re-login
// and retry.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use comelit_api::models::{AlarmPage, AreaDesc, AreaStat, ZoneDesc, ZoneStat};
use comelit_api::{HostKind, Session, VedoRoute};
use secrecy::SecretString;
use tracing::{debug, warn};

use crate::config::{ClientConfig, HostConfig};
use crate::convert::{self, present_indices};
use crate::error::CoreError;
use crate::model::{AlarmArea, AlarmData, AlarmZone, ZoneAction};

/// Client for a VEDO alarm panel.
///
/// Area and zone descriptions are fetched once per client and reused;
/// statistics are fetched on every call.
pub struct VedoClient {
    session: Session,
    pin: SecretString,
    route: VedoRoute,
    config: ClientConfig,
    area_desc: RwLock<Option<Arc<AreaDesc>>>,
    zone_desc: RwLock<Option<Arc<ZoneDesc>>>,
}

impl std::fmt::Debug for VedoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VedoClient")
            .field("session", &self.session)
            .field("route", &self.route)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl VedoClient {
    /// Client talking to the panel at `http://{host}:{port}`.
    pub fn new(host: &HostConfig, config: ClientConfig) -> Result<Self, CoreError> {
        let session = Session::new(&host.host, host.port, config.transport())?;
        Ok(Self::with_session(
            session,
            host.pin.clone(),
            VedoRoute::Direct,
            config,
        ))
    }

    /// Client over an existing session. With [`VedoRoute::ViaBridge`] the
    /// session is normally the bridge's own (see [`BridgeClient::vedo`]).
    ///
    /// [`BridgeClient::vedo`]: crate::BridgeClient::vedo
    pub fn with_session(
        session: Session,
        pin: SecretString,
        route: VedoRoute,
        config: ClientConfig,
    ) -> Self {
        Self {
            session,
            pin,
            route,
            config,
            area_desc: RwLock::new(None),
            zone_desc: RwLock::new(None),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn route(&self) -> VedoRoute {
        self.route
    }

    pub fn host(&self) -> &str {
        self.session.host()
    }

    // ── Session lifecycle ────────────────────────────────────────────

    pub async fn login(&self) -> Result<bool, CoreError> {
        Ok(self.session.login(HostKind::Vedo, &self.pin).await?)
    }

    pub async fn logout(&self) -> Result<(), CoreError> {
        Ok(self.session.logout().await?)
    }

    /// Release the transport. Idempotent. A client bound to a bridge
    /// closes the shared session.
    pub fn close(&self) {
        self.session.close();
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Arm or disarm zone `index`, or every zone with
    /// [`ALL_ZONES`](comelit_api::session::ALL_ZONES).
    pub async fn set_zone_status(
        &self,
        index: usize,
        action: ZoneAction,
        force: bool,
    ) -> Result<bool, CoreError> {
        self.session
            .zone_action(self.route, index, action.wire_name(), force)
            .await?;
        Ok(true)
    }

    // ── Status ───────────────────────────────────────────────────────

    /// Refresh one area's statistics, keeping its known description.
    pub async fn get_area_status(&self, area: &AlarmArea) -> Result<AlarmArea, CoreError> {
        let stat = self.area_stat().await?;
        Ok(convert::area_with_stats(
            area.index, &area.name, area.p1, area.p2, &stat,
        ))
    }

    /// Refresh one zone's status, keeping its known name.
    pub async fn get_zone_status(&self, zone: &AlarmZone) -> Result<AlarmZone, CoreError> {
        let stat = self.zone_stat().await?;
        convert::zone_with_stats(zone.index, &zone.name, &stat)
    }

    /// Every present area and zone with fresh statistics.
    pub async fn get_all_areas_and_zones(&self) -> Result<AlarmData, CoreError> {
        let area_desc = self.area_desc().await?;
        let zone_desc = self.zone_desc().await?;
        let area_stat = self.area_stat().await?;
        let zone_stat = self.zone_stat().await?;

        let areas = present_indices(&area_desc.present)
            .map(|i| {
                let name = area_desc.description.get(i).map_or("", String::as_str);
                let p1 = area_desc.p1_pres.get(i).is_some_and(|f| f.is_set());
                let p2 = area_desc.p2_pres.get(i).is_some_and(|f| f.is_set());
                (i, convert::area_with_stats(i, name, p1, p2, &area_stat))
            })
            .collect();

        let zones = present_indices(&zone_desc.present)
            .map(|i| {
                let name = zone_desc.description.get(i).map_or("", String::as_str);
                convert::zone_with_stats(i, name, &zone_stat).map(|zone| (i, zone))
            })
            .collect::<Result<_, CoreError>>()?;

        Ok(AlarmData { areas, zones })
    }

    // ── Page fetching ────────────────────────────────────────────────

    async fn area_desc(&self) -> Result<Arc<AreaDesc>, CoreError> {
        self.cached(&self.area_desc, "area description", || {
            self.session.area_desc(self.route)
        })
        .await
    }

    async fn zone_desc(&self) -> Result<Arc<ZoneDesc>, CoreError> {
        self.cached(&self.zone_desc, "zone description", || {
            self.session.zone_desc(self.route)
        })
        .await
    }

    async fn area_stat(&self) -> Result<AreaStat, CoreError> {
        self.fetch_page("area statistics", || self.session.area_stat(self.route))
            .await
    }

    async fn zone_stat(&self) -> Result<ZoneStat, CoreError> {
        self.fetch_page("zone statistics", || self.session.zone_stat(self.route))
            .await
    }

    async fn cached<T, F, Fut>(
        &self,
        slot: &RwLock<Option<Arc<T>>>,
        label: &str,
        fetch: F,
    ) -> Result<Arc<T>, CoreError>
    where
        T: AlarmPage,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, comelit_api::Error>>,
    {
        if let Some(page) = slot.read().unwrap_or_else(PoisonError::into_inner).clone() {
            debug!(host = %self.host(), page = label, "already retrieved, skipping");
            return Ok(page);
        }
        let page = Arc::new(self.fetch_page(label, fetch).await?);
        *slot.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&page));
        Ok(page)
    }

    /// Fetch an alarm page, re-logging in once if the reply shows an
    /// expired session (or, for descriptions, no present entry).
    async fn fetch_page<T, F, Fut>(&self, label: &str, fetch: F) -> Result<T, CoreError>
    where
        T: AlarmPage,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, comelit_api::Error>>,
    {
        self.pause().await;
        let page = fetch().await?;
        if page.is_valid() {
            return Ok(page);
        }

        warn!(host = %self.host(), page = label, "login expired, re-login attempt");
        match self.login().await {
            Ok(_) => {}
            // A rejected re-login still spends the one retry.
            Err(e) if e.is_authentication() => {
                warn!(host = %self.host(), page = label, error = %e, "re-login rejected");
            }
            Err(e) => return Err(e),
        }
        self.pause().await;
        let page = fetch().await?;
        if !page.is_valid() {
            return Err(CoreError::data(format!(
                "{label}: login expired and not working after a retry"
            )));
        }
        debug!(host = %self.host(), page = label, "re-login successful");
        Ok(page)
    }

    async fn pause(&self) {
        let delay = self.config.vedo_call_interval;
        if !delay.is_zero() {
            debug!(delay_ms = delay.as_millis(), "sleeping before next call");
            tokio::time::sleep(delay).await;
        }
    }
}
