// ── Serial Bridge client ──
//
// Enumerates and drives bridge devices over a `Session`. Climate and
// humidity commands share one paced actuator; the device drops commands
// that arrive too close together.

use std::sync::{Arc, PoisonError, RwLock};

use comelit_api::models::AlarmPage;
use comelit_api::{HostKind, Session, VedoRoute};
use secrecy::SecretString;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, HostConfig};
use crate::convert;
use crate::error::CoreError;
use crate::model::{ClimaAction, ClimaMode, DeviceAction, DeviceTable, DeviceType};
use crate::units::{PowerUnits, UnitRegistry};
use crate::vedo::VedoClient;

/// Client for a Comelit Serial Bridge.
///
/// Holds the last successful device enumeration. A failed enumeration
/// leaves it untouched.
pub struct BridgeClient {
    session: Session,
    pin: SecretString,
    config: ClientConfig,
    registry: Arc<dyn UnitRegistry>,
    /// `None` until the first enumeration succeeds.
    devices: RwLock<Option<DeviceTable>>,
    /// Serializes climate commands; holds when the previous one finished.
    clima_gate: Mutex<Option<Instant>>,
    vedo_enabled: OnceCell<bool>,
}

impl std::fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeClient")
            .field("session", &self.session)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BridgeClient {
    /// Bridge client for `http://{host}:{port}`. No I/O happens here.
    pub fn new(host: &HostConfig, config: ClientConfig) -> Result<Self, CoreError> {
        let session = Session::new(&host.host, host.port, config.transport())?;
        Ok(Self::with_session(session, host.pin.clone(), config))
    }

    /// Bridge client over an existing session (e.g. one pointed at a mock).
    pub fn with_session(session: Session, pin: SecretString, config: ClientConfig) -> Self {
        Self {
            session,
            pin,
            config,
            registry: Arc::new(PowerUnits),
            devices: RwLock::new(None),
            clima_gate: Mutex::new(None),
            vedo_enabled: OnceCell::new(),
        }
    }

    /// Replace the unit registry used to normalize power readings.
    pub fn with_unit_registry(mut self, registry: Arc<dyn UnitRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn host(&self) -> &str {
        self.session.host()
    }

    /// The table from the last successful enumeration, if any.
    pub fn devices(&self) -> Option<DeviceTable> {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ── Session lifecycle ────────────────────────────────────────────

    pub async fn login(&self) -> Result<bool, CoreError> {
        Ok(self.session.login(HostKind::Bridge, &self.pin).await?)
    }

    pub async fn logout(&self) -> Result<(), CoreError> {
        Ok(self.session.logout().await?)
    }

    /// Release the transport. Idempotent.
    pub fn close(&self) {
        self.session.close();
    }

    // ── Devices ──────────────────────────────────────────────────────

    /// Enumerate every configured device, category by category.
    ///
    /// On the first enumeration a category reporting devices but no
    /// descriptions is a data error. Later enumerations treat it as a
    /// transient empty reply and keep that category's previous entries.
    pub async fn get_all_devices(&self) -> Result<DeviceTable, CoreError> {
        debug!(host = %self.host(), "getting all devices");
        let previous = self.devices();
        let first = previous.is_none();
        let mut table = previous.unwrap_or_default();

        for device_type in DeviceType::ENUMERATION_ORDER {
            let desc = self.session.icon_desc(device_type.wire_name()).await?;

            if desc.num > 0 && desc.desc.is_empty() {
                if first {
                    return Err(CoreError::data(format!(
                        "{device_type} reports {} devices but no descriptions",
                        desc.num
                    )));
                }
                warn!(host = %self.host(), %device_type, "empty description reply, keeping previous devices");
                continue;
            }

            let counter = if device_type == DeviceType::Other && desc.num > 0 {
                Some(self.session.counter().await?)
            } else {
                None
            };

            let devices = convert::devices_from_desc(
                device_type,
                &desc,
                counter.as_ref(),
                self.registry.as_ref(),
            );
            debug!(host = %self.host(), %device_type, count = devices.len(), "devices enumerated");
            table.insert(device_type, devices);
        }

        *self.devices.write().unwrap_or_else(PoisonError::into_inner) = Some(table.clone());
        Ok(table)
    }

    /// Current raw status code of one device.
    pub async fn get_device_status(
        &self,
        device_type: DeviceType,
        index: usize,
    ) -> Result<i64, CoreError> {
        let reply = self.session.icon_status(device_type.wire_name()).await?;
        let status = reply.status.get(index).copied().ok_or_else(|| {
            CoreError::data(format!("{device_type} {index} missing from status reply"))
        })?;
        debug!(%device_type, index, status, "device status");
        Ok(status)
    }

    /// Switch a device on/off (open/close for covers).
    pub async fn set_device_status(
        &self,
        device_type: DeviceType,
        index: usize,
        action: DeviceAction,
    ) -> Result<bool, CoreError> {
        self.session
            .device_action(device_type.wire_name(), index, action.code())
            .await?;
        Ok(true)
    }

    // ── Climate ──────────────────────────────────────────────────────

    /// Drive a thermostat; `temperature` in degrees, e.g. `21.5`.
    pub async fn set_clima_status(
        &self,
        index: usize,
        action: ClimaAction,
        temperature: f64,
    ) -> Result<bool, CoreError> {
        self.set_thermo_humi_status(index, ClimaMode::Thermo, action, temperature)
            .await
    }

    /// Drive a humidistat; `humidity` in percent.
    pub async fn set_humidity_status(
        &self,
        index: usize,
        action: ClimaAction,
        humidity: f64,
    ) -> Result<bool, CoreError> {
        self.set_thermo_humi_status(index, ClimaMode::Humi, action, humidity)
            .await
    }

    async fn set_thermo_humi_status(
        &self,
        index: usize,
        mode: ClimaMode,
        action: ClimaAction,
        value: f64,
    ) -> Result<bool, CoreError> {
        let mut last = self.clima_gate.lock().await;

        if let Some(finished) = *last {
            let interval = self.config.bridge_call_interval;
            let elapsed = finished.elapsed();
            if elapsed < interval {
                let wait = interval - elapsed;
                debug!(wait_ms = wait.as_millis(), "climate call queued");
                tokio::time::sleep(wait).await;
            }
        }

        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let scaled = (value * 10.0).round() as i64;
        let result = self
            .session
            .clima_action(index, mode.wire_name(), action.wire_name(), scaled)
            .await;
        *last = Some(Instant::now());

        result?;
        Ok(true)
    }

    // ── VEDO through the bridge ──────────────────────────────────────

    /// Whether the VEDO panel answers through this bridge with `pin`.
    ///
    /// Authentication and data failures read as `false`; connectivity
    /// failures are returned. The answer is cached for the client lifetime
    /// unless [`ClientConfig::recheck_vedo`] is set.
    pub async fn vedo_enabled(&self, pin: &SecretString) -> Result<bool, CoreError> {
        if !self.config.recheck_vedo {
            if let Some(&enabled) = self.vedo_enabled.get() {
                return Ok(enabled);
            }
        }

        let enabled = match self.probe_vedo(pin).await {
            Ok(enabled) => enabled,
            Err(e) if e.is_authentication() || e.is_data() => {
                debug!(host = %self.host(), error = %e, "VEDO not reachable through bridge");
                false
            }
            Err(e) => return Err(e),
        };
        info!(host = %self.host(), enabled, "VEDO through bridge");

        if !self.config.recheck_vedo {
            // A concurrent probe may have won; either answer is current.
            let _ = self.vedo_enabled.set(enabled);
        }
        Ok(enabled)
    }

    async fn probe_vedo(&self, pin: &SecretString) -> Result<bool, CoreError> {
        self.session.login(HostKind::Vedo, pin).await?;
        let desc = self.session.area_desc(VedoRoute::ViaBridge).await?;
        Ok(desc.is_valid())
    }

    /// An alarm client riding on this bridge's session.
    pub fn vedo(&self, pin: SecretString) -> VedoClient {
        VedoClient::with_session(
            self.session.clone(),
            pin,
            VedoRoute::ViaBridge,
            self.config.clone(),
        )
    }
}
