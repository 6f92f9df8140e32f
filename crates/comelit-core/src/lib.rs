// comelit-core: Domain model and device clients between comelit-api and consumers (CLI).

pub mod bridge;
pub mod codec;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod units;
pub mod vedo;

// ── Primary re-exports ──────────────────────────────────────────────
pub use bridge::BridgeClient;
pub use config::{ClientConfig, DEFAULT_PORT, HostConfig};
pub use error::CoreError;
pub use units::{PowerUnits, Quantity, UnitRegistry};
pub use vedo::VedoClient;

pub use comelit_api::VedoRoute;
pub use comelit_api::session::ALL_ZONES;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AlarmArea, AlarmAreaState, AlarmData, AlarmZone, AlarmZoneState, ClimaAction, ClimaMode,
    Device, DeviceAction, DeviceState, DeviceTable, DeviceType, DeviceValue,
    ZoneAction,
};
