// ── Domain model ──
//
// Canonical representation of Serial Bridge devices and VEDO alarm
// areas/zones. Built from wire pages by `convert`, decoded by `codec`,
// handed to consumers (CLI) as plain data.

pub mod action;
pub mod alarm;
pub mod device;

pub use action::{ClimaAction, ClimaMode, DeviceAction, ZoneAction};
pub use alarm::{AlarmArea, AlarmAreaState, AlarmData, AlarmZone, AlarmZoneState};
pub use device::{Device, DeviceState, DeviceTable, DeviceType, DeviceValue, WATT};
