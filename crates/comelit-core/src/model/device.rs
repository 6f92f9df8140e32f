// ── Serial Bridge device types ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Unit every power reading is normalized to.
pub const WATT: &str = "W";

/// Device category as served by `/user/icon_desc.json?type=...`.
///
/// `Display` and `FromStr` use the vendor wire name; the friendlier
/// `cover` / `climate` spellings are accepted when parsing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum DeviceType {
    #[serde(rename = "clima")]
    #[strum(to_string = "clima", serialize = "climate")]
    Climate,
    #[serde(rename = "shutter")]
    #[strum(to_string = "shutter", serialize = "cover")]
    Cover,
    #[strum(to_string = "irrigation")]
    Irrigation,
    #[strum(to_string = "light")]
    Light,
    #[strum(to_string = "other")]
    Other,
    #[strum(to_string = "scenario")]
    Scenario,
}

impl DeviceType {
    /// Order in which a full enumeration walks the categories.
    pub const ENUMERATION_ORDER: [Self; 6] = [
        Self::Climate,
        Self::Cover,
        Self::Light,
        Self::Irrigation,
        Self::Other,
        Self::Scenario,
    ];

    /// The `type=` query value for this category.
    pub fn wire_name(self) -> &'static str {
        self.into()
    }
}

/// Human-readable device status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceState {
    Off,
    On,
    Stopped,
    Opening,
    Closing,
}

/// Raw `val` of a device: a plain number for most devices, a nested
/// object (temperature, humidity, set points) for climate controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceValue {
    Number(i64),
    Nested(serde_json::Map<String, serde_json::Value>),
}

impl Default for DeviceValue {
    fn default() -> Self {
        Self::Number(0)
    }
}

/// One Serial Bridge device, as of the last enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Slot index, unique within `device_type` only.
    pub index: usize,
    pub name: String,
    pub status: i64,
    pub human_status: DeviceState,
    pub device_type: DeviceType,
    pub value: DeviceValue,
    pub protected: bool,
    /// Room the device is assigned to; empty for scenarios.
    pub zone: String,
    pub power: f64,
    pub power_unit: String,
}

/// Devices grouped by category, each keyed by slot index.
pub type DeviceTable = BTreeMap<DeviceType, BTreeMap<usize, Device>>;
