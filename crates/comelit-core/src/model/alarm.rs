// ── VEDO alarm types ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::Display;

/// Summarized state of an alarm area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlarmAreaState {
    Anomaly,
    Armed,
    Disarmed,
    EntryDelay,
    ExitDelay,
    Sabotage,
    Triggered,
    #[default]
    Unknown,
}

/// Summarized state of an alarm zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlarmZoneState {
    Alarm,
    Armed,
    Open,
    Excluded,
    Faulty,
    Inhibited,
    Isolated,
    Rest,
    Sabotated,
    Unavailable,
    #[default]
    Unknown,
}

/// An alarm area: static description plus the latest statistics flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmArea {
    pub index: usize,
    pub name: String,
    /// Partial arming profile 1 available.
    pub p1: bool,
    /// Partial arming profile 2 available.
    pub p2: bool,
    pub ready: bool,
    pub armed: bool,
    pub alarm: bool,
    pub alarm_memory: bool,
    pub sabotage: bool,
    pub anomaly: bool,
    pub in_time: bool,
    pub out_time: bool,
    pub human_status: AlarmAreaState,
}

/// An alarm zone (sensor) and its decoded status bitmask.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmZone {
    pub index: usize,
    pub name: String,
    /// Hex bitmask exactly as reported by the panel.
    pub status_api: String,
    pub status: u32,
    pub human_status: AlarmZoneState,
}

/// Every present area and zone, keyed by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmData {
    pub areas: BTreeMap<usize, AlarmArea>,
    pub zones: BTreeMap<usize, AlarmZone>,
}
