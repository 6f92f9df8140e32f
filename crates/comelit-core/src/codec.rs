// ── Status codec ──
//
// Pure translation of raw vendor status values into domain states. The
// area and zone tables are priority ordered: the first matching entry wins.

use crate::model::{AlarmArea, AlarmAreaState, AlarmZoneState, DeviceState, DeviceType};

/// Status code reported by a switched-on device.
pub const STATE_ON: i64 = 1;

/// Area flags in decreasing priority. An area armed while still counting
/// down its exit delay reports `ExitDelay`.
const AREA_PRIORITY: &[(fn(&AlarmArea) -> bool, AlarmAreaState)] = &[
    (|a| a.out_time, AlarmAreaState::ExitDelay),
    (|a| a.in_time, AlarmAreaState::EntryDelay),
    (|a| a.anomaly, AlarmAreaState::Anomaly),
    (|a| a.sabotage, AlarmAreaState::Sabotage),
    (|a| a.alarm, AlarmAreaState::Triggered),
    (|a| a.armed, AlarmAreaState::Armed),
    (|a| a.ready, AlarmAreaState::Disarmed),
];

/// Zone bits in decreasing priority. A zone in alarm is reported as
/// open + alarm + armed (0x33), so the alarm bit comes before open.
const ZONE_PRIORITY: &[(u32, AlarmZoneState)] = &[
    (2, AlarmZoneState::Alarm),
    (1, AlarmZoneState::Open),
    (4, AlarmZoneState::Faulty),
    (8, AlarmZoneState::Sabotated),
    (32, AlarmZoneState::Armed),
    (128, AlarmZoneState::Excluded),
    (256, AlarmZoneState::Isolated),
    (512, AlarmZoneState::Unavailable),
    (32768, AlarmZoneState::Inhibited),
];

/// Decode a bridge device status code.
///
/// Covers map `0/1/2` to stopped/opening/closing; any other cover code
/// reads as stopped. Every other category is on for `1`, off otherwise.
pub fn device_state(device_type: DeviceType, status: i64) -> DeviceState {
    match device_type {
        DeviceType::Cover => match status {
            1 => DeviceState::Opening,
            2 => DeviceState::Closing,
            _ => DeviceState::Stopped,
        },
        _ if status == STATE_ON => DeviceState::On,
        _ => DeviceState::Off,
    }
}

/// Summarize an area's statistics flags. Never returns `Unknown`.
pub fn area_state(area: &AlarmArea) -> AlarmAreaState {
    AREA_PRIORITY
        .iter()
        .find(|(is_set, _)| is_set(area))
        .map_or(AlarmAreaState::Disarmed, |&(_, state)| state)
}

/// Summarize a zone status bitmask. Never returns `Unknown`.
pub fn zone_state(status: u32) -> AlarmZoneState {
    ZONE_PRIORITY
        .iter()
        .find(|&&(bit, _)| status & bit != 0)
        .map_or(AlarmZoneState::Rest, |&(_, state)| state)
}

/// Parse a zone's hex status (`"20"`, `"0x33"`, `" 1 "`).
pub fn parse_zone_status(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    u32::from_str_radix(digits, 16).ok()
}
