// ── Wire-to-domain conversion ──
//
// Builds domain records from comelit-api page models. Missing array
// entries read as zero/empty; the firmware trims trailing slots freely.

use std::collections::BTreeMap;

use comelit_api::models::{AreaStat, Counter, Flag, IconDesc, IconValue, ZoneStat};
use tracing::debug;

use crate::codec;
use crate::error::CoreError;
use crate::model::{AlarmArea, AlarmZone, Device, DeviceType, DeviceValue, WATT};
use crate::units::{self, UnitRegistry};

impl From<IconValue> for DeviceValue {
    fn from(value: IconValue) -> Self {
        match value {
            IconValue::Number(n) => Self::Number(n),
            IconValue::Nested(map) => Self::Nested(map),
            IconValue::Other(other) => Self::Number(
                other
                    .as_str()
                    .and_then(|s| s.trim().parse().ok())
                    .or_else(|| other.as_f64().map(|f| f.round() as i64))
                    .unwrap_or_default(),
            ),
        }
    }
}

fn flag_at(flags: &[Flag], index: usize) -> bool {
    flags.get(index).is_some_and(|f| f.is_set())
}

/// Build every configured device of one category.
///
/// Slots with an empty name are unconfigured and skipped. `counter` is
/// only consulted for [`DeviceType::Other`].
pub fn devices_from_desc(
    device_type: DeviceType,
    desc: &IconDesc,
    counter: Option<&Counter>,
    registry: &dyn UnitRegistry,
) -> BTreeMap<usize, Device> {
    let mut devices = BTreeMap::new();
    for index in 0..desc.num.min(desc.desc.len()) {
        let name = desc.desc.get(index).map_or("", String::as_str);
        if name.is_empty() {
            continue;
        }

        let status = desc.status.get(index).copied().unwrap_or_default();
        let power = counter
            .filter(|_| device_type == DeviceType::Other)
            .and_then(|c| c.instant_reading(index))
            .map_or(0.0, |reading| units::reading_to_watts(registry, &reading));
        let zone = if device_type == DeviceType::Scenario {
            String::new()
        } else {
            desc.env
                .get(index)
                .and_then(|&env| desc.env_desc.get(env))
                .cloned()
                .unwrap_or_default()
        };

        let device = Device {
            index,
            name: name.to_owned(),
            status,
            human_status: codec::device_state(device_type, status),
            device_type,
            value: desc.val.get(index).cloned().map(DeviceValue::from).unwrap_or_default(),
            protected: desc.protected.get(index).is_some_and(|&p| p != 0),
            zone,
            power,
            power_unit: WATT.to_owned(),
        };
        debug!(?device, "device");
        devices.insert(index, device);
    }
    devices
}

/// Combine an area's static description with fresh statistics.
pub fn area_with_stats(index: usize, name: &str, p1: bool, p2: bool, stat: &AreaStat) -> AlarmArea {
    let mut area = AlarmArea {
        index,
        name: name.to_owned(),
        p1,
        p2,
        ready: flag_at(&stat.ready, index),
        armed: flag_at(&stat.armed, index),
        alarm: flag_at(&stat.alarm, index),
        alarm_memory: flag_at(&stat.alarm_memory, index),
        sabotage: flag_at(&stat.sabotage, index),
        anomaly: flag_at(&stat.anomaly, index),
        in_time: flag_at(&stat.in_time, index),
        out_time: flag_at(&stat.out_time, index),
        ..AlarmArea::default()
    };
    area.human_status = codec::area_state(&area);
    debug!(?area, "area");
    area
}

/// Build a zone from its name and the statistics hex list.
pub fn zone_with_stats(index: usize, name: &str, stat: &ZoneStat) -> Result<AlarmZone, CoreError> {
    let status_api = stat
        .zone_status(index)
        .ok_or_else(|| CoreError::data(format!("zone {index} missing from zone statistics")))?;
    let status = codec::parse_zone_status(status_api).ok_or_else(|| {
        CoreError::data(format!("zone {index} has invalid status {status_api:?}"))
    })?;
    let zone = AlarmZone {
        index,
        name: name.to_owned(),
        status_api: status_api.to_owned(),
        status,
        human_status: codec::zone_state(status),
    };
    debug!(?zone, "zone");
    Ok(zone)
}

/// Indices whose presence flag is set.
pub fn present_indices(present: &[Flag]) -> impl Iterator<Item = usize> + '_ {
    present
        .iter()
        .enumerate()
        .filter_map(|(i, flag)| flag.is_set().then_some(i))
}
