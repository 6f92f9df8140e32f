// Wire response types
//
// Models for the JSON pages served by the Serial Bridge and the VEDO panel.
// Fields use `#[serde(default)]` liberally because the firmware omits
// arrays for empty categories and varies field presence across revisions.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Flag ─────────────────────────────────────────────────────────────

/// A boolean flag as reported by the device.
///
/// The same logical flag shows up as `true`, `1`, or `"1"` depending on the
/// page and firmware revision. Anything non-zero / non-empty reads as set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Flag(pub bool);

impl Flag {
    pub fn is_set(self) -> bool {
        self.0
    }
}

impl From<Flag> for bool {
    fn from(flag: Flag) -> Self {
        flag.0
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let set = match raw {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Value::String(s) => match s.trim() {
                "" | "false" => false,
                "true" => true,
                other => other.parse::<i64>().map_or(true, |v| v != 0),
            },
            Value::Null | Value::Array(_) | Value::Object(_) => false,
        };
        Ok(Self(set))
    }
}

// ── Session ──────────────────────────────────────────────────────────

/// `GET /login.json` -- liveness probe.
///
/// The bridge reports a `domus` identifier, the alarm a `logged` flag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginStatus {
    #[serde(default)]
    pub domus: Option<String>,
    #[serde(default)]
    pub logged: Flag,
}

// ── Serial Bridge ────────────────────────────────────────────────────

/// Raw `val` entry of an icon description: a plain number for most
/// devices, a nested object for climate/humidity controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IconValue {
    Number(i64),
    Nested(serde_json::Map<String, Value>),
    Other(Value),
}

impl Default for IconValue {
    fn default() -> Self {
        Self::Number(0)
    }
}

/// `GET /user/icon_desc.json?type=<category>`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IconDesc {
    #[serde(default)]
    pub num: usize,
    #[serde(default)]
    pub desc: Vec<String>,
    #[serde(default)]
    pub status: Vec<i64>,
    #[serde(default)]
    pub val: Vec<IconValue>,
    #[serde(default)]
    pub protected: Vec<i64>,
    /// Index into `env_desc` for each device.
    #[serde(default)]
    pub env: Vec<usize>,
    #[serde(default)]
    pub env_desc: Vec<String>,
}

/// `GET /user/icon_status.json?type=<category>`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IconStatus {
    #[serde(default)]
    pub status: Vec<i64>,
}

/// `GET /user/counter.json` -- instantaneous power readings.
///
/// Readings are unit-tagged strings such as `"120.5 W"`; some firmware
/// sends bare numbers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Counter {
    #[serde(default)]
    pub instant: Vec<Value>,
}

impl Counter {
    /// The reading at `index` as text, if present.
    pub fn instant_reading(&self, index: usize) -> Option<String> {
        match self.instant.get(index)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

// ── VEDO alarm ───────────────────────────────────────────────────────

/// `GET /user/[vedo_]area_desc.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AreaDesc {
    #[serde(default)]
    pub logged: Flag,
    #[serde(default)]
    pub present: Vec<Flag>,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub p1_pres: Vec<Flag>,
    #[serde(default)]
    pub p2_pres: Vec<Flag>,
}

/// `GET /user/[vedo_]zone_desc.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneDesc {
    #[serde(default)]
    pub logged: Flag,
    #[serde(default)]
    pub present: Vec<Flag>,
    #[serde(default)]
    pub description: Vec<String>,
    /// Area membership bitmask per zone (newer firmware only).
    #[serde(default)]
    pub in_area: Vec<Value>,
}

/// `GET /user/[vedo_]area_stat.json` -- one flag array per condition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AreaStat {
    #[serde(default)]
    pub logged: Flag,
    #[serde(default)]
    pub ready: Vec<Flag>,
    #[serde(default)]
    pub armed: Vec<Flag>,
    #[serde(default)]
    pub alarm: Vec<Flag>,
    #[serde(default)]
    pub alarm_memory: Vec<Flag>,
    #[serde(default)]
    pub sabotage: Vec<Flag>,
    #[serde(default)]
    pub anomaly: Vec<Flag>,
    #[serde(default)]
    pub in_time: Vec<Flag>,
    #[serde(default)]
    pub out_time: Vec<Flag>,
}

/// `GET /user/[vedo_]zone_stat.json`
///
/// `status` is a comma-separated list of hex bitmasks, one per zone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneStat {
    #[serde(default)]
    pub logged: Flag,
    #[serde(default)]
    pub status: String,
}

impl ZoneStat {
    /// The raw hex status of zone `index`.
    pub fn zone_status(&self, index: usize) -> Option<&str> {
        self.status.split(',').nth(index).map(str::trim)
    }
}

/// Pages that carry the alarm `logged` flag and, for description pages,
/// a `present` array.
pub trait AlarmPage {
    fn logged(&self) -> bool;

    /// Presence flags, `None` for statistics pages.
    fn present(&self) -> Option<&[Flag]> {
        None
    }

    /// The reply is usable: the session is alive and, for description
    /// pages, at least one slot is populated.
    fn is_valid(&self) -> bool {
        self.logged() && self.present().is_none_or(|p| p.iter().any(|f| f.is_set()))
    }
}

impl AlarmPage for AreaDesc {
    fn logged(&self) -> bool {
        self.logged.is_set()
    }

    fn present(&self) -> Option<&[Flag]> {
        Some(&self.present)
    }
}

impl AlarmPage for ZoneDesc {
    fn logged(&self) -> bool {
        self.logged.is_set()
    }

    fn present(&self) -> Option<&[Flag]> {
        Some(&self.present)
    }
}

impl AlarmPage for AreaStat {
    fn logged(&self) -> bool {
        self.logged.is_set()
    }
}

impl AlarmPage for ZoneStat {
    fn logged(&self) -> bool {
        self.logged.is_set()
    }
}
