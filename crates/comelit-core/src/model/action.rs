// ── Actuation commands ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// On/off (open/close for covers) command for a bridge device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceAction {
    #[strum(to_string = "off", serialize = "close")]
    Off,
    #[strum(to_string = "on", serialize = "open")]
    On,
}

impl DeviceAction {
    /// The digit used in the `num{action}` query key.
    pub fn code(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }
}

/// Thermostat / humidistat command.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ClimaAction {
    Auto,
    Man,
    On,
    Off,
    Set,
}

impl ClimaAction {
    pub fn wire_name(self) -> &'static str {
        self.into()
    }
}

/// Which controller of a climate device a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ClimaMode {
    Thermo,
    Humi,
}

impl ClimaMode {
    pub fn wire_name(self) -> &'static str {
        self.into()
    }
}

/// Arm/disarm command for alarm zones.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
pub enum ZoneAction {
    #[strum(to_string = "tot", serialize = "arm")]
    Arm,
    #[strum(to_string = "dis", serialize = "disarm")]
    Disarm,
}

impl ZoneAction {
    /// The query key selecting the action on `action.cgi`.
    pub fn wire_name(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_vendor_keys() {
        assert_eq!(ZoneAction::Arm.wire_name(), "tot");
        assert_eq!(ZoneAction::Disarm.wire_name(), "dis");
        assert_eq!(ClimaMode::Humi.wire_name(), "humi");
        assert_eq!(ClimaAction::Man.wire_name(), "man");
        assert_eq!(DeviceAction::On.code(), 1);
        assert_eq!("close".parse::<DeviceAction>().ok(), Some(DeviceAction::Off));
    }
}
