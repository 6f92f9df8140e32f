// Serial Bridge endpoints
//
// Device enumeration (icon_desc), live status (icon_status), power counters,
// and the single action.cgi entry point used for every state change.

use tracing::debug;

use crate::error::Error;
use crate::session::client::Session;
use crate::session::models::{Counter, IconDesc, IconStatus};

const ACTION_PAGE: &str = "/user/action.cgi";

impl Session {
    /// Describe every slot of a device category.
    ///
    /// `GET /user/icon_desc.json?type={category}`
    pub async fn icon_desc(&self, category: &str) -> Result<IconDesc, Error> {
        debug!(category, "fetching device descriptions");
        self.get_json("/user/icon_desc.json", &[("type", category)])
            .await
    }

    /// Live status array of a device category.
    ///
    /// `GET /user/icon_status.json?type={category}`
    pub async fn icon_status(&self, category: &str) -> Result<IconStatus, Error> {
        self.get_json("/user/icon_status.json", &[("type", category)])
            .await
    }

    /// Instantaneous power readings for "other" devices.
    ///
    /// `GET /user/counter.json`
    pub async fn counter(&self) -> Result<Counter, Error> {
        self.get_json("/user/counter.json", &[]).await
    }

    /// Switch a device.
    ///
    /// `GET /user/action.cgi?type={category}&num{action}={index}`
    /// with `action` 0 = off/close, 1 = on/open. Success is status-only.
    pub async fn device_action(&self, category: &str, index: usize, action: u8) -> Result<(), Error> {
        let key = format!("num{action}");
        let index = index.to_string();
        debug!(category, index = %index, action, "device action");
        self.get_empty(ACTION_PAGE, &[("type", category), (key.as_str(), index.as_str())])
            .await
    }

    /// Drive a thermostat or humidistat.
    ///
    /// `GET /user/action.cgi?clima={index}&{mode}={action}&val={value}`
    /// where `mode` is `thermo` or `humi` and `value` is already scaled
    /// to tenths.
    pub async fn clima_action(
        &self,
        index: usize,
        mode: &str,
        action: &str,
        value: i64,
    ) -> Result<(), Error> {
        let index = index.to_string();
        let value = value.to_string();
        debug!(index = %index, mode, action, value = %value, "climate action");
        self.get_empty(
            ACTION_PAGE,
            &[("clima", index.as_str()), (mode, action), ("val", value.as_str())],
        )
        .await
    }
}
