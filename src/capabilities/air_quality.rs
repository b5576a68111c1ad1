//! Air-quality event source.
//!
//! Pure event source: reports particulate readings but handles no inbound
//! requests, so it registers nothing with the device's handler chain.

use std::rc::Rc;

use serde_json::Value;

use crate::device::DeviceLink;

const ACTION_AIR_QUALITY: &str = "airQuality";

/// Air-quality telemetry handle held by host firmware.
pub struct AirQualityEventSource {
    device: Rc<dyn DeviceLink>,
}

impl AirQualityEventSource {
    pub fn new(device: Rc<dyn DeviceLink>) -> Self {
        Self { device }
    }

    /// Report particulate pollutant readings in µg/m³.
    ///
    /// Telemetry is usually sent with
    /// [`PERIODIC_POLL`](crate::event::cause::PERIODIC_POLL).  Returns the
    /// device's acceptance flag verbatim; no retry is attempted here —
    /// callers choose their own cadence against the throttled event channel.
    pub fn send_air_quality_event(&self, pm1: i32, pm2_5: i32, pm10: i32, cause: &str) -> bool {
        let mut event = self.device.prepare_event(ACTION_AIR_QUALITY, cause);
        event.value.insert("pm1".to_owned(), Value::from(pm1));
        event.value.insert("pm2_5".to_owned(), Value::from(pm2_5));
        event.value.insert("pm10".to_owned(), Value::from(pm10));
        self.device.send_event(event)
    }
}
