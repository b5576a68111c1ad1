//! Ambient temperature/humidity event source.
//!
//! Like [`AirQualityEventSource`](super::air_quality::AirQualityEventSource),
//! a pure event source with no request handling.

use std::rc::Rc;

use serde_json::Value;

use crate::device::DeviceLink;
use crate::event::round_to_tenth;

const ACTION_CURRENT_TEMPERATURE: &str = "currentTemperature";

/// Temperature telemetry handle held by host firmware.
pub struct TemperatureEventSource {
    device: Rc<dyn DeviceLink>,
}

impl TemperatureEventSource {
    pub fn new(device: Rc<dyn DeviceLink>) -> Self {
        Self { device }
    }

    /// Report the measured temperature (°C) and relative humidity (%).
    ///
    /// Temperature is rounded to one decimal place on the event path;
    /// humidity is passed through as measured.
    pub fn send_temperature_event(&self, temperature: f32, humidity: f32, cause: &str) -> bool {
        let mut event = self.device.prepare_event(ACTION_CURRENT_TEMPERATURE, cause);
        event.value.insert(
            "temperature".to_owned(),
            Value::from(round_to_tenth(temperature)),
        );
        event
            .value
            .insert("humidity".to_owned(), Value::from(f64::from(humidity)));
        self.device.send_event(event)
    }
}
