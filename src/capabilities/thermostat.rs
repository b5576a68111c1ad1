//! Thermostat capability — target temperature and operating mode.
//!
//! Single-target pattern: one callback slot per action, no instance keying.
//! Registering a callback twice replaces the previous one.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use serde_json::Value;

use crate::device::{DeviceLink, RequestHandler};
use crate::event::round_to_tenth;
use crate::payload::FieldAccess;
use crate::request::CloudRequest;

const ACTION_TARGET_TEMPERATURE: &str = "targetTemperature";
const ACTION_ADJUST_TARGET_TEMPERATURE: &str = "adjustTargetTemperature";
const ACTION_SET_THERMOSTAT_MODE: &str = "setThermostatMode";

const FIELD_TEMPERATURE: &str = "temperature";
const FIELD_THERMOSTAT_MODE: &str = "thermostatMode";

/// Substituted when a `targetTemperature` request omits the field.
const DEFAULT_TARGET_TEMPERATURE: f32 = 1.0;

/// Called for `setThermostatMode`.  In: requested mode (`"AUTO"`, `"COOL"`,
/// `"HEAT"`, or `""` when the field was absent).  Out: the mode the device
/// actually applied.
pub type ThermostatModeCallback = Box<dyn FnMut(&str, &mut String) -> bool>;

/// Called for `targetTemperature`.  In: requested absolute temperature.
/// Out: the temperature the device actually applied.
pub type SetTargetTemperatureCallback = Box<dyn FnMut(&str, &mut f32) -> bool>;

/// Called for `adjustTargetTemperature`.  In: the relative delta.  Out: the
/// resulting absolute temperature.
pub type AdjustTargetTemperatureCallback = Box<dyn FnMut(&str, &mut f32) -> bool>;

#[derive(Default)]
struct ThermostatCallbacks {
    thermostat_mode: Option<ThermostatModeCallback>,
    target_temperature: Option<SetTargetTemperatureCallback>,
    adjust_target_temperature: Option<AdjustTargetTemperatureCallback>,
}

/// Shared between the firmware-facing capability and the handler chain.
struct ThermostatCore {
    device_id: String,
    callbacks: RefCell<ThermostatCallbacks>,
}

/// Thermostat-style capability handle held by host firmware.
///
/// Construction registers the request-handling entry point with the device;
/// the `on_*` methods register domain callbacks and the `send_*` methods
/// emit outbound state-change events.
pub struct ThermostatCapability {
    core: Rc<ThermostatCore>,
    device: Rc<dyn DeviceLink>,
}

impl ThermostatCapability {
    pub fn new(device: Rc<dyn DeviceLink>) -> Self {
        let core = Rc::new(ThermostatCore {
            device_id: device.device_id().to_owned(),
            callbacks: RefCell::new(ThermostatCallbacks::default()),
        });
        device.register_handler(Rc::clone(&core) as Rc<dyn RequestHandler>);
        Self { core, device }
    }

    // ── Callback registration ─────────────────────────────────

    /// Register the `setThermostatMode` callback, replacing any prior one.
    pub fn on_thermostat_mode(
        &self,
        callback: impl FnMut(&str, &mut String) -> bool + 'static,
    ) {
        self.core.callbacks.borrow_mut().thermostat_mode = Some(Box::new(callback));
    }

    /// Register the `targetTemperature` callback, replacing any prior one.
    pub fn on_target_temperature(
        &self,
        callback: impl FnMut(&str, &mut f32) -> bool + 'static,
    ) {
        self.core.callbacks.borrow_mut().target_temperature = Some(Box::new(callback));
    }

    /// Register the `adjustTargetTemperature` callback, replacing any prior
    /// one.
    pub fn on_adjust_target_temperature(
        &self,
        callback: impl FnMut(&str, &mut f32) -> bool + 'static,
    ) {
        self.core.callbacks.borrow_mut().adjust_target_temperature = Some(Box::new(callback));
    }

    // ── Event emission ────────────────────────────────────────

    /// Report the mode the device has been set to (`"AUTO"`, `"COOL"`,
    /// `"HEAT"`).  Returns whether the device accepted the event for
    /// delivery.
    pub fn send_thermostat_mode_event(&self, mode: &str, cause: &str) -> bool {
        let mut event = self.device.prepare_event(ACTION_SET_THERMOSTAT_MODE, cause);
        event
            .value
            .insert(FIELD_THERMOSTAT_MODE.to_owned(), Value::from(mode));
        self.device.send_event(event)
    }

    /// Report a target-temperature change.  The value is rounded to one
    /// decimal place on this path only.
    pub fn send_target_temperature_event(&self, temperature: f32, cause: &str) -> bool {
        let mut event = self.device.prepare_event(ACTION_TARGET_TEMPERATURE, cause);
        event.value.insert(
            FIELD_TEMPERATURE.to_owned(),
            Value::from(round_to_tenth(temperature)),
        );
        self.device.send_event(event)
    }
}

impl RequestHandler for ThermostatCore {
    fn handle(&self, request: &mut CloudRequest) -> bool {
        match request.action.as_str() {
            ACTION_TARGET_TEMPERATURE => {
                let mut temperature = request
                    .request_value
                    .f32_or(FIELD_TEMPERATURE, DEFAULT_TARGET_TEMPERATURE);
                let success = match self.callbacks.borrow_mut().target_temperature.as_mut() {
                    Some(callback) => callback(&self.device_id, &mut temperature),
                    None => false,
                };
                debug!(
                    "thermostat[{}]: targetTemperature {} (success={})",
                    self.device_id, temperature, success
                );
                request
                    .response_value
                    .insert(FIELD_TEMPERATURE.to_owned(), Value::from(temperature));
                success
            }

            ACTION_ADJUST_TARGET_TEMPERATURE => {
                // The delta has no defined default: a request without it is
                // malformed and must not reach the callback.
                let mut delta = match request.request_value.require_f32(FIELD_TEMPERATURE) {
                    Ok(delta) => delta,
                    Err(e) => {
                        warn!(
                            "thermostat[{}]: adjustTargetTemperature rejected: {}",
                            self.device_id, e
                        );
                        return false;
                    }
                };
                let success = match self
                    .callbacks
                    .borrow_mut()
                    .adjust_target_temperature
                    .as_mut()
                {
                    Some(callback) => callback(&self.device_id, &mut delta),
                    None => false,
                };
                debug!(
                    "thermostat[{}]: adjustTargetTemperature -> {} (success={})",
                    self.device_id, delta, success
                );
                request
                    .response_value
                    .insert(FIELD_TEMPERATURE.to_owned(), Value::from(delta));
                success
            }

            ACTION_SET_THERMOSTAT_MODE => {
                let mut mode = request.request_value.str_or(FIELD_THERMOSTAT_MODE, "");
                let success = match self.callbacks.borrow_mut().thermostat_mode.as_mut() {
                    Some(callback) => callback(&self.device_id, &mut mode),
                    None => false,
                };
                debug!(
                    "thermostat[{}]: setThermostatMode '{}' (success={})",
                    self.device_id, mode, success
                );
                request
                    .response_value
                    .insert(FIELD_THERMOSTAT_MODE.to_owned(), Value::String(mode));
                success
            }

            _ => false,
        }
    }
}
