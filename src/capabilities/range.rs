//! Range capability — absolute/relative integer range values, with optional
//! named instances.
//!
//! Multi-instance pattern: each action family has a default callback slot
//! (used when the request carries no instance) plus a map keyed by instance
//! name.  A request for a named instance with no matching keyed callback is
//! NOT routed to the default slot — it stays unfulfilled.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;
use serde_json::Value;

use crate::device::{DeviceLink, RequestHandler};
use crate::payload::FieldAccess;
use crate::request::CloudRequest;

const ACTION_SET_RANGE_VALUE: &str = "setRangeValue";
const ACTION_ADJUST_RANGE_VALUE: &str = "adjustRangeValue";

const FIELD_RANGE_VALUE: &str = "rangeValue";
const FIELD_RANGE_VALUE_DELTA: &str = "rangeValueDelta";

/// Called for `setRangeValue` with no instance.  In: requested value.
/// Out: the value the device actually applied.
pub type SetRangeValueCallback = Box<dyn FnMut(&str, &mut i32) -> bool>;

/// Called for `setRangeValue` on a named instance.  Receives the instance
/// name as its second argument.
pub type InstanceSetRangeValueCallback = Box<dyn FnMut(&str, &str, &mut i32) -> bool>;

/// Called for `adjustRangeValue` with no instance.  In: the delta.  Out: the
/// resulting absolute value.
pub type AdjustRangeValueCallback = Box<dyn FnMut(&str, &mut i32) -> bool>;

/// Called for `adjustRangeValue` on a named instance.
pub type InstanceAdjustRangeValueCallback = Box<dyn FnMut(&str, &str, &mut i32) -> bool>;

#[derive(Default)]
struct RangeCallbacks {
    set_range_value: Option<SetRangeValueCallback>,
    set_range_value_by_instance: HashMap<String, InstanceSetRangeValueCallback>,
    adjust_range_value: Option<AdjustRangeValueCallback>,
    adjust_range_value_by_instance: HashMap<String, InstanceAdjustRangeValueCallback>,
}

struct RangeCore {
    device_id: String,
    callbacks: RefCell<RangeCallbacks>,
}

/// Range-style capability handle held by host firmware.
pub struct RangeCapability {
    core: Rc<RangeCore>,
    device: Rc<dyn DeviceLink>,
}

impl RangeCapability {
    pub fn new(device: Rc<dyn DeviceLink>) -> Self {
        let core = Rc::new(RangeCore {
            device_id: device.device_id().to_owned(),
            callbacks: RefCell::new(RangeCallbacks::default()),
        });
        device.register_handler(Rc::clone(&core) as Rc<dyn RequestHandler>);
        Self { core, device }
    }

    // ── Callback registration ─────────────────────────────────

    /// Register the default `setRangeValue` callback, replacing any prior
    /// one.
    pub fn on_range_value(&self, callback: impl FnMut(&str, &mut i32) -> bool + 'static) {
        self.core.callbacks.borrow_mut().set_range_value = Some(Box::new(callback));
    }

    /// Register a `setRangeValue` callback for a named instance.  The most
    /// recent registration per instance name wins.
    pub fn on_range_value_for(
        &self,
        instance: impl Into<String>,
        callback: impl FnMut(&str, &str, &mut i32) -> bool + 'static,
    ) {
        self.core
            .callbacks
            .borrow_mut()
            .set_range_value_by_instance
            .insert(instance.into(), Box::new(callback));
    }

    /// Register the default `adjustRangeValue` callback.
    pub fn on_adjust_range_value(&self, callback: impl FnMut(&str, &mut i32) -> bool + 'static) {
        self.core.callbacks.borrow_mut().adjust_range_value = Some(Box::new(callback));
    }

    /// Register an `adjustRangeValue` callback for a named instance.
    pub fn on_adjust_range_value_for(
        &self,
        instance: impl Into<String>,
        callback: impl FnMut(&str, &str, &mut i32) -> bool + 'static,
    ) {
        self.core
            .callbacks
            .borrow_mut()
            .adjust_range_value_by_instance
            .insert(instance.into(), Box::new(callback));
    }

    // ── Event emission ────────────────────────────────────────

    /// Report the current range value.  Returns whether the device accepted
    /// the event for delivery.
    pub fn send_range_value_event(&self, range_value: i32, cause: &str) -> bool {
        let mut event = self.device.prepare_event(ACTION_SET_RANGE_VALUE, cause);
        event
            .value
            .insert(FIELD_RANGE_VALUE.to_owned(), Value::from(range_value));
        self.device.send_event(event)
    }

    /// Report the current range value of a named instance.  Sets the
    /// envelope's `instanceId` alongside the value payload.
    pub fn send_range_value_event_for(
        &self,
        instance: &str,
        range_value: i32,
        cause: &str,
    ) -> bool {
        let mut event = self.device.prepare_event(ACTION_SET_RANGE_VALUE, cause);
        event.instance_id = Some(instance.to_owned());
        event
            .value
            .insert(FIELD_RANGE_VALUE.to_owned(), Value::from(range_value));
        self.device.send_event(event)
    }
}

impl RequestHandler for RangeCore {
    fn handle(&self, request: &mut CloudRequest) -> bool {
        match request.action.as_str() {
            ACTION_SET_RANGE_VALUE => {
                let mut range_value = request.request_value.i32_or(FIELD_RANGE_VALUE, 0);
                let success = if request.instance.is_empty() {
                    match self.callbacks.borrow_mut().set_range_value.as_mut() {
                        Some(callback) => callback(&self.device_id, &mut range_value),
                        None => false,
                    }
                } else {
                    match self
                        .callbacks
                        .borrow_mut()
                        .set_range_value_by_instance
                        .get_mut(&request.instance)
                    {
                        Some(callback) => {
                            callback(&self.device_id, &request.instance, &mut range_value)
                        }
                        None => false,
                    }
                };
                debug!(
                    "range[{}/{}]: setRangeValue {} (success={})",
                    self.device_id, request.instance, range_value, success
                );
                request
                    .response_value
                    .insert(FIELD_RANGE_VALUE.to_owned(), Value::from(range_value));
                success
            }

            ACTION_ADJUST_RANGE_VALUE => {
                let mut range_value = request.request_value.i32_or(FIELD_RANGE_VALUE_DELTA, 0);
                let success = if request.instance.is_empty() {
                    match self.callbacks.borrow_mut().adjust_range_value.as_mut() {
                        Some(callback) => callback(&self.device_id, &mut range_value),
                        None => false,
                    }
                } else {
                    match self
                        .callbacks
                        .borrow_mut()
                        .adjust_range_value_by_instance
                        .get_mut(&request.instance)
                    {
                        Some(callback) => {
                            callback(&self.device_id, &request.instance, &mut range_value)
                        }
                        None => false,
                    }
                };
                debug!(
                    "range[{}/{}]: adjustRangeValue -> {} (success={})",
                    self.device_id, request.instance, range_value, success
                );
                // Responses always report the resulting absolute state under
                // the `setRangeValue` field name, never the delta.
                request
                    .response_value
                    .insert(FIELD_RANGE_VALUE.to_owned(), Value::from(range_value));
                success
            }

            _ => false,
        }
    }
}
