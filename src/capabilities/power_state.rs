//! Power-state capability — the simplest single-action controller.
//!
//! Nearly every device type mixes this in alongside its richer
//! capabilities, so it doubles as the reference implementation of the
//! single-target contract.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use serde_json::Value;

use crate::device::{DeviceLink, RequestHandler};
use crate::payload::FieldAccess;
use crate::request::CloudRequest;

const ACTION_SET_POWER_STATE: &str = "setPowerState";

const FIELD_STATE: &str = "state";

/// Called for `setPowerState`.  In: requested state (`"On"` / `"Off"`, or
/// `""` when the field was absent).  Out: the state the device applied.
pub type PowerStateCallback = Box<dyn FnMut(&str, &mut String) -> bool>;

struct PowerStateCore {
    device_id: String,
    callback: RefCell<Option<PowerStateCallback>>,
}

/// Power-state capability handle held by host firmware.
pub struct PowerStateCapability {
    core: Rc<PowerStateCore>,
    device: Rc<dyn DeviceLink>,
}

impl PowerStateCapability {
    pub fn new(device: Rc<dyn DeviceLink>) -> Self {
        let core = Rc::new(PowerStateCore {
            device_id: device.device_id().to_owned(),
            callback: RefCell::new(None),
        });
        device.register_handler(Rc::clone(&core) as Rc<dyn RequestHandler>);
        Self { core, device }
    }

    /// Register the `setPowerState` callback, replacing any prior one.
    pub fn on_power_state(&self, callback: impl FnMut(&str, &mut String) -> bool + 'static) {
        *self.core.callback.borrow_mut() = Some(Box::new(callback));
    }

    /// Report the state the device switched to (`"On"` / `"Off"`).
    pub fn send_power_state_event(&self, state: &str, cause: &str) -> bool {
        let mut event = self.device.prepare_event(ACTION_SET_POWER_STATE, cause);
        event.value.insert(FIELD_STATE.to_owned(), Value::from(state));
        self.device.send_event(event)
    }
}

impl RequestHandler for PowerStateCore {
    fn handle(&self, request: &mut CloudRequest) -> bool {
        if request.action != ACTION_SET_POWER_STATE {
            return false;
        }

        let mut state = request.request_value.str_or(FIELD_STATE, "");
        let success = match self.callback.borrow_mut().as_mut() {
            Some(callback) => callback(&self.device_id, &mut state),
            None => false,
        };
        debug!(
            "power[{}]: setPowerState '{}' (success={})",
            self.device_id, state, success
        );
        request
            .response_value
            .insert(FIELD_STATE.to_owned(), Value::String(state));
        success
    }
}
