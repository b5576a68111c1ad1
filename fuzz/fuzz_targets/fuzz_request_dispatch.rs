//! Fuzz target: request parsing + handler-chain dispatch
//!
//! Parses arbitrary bytes as a request document and walks it through a
//! device with every capability attached.  Dispatch must never panic,
//! whatever the action, instance, or payload field types, and the overall
//! success flag must agree with the callbacks' fixed return values.
//!
//! cargo fuzz run fuzz_request_dispatch

#![no_main]

use std::cell::RefCell;
use std::rc::Rc;

use libfuzzer_sys::fuzz_target;

use cloudlink::capabilities::power_state::PowerStateCapability;
use cloudlink::capabilities::range::RangeCapability;
use cloudlink::capabilities::thermostat::ThermostatCapability;
use cloudlink::device::{DeviceLink, HandlerChain, RequestHandler};
use cloudlink::event::EventEnvelope;
use cloudlink::request::CloudRequest;

struct FuzzDevice {
    chain: HandlerChain,
    sent: RefCell<Vec<EventEnvelope>>,
}

impl DeviceLink for FuzzDevice {
    fn device_id(&self) -> &str {
        "fuzz-device"
    }

    fn register_handler(&self, handler: Rc<dyn RequestHandler>) {
        self.chain.register(handler);
    }

    fn prepare_event(&self, action: &str, cause: &str) -> EventEnvelope {
        EventEnvelope::new(action, cause)
    }

    fn send_event(&self, envelope: EventEnvelope) -> bool {
        self.sent.borrow_mut().push(envelope);
        true
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(mut request) = serde_json::from_slice::<CloudRequest>(data) else {
        return;
    };

    let device = Rc::new(FuzzDevice {
        chain: HandlerChain::new(),
        sent: RefCell::new(Vec::new()),
    });

    let thermostat = ThermostatCapability::new(device.clone());
    let range = RangeCapability::new(device.clone());
    let power = PowerStateCapability::new(device.clone());

    thermostat.on_target_temperature(|_, _| true);
    thermostat.on_adjust_target_temperature(|_, _| true);
    thermostat.on_thermostat_mode(|_, _| false);
    range.on_range_value(|_, _| true);
    range.on_range_value_for("fuzz", |_, _, _| true);
    power.on_power_state(|_, _| true);

    let success = device.chain.dispatch(&mut request);

    // A successful dispatch must have produced a response; the mode
    // callback is pinned to false, so setThermostatMode never succeeds.
    if success {
        assert!(!request.response_value.is_empty());
        assert_ne!(request.action, "setThermostatMode");
    }
});
