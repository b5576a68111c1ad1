//! Property tests for dispatch and payload robustness.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use proptest::prelude::*;
use serde_json::Value;

use cloudlink::capabilities::range::RangeCapability;
use cloudlink::capabilities::thermostat::ThermostatCapability;
use cloudlink::device::{DeviceLink, HandlerChain, RequestHandler};
use cloudlink::event::{EventEnvelope, round_to_tenth};
use cloudlink::payload::{FieldAccess, ValueMap};
use cloudlink::request::CloudRequest;

// ── Minimal device for dispatch properties ────────────────────

struct NullDevice {
    chain: HandlerChain,
    sent: RefCell<Vec<EventEnvelope>>,
}

impl NullDevice {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            chain: HandlerChain::new(),
            sent: RefCell::new(Vec::new()),
        })
    }
}

impl DeviceLink for NullDevice {
    fn device_id(&self) -> &str {
        "prop-device"
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

// ── Rounding invariants ───────────────────────────────────────

proptest! {
    /// Rounded values always land exactly on a tenth.
    #[test]
    fn rounding_lands_on_a_tenth(value in -10_000.0f32..10_000.0) {
        let rounded = round_to_tenth(value);
        let tenths = rounded * 10.0;
        prop_assert!((tenths - tenths.round()).abs() < 1e-9);
    }

    /// Rounding never moves a value by more than half a tenth.
    #[test]
    fn rounding_is_within_half_a_tenth(value in -10_000.0f32..10_000.0) {
        let rounded = round_to_tenth(value);
        prop_assert!((rounded - f64::from(value)).abs() <= 0.05 + 1e-9);
    }

    /// Rounding an already-rounded value changes nothing.
    #[test]
    fn rounding_is_idempotent(value in -10_000.0f32..10_000.0) {
        let once = round_to_tenth(value);
        let twice = round_to_tenth(once as f32);
        prop_assert!((once - twice).abs() < 1e-3);
    }
}

// ── Dispatch invariants ───────────────────────────────────────

proptest! {
    /// Actions outside a capability's fixed set never touch the response,
    /// whatever the payload carries.
    #[test]
    fn unclaimed_actions_leave_response_untouched(
        action in "[a-zA-Z]{1,24}",
        field in "[a-z]{1,12}",
        value in any::<i32>(),
    ) {
        prop_assume!(!matches!(
            action.as_str(),
            "targetTemperature" | "adjustTargetTemperature" | "setThermostatMode"
        ));

        let device = NullDevice::new();
        let thermostat = ThermostatCapability::new(device.clone());
        thermostat.on_target_temperature(|_, _| true);

        let mut request = CloudRequest::new(action.as_str()).with_field(field, value);
        prop_assert!(!device.chain.dispatch(&mut request));
        prop_assert!(request.response_value.is_empty());
    }

    /// setRangeValue echoes a rangeValue response for any instance/payload
    /// combination, fulfilled or not.
    #[test]
    fn set_range_value_always_echoes(
        instance in proptest::option::of("[a-z]{1,8}"),
        range_value in proptest::option::of(-1000i32..1000),
    ) {
        let device = NullDevice::new();
        let range = RangeCapability::new(device.clone());
        range.on_range_value(|_, _| true);

        let mut request = match &instance {
            Some(name) => CloudRequest::for_instance("setRangeValue", name.as_str()),
            None => CloudRequest::new("setRangeValue"),
        };
        if let Some(v) = range_value {
            request = request.with_field("rangeValue", v);
        }

        device.chain.dispatch(&mut request);
        let echoed = request.response_value.i32_or("rangeValue", i32::MIN);
        prop_assert_eq!(echoed, range_value.unwrap_or(0));
    }

    /// Whatever the registration history, only the most recent callback
    /// fires on the next matching request.
    #[test]
    fn latest_registration_wins(count in 1usize..8) {
        let device = NullDevice::new();
        let thermostat = ThermostatCapability::new(device.clone());

        let fired = Rc::new(Cell::new(usize::MAX));
        for i in 0..count {
            let f = Rc::clone(&fired);
            thermostat.on_target_temperature(move |_, _| {
                f.set(i);
                true
            });
        }

        let mut request = CloudRequest::new("targetTemperature").with_field("temperature", 20);
        prop_assert!(device.chain.dispatch(&mut request));
        prop_assert_eq!(fired.get(), count - 1);
    }
}

// ── Payload accessor totality ─────────────────────────────────

proptest! {
    /// Accessors never panic on arbitrary JSON scalars and always return
    /// either the coerced value or the default.
    #[test]
    fn field_access_is_total(
        key in "[a-z]{1,8}",
        raw in prop_oneof![
            any::<i64>().prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            "[ -~]{0,16}".prop_map(Value::from),
            (-1e6f64..1e6).prop_map(Value::from),
        ],
    ) {
        let mut map = ValueMap::new();
        map.insert(key.clone(), raw);

        let _ = map.f32_or(&key, 0.0);
        let _ = map.i32_or(&key, 0);
        let _ = map.str_or(&key, "");
        let _ = map.require_f32("temperature");
    }
}
