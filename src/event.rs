//! Outbound event envelope.
//!
//! Capabilities report local state changes to the cloud through events.
//! The device collaborator pre-populates an envelope with protocol metadata
//! (timestamps, device id, correlation ids) in
//! [`DeviceLink::prepare_event`](crate::device::DeviceLink::prepare_event);
//! the capability then fills in its value fields and hands the envelope back
//! for transmission.  Envelopes are built fresh per send and never persisted.

use serde::{Deserialize, Serialize};

use crate::payload::ValueMap;

/// Reason codes attached to outbound events.
///
/// These are protocol defaults, not an exhaustive set — `cause` is free text
/// and firmware may supply its own reason strings.
pub mod cause {
    /// A user or the device itself changed state (default for most events).
    pub const PHYSICAL_INTERACTION: &str = "PHYSICAL_INTERACTION";
    /// Scheduled telemetry, nothing changed by itself.
    pub const PERIODIC_POLL: &str = "PERIODIC_POLL";
}

/// One outbound event message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    /// Name of the reported operation, e.g. `"targetTemperature"`.
    pub action: String,

    /// Free-text reason why the event was generated.
    pub cause: String,

    /// Sub-target the event belongs to.  A sibling of `value`, not part of
    /// it; only instance-qualified senders set this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,

    /// Capability-specific value fields.
    #[serde(default)]
    pub value: ValueMap,

    /// Protocol metadata filled in by the device collaborator.  Capabilities
    /// never write here.
    #[serde(default, skip_serializing_if = "ValueMap::is_empty")]
    pub metadata: ValueMap,
}

impl EventEnvelope {
    /// A bare envelope for `action` with empty value and metadata payloads.
    ///
    /// Device implementations call this from `prepare_event` and then attach
    /// their protocol metadata.
    pub fn new(action: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            cause: cause.into(),
            instance_id: None,
            value: ValueMap::new(),
            metadata: ValueMap::new(),
        }
    }
}

/// Round to one decimal place, half away from zero.
///
/// Applied to floating temperature values on the outbound event path only;
/// request/response handling reports values unrounded.  The result is `f64`
/// so that e.g. `21.3` lands exactly on the JSON number the cloud expects.
pub fn round_to_tenth(value: f32) -> f64 {
    (f64::from(value) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_nearest_tenth() {
        assert!((round_to_tenth(21.27) - 21.3).abs() < 1e-9);
        assert!((round_to_tenth(21.24) - 21.2).abs() < 1e-9);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert!((round_to_tenth(2.25) - 2.3).abs() < 1e-9);
        assert!((round_to_tenth(-2.25) + 2.3).abs() < 1e-9);
    }

    #[test]
    fn instance_id_is_omitted_when_unset() {
        let envelope = EventEnvelope::new("setRangeValue", cause::PHYSICAL_INTERACTION);
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(!json.contains("instanceId"));

        let mut qualified = envelope;
        qualified.instance_id = Some("fanSpeed".to_owned());
        let json = serde_json::to_string(&qualified).unwrap();
        assert!(json.contains("\"instanceId\":\"fanSpeed\""));
    }
}
