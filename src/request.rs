//! Inbound unit of work from the cloud service.
//!
//! The transport layer materialises a [`CloudRequest`] from a received JSON
//! document and walks it through the device's handler chain.  Handlers read
//! `action`, `instance`, and `request_value`, and write their result into
//! `response_value`; the populated request is then serialised back into the
//! protocol response by the transport layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::payload::ValueMap;

/// One inbound control request, consumed once by the handler chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudRequest {
    /// Name of the operation, e.g. `"setRangeValue"`.
    pub action: String,

    /// Optional sub-target of the device.  Empty means "default/no instance".
    pub instance: String,

    /// Loosely-typed key→value payload supplied by the cloud.
    pub request_value: ValueMap,

    /// Output payload the matching handler populates.
    pub response_value: ValueMap,
}

impl CloudRequest {
    /// A request for `action` with no instance and empty payloads.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    /// A request addressed at a named sub-target of the device.
    pub fn for_instance(action: impl Into<String>, instance: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            instance: instance.into(),
            ..Self::default()
        }
    }

    /// Add a field to `request_value` (builder style, used by transports
    /// and tests).
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.request_value.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_fills_defaults() {
        let request: CloudRequest =
            serde_json::from_str(r#"{"action":"setPowerState"}"#).unwrap();
        assert_eq!(request.action, "setPowerState");
        assert!(request.instance.is_empty());
        assert!(request.request_value.is_empty());
        assert!(request.response_value.is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let request = CloudRequest::for_instance("setRangeValue", "fanSpeed")
            .with_field("rangeValue", 3);
        let json = serde_json::to_string(&request).unwrap();
        let back: CloudRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.action, "setRangeValue");
        assert_eq!(back.instance, "fanSpeed");
        assert_eq!(back.request_value.get("rangeValue"), Some(&Value::from(3)));
    }

    #[test]
    fn wire_field_names_are_camel_case() {
        let request = CloudRequest::new("targetTemperature").with_field("temperature", 20);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"requestValue\""));
        assert!(json.contains("\"responseValue\""));
    }
}
