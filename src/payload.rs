//! Typed access to the loosely-typed request/event value tree.
//!
//! The cloud protocol carries scalar fields (string/int/float/bool) in an
//! unordered JSON object.  Handlers read them through [`FieldAccess`], which
//! substitutes an explicit default when a key is absent or not coercible —
//! except for [`FieldAccess::require_f32`], the detected-error path for
//! fields that have no defined default.

use serde_json::Value;

use crate::error::FieldError;

/// The protocol's key→value payload object.
pub type ValueMap = serde_json::Map<String, Value>;

/// Defaulting accessors over a [`ValueMap`].
///
/// Numeric accessors accept both JSON integers and floats; the wire format
/// does not distinguish them reliably across firmware SDK versions.
pub trait FieldAccess {
    /// `key` as an `f32`, or `default` when absent or non-numeric.
    fn f32_or(&self, key: &str, default: f32) -> f32;

    /// `key` as an `i32` (floats are truncated), or `default`.
    fn i32_or(&self, key: &str, default: i32) -> i32;

    /// `key` as an owned string, or `default`.
    fn str_or(&self, key: &str, default: &str) -> String;

    /// `key` as an `f32`, with absence or a non-numeric value reported as a
    /// typed error instead of silently defaulting.
    fn require_f32(&self, key: &'static str) -> Result<f32, FieldError>;
}

impl FieldAccess for ValueMap {
    fn f32_or(&self, key: &str, default: f32) -> f32 {
        self.get(key)
            .and_then(Value::as_f64)
            .map_or(default, |v| v as f32)
    }

    fn i32_or(&self, key: &str, default: i32) -> i32 {
        match self.get(key) {
            Some(v) => v
                .as_i64()
                .map(|n| n as i32)
                .or_else(|| v.as_f64().map(|f| f as i32))
                .unwrap_or(default),
            None => default,
        }
    }

    fn str_or(&self, key: &str, default: &str) -> String {
        self.get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_owned()
    }

    fn require_f32(&self, key: &'static str) -> Result<f32, FieldError> {
        match self.get(key) {
            None => Err(FieldError::Missing(key)),
            Some(v) => v.as_f64().map(|f| f as f32).ok_or(FieldError::WrongType {
                field: key,
                expected: "number",
            }),
        }
    }
}
