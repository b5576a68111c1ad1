//! Capability modules — the pluggable feature units of a device.
//!
//! Each controller capability registers a request handler with the owning
//! device at construction and exposes `on_*` callback registration plus
//! `send_*` event emission to host firmware.  Event sources only emit.
//!
//! All capabilities follow one of two routing contracts:
//! - **single-target** ([`thermostat`], [`power_state`]): one callback slot
//!   per action, instance ignored;
//! - **multi-instance** ([`range`]): a default slot plus callbacks keyed by
//!   instance name.

pub mod air_quality;
pub mod power_state;
pub mod range;
pub mod temperature;
pub mod thermostat;
