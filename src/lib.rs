//! CloudLink device-capability framework.
//!
//! Request-dispatch and event-emission core used by smart-device firmware
//! to interoperate with the CloudLink device-control service.
//!
//! ```text
//!   cloud request ──▶ HandlerChain ──▶ capability ──▶ domain callback
//!                                          │
//!   cloud event  ◀── DeviceLink ◀── send_*_event() ◀── firmware
//! ```
//!
//! Transport, sessions, authentication, and the device class itself live
//! outside this crate; capabilities consume the device only through the
//! [`device::DeviceLink`] port.

#![deny(unused_must_use)]

pub mod capabilities;
pub mod device;
pub mod error;
pub mod event;
pub mod payload;
pub mod request;
