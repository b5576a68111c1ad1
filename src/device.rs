//! Device-facing port boundary — how capabilities attach to a device.
//!
//! ```text
//!   cloud ──▶ transport ──▶ HandlerChain ──▶ capability handlers
//!                              (device)        │
//!   cloud ◀── transport ◀── DeviceLink  ◀──────┘  (events)
//! ```
//!
//! The device class itself (session management, registration, rate limiting)
//! lives outside this crate.  It implements [`DeviceLink`] and embeds a
//! [`HandlerChain`]; each capability receives an `Rc<dyn DeviceLink>` at
//! construction and appends its own [`RequestHandler`] entry point to the
//! chain.  This is the composition mechanism that lets a device type mix in
//! an arbitrary set of capabilities without a central switch over all
//! action names.
//!
//! Everything here is single-threaded: callback slots are mutated during
//! setup and read during steady-state dispatch, so `Rc` + `RefCell` interior
//! mutability suffices and no locking exists.

use std::cell::RefCell;
use std::rc::Rc;

use crate::event::EventEnvelope;
use crate::request::CloudRequest;

/// One capability's request-handling entry point.
///
/// Returns `true` iff the capability claimed `request.action` and its
/// callback fulfilled it.  A claimed action with no registered or failing
/// callback returns `false` with `response_value` populated; an action the
/// capability does not recognise returns `false` with `response_value`
/// untouched so the dispatcher can try the next handler.
pub trait RequestHandler {
    fn handle(&self, request: &mut CloudRequest) -> bool;
}

/// The minimal device interface a capability consumes.
///
/// Implemented by the device class and injected into every capability at
/// construction.  `prepare_event` returns an envelope pre-populated with
/// protocol metadata; `send_event` returns whether the event was accepted
/// for delivery (`false` commonly means local rate limiting — the event
/// channel is a throttled resource, not a capability concern).
pub trait DeviceLink {
    /// Stable identifier passed into every domain callback.
    fn device_id(&self) -> &str;

    /// Append `handler` to the device's ordered dispatch list.
    fn register_handler(&self, handler: Rc<dyn RequestHandler>);

    /// Build an envelope for `action` with protocol metadata attached.
    fn prepare_event(&self, action: &str, cause: &str) -> EventEnvelope;

    /// Transmit an event.  Acceptance only — not cloud-side confirmation.
    fn send_event(&self, envelope: EventEnvelope) -> bool;
}

/// Ordered dispatch list for a device's capability handlers.
///
/// Registration order is dispatch priority: the first handler to return
/// `true` wins and later handlers are not consulted.  In practice no two
/// capabilities claim the same action name.
///
/// Handlers must not register further handlers from inside `handle` —
/// registration completes during device setup, before dispatch begins.
#[derive(Default)]
pub struct HandlerChain {
    handlers: RefCell<Vec<Rc<dyn RequestHandler>>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Append a handler at the end of the chain.
    pub fn register(&self, handler: Rc<dyn RequestHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    /// Offer `request` to each handler in registration order until one
    /// reports success.
    ///
    /// Returns the overall success flag the transport layer forwards to the
    /// cloud.  `false` with a populated `response_value` means some handler
    /// claimed the action but could not fulfil it; `false` with an empty
    /// `response_value` means no capability recognised the action.
    pub fn dispatch(&self, request: &mut CloudRequest) -> bool {
        for handler in self.handlers.borrow().iter() {
            if handler.handle(request) {
                return true;
            }
        }
        false
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }
}
