//! Event system for Dataview components
//!
//! - [`Event`] carries the event type, the element it was fired at and an
//!   optional JSON detail for custom signals
//! - [`delegation`] defines the fixed bubbling/capturing event sets that a
//!   component listens to on its isolated root, and the named handler table
//!   that `@event="name"` bindings resolve against
//! - [`EventEmitter`] holds listeners for custom, non-delegated signals

pub mod delegation;
pub mod emitter;
pub mod event;

pub use delegation::{
    Handler, HandlerFn, HandlerTable, ListenerSet, PropagationPhase, BUBBLE_EVENTS,
    CAPTURE_EVENTS,
};
pub use emitter::EventEmitter;
pub use event::{DataSignal, Event, EventType, UPDATE_DATA};
