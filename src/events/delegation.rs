//! Event delegation for component roots
//!
//! A component never attaches listeners to individual elements. Instead its
//! isolated root listens for a fixed set of event types, once in the
//! bubbling phase and once in the capturing phase, and resolves the target
//! element's `@<event>` attribute against the component's named handler
//! table. Events that do not bubble (focus, blur, scroll, ...) are only
//! observable while capturing, which is why the two sets differ.

use std::collections::HashMap;
use std::fmt;

use crate::component::{Component, Host};
use crate::events::{Event, EventType};

/// Specifies the event propagation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationPhase {
    /// Event is traveling down from the root to the target
    Capturing,

    /// Event is traveling up from the target to the root
    Bubbling,
}

/// Event types delegated in the bubbling phase
pub const BUBBLE_EVENTS: &[&str] = &[
    "click",
    "submit",
    "input",
    "change",
    "keydown",
    "mouseover",
    "mouseout",
];

/// Event types delegated in the capturing phase
pub const CAPTURE_EVENTS: &[&str] = &["focus", "blur", "scroll", "load", "unload", "slotchange"];

/// Listener installed on an isolated root for one propagation phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerSet {
    pub phase: PropagationPhase,
    pub events: Vec<EventType>,
}

impl ListenerSet {
    /// Listener for [`BUBBLE_EVENTS`]
    pub fn bubbling() -> Self {
        Self::from_names(PropagationPhase::Bubbling, BUBBLE_EVENTS)
    }

    /// Listener for [`CAPTURE_EVENTS`]
    pub fn capturing() -> Self {
        Self::from_names(PropagationPhase::Capturing, CAPTURE_EVENTS)
    }

    fn from_names(phase: PropagationPhase, names: &[&str]) -> Self {
        Self {
            phase,
            events: names.iter().map(|name| EventType::from(*name)).collect(),
        }
    }

    /// Whether this listener receives `event_type`
    pub fn handles(&self, event_type: &EventType) -> bool {
        self.events.contains(event_type)
    }
}

/// Signature of a named event handler
///
/// Handlers receive the component, its host and the event. Returned errors
/// are logged by the host and never propagate to the caller of `dispatch`.
pub type HandlerFn<C> = fn(&C, &Host<C>, &Event) -> anyhow::Result<()>;

/// A handler together with the name markup refers to it by
pub struct Handler<C: Component> {
    pub name: &'static str,
    pub func: HandlerFn<C>,
}

impl<C: Component> Handler<C> {
    pub const fn new(name: &'static str, func: HandlerFn<C>) -> Self {
        Self { name, func }
    }
}

impl<C: Component> Clone for Handler<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: Component> Copy for Handler<C> {}

impl<C: Component> fmt::Debug for Handler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("name", &self.name).finish()
    }
}

/// Handlers of one component, indexed by name
///
/// The table is built once when the host is created; markup can only
/// reference what is in here.
pub struct HandlerTable<C: Component> {
    handlers: HashMap<&'static str, HandlerFn<C>>,
}

impl<C: Component> HandlerTable<C> {
    pub fn new(handlers: impl IntoIterator<Item = Handler<C>>) -> Self {
        Self {
            handlers: handlers
                .into_iter()
                .map(|handler| (handler.name, handler.func))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<HandlerFn<C>> {
        self.handlers.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<C: Component> fmt::Debug for HandlerTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("HandlerTable")
            .field("handlers", &names)
            .finish()
    }
}

/// Build a handler list from method paths, named after their last segment
///
/// ```ignore
/// fn handlers() -> Vec<Handler<Self>> {
///     handlers![Self::on_mouseover, Self::on_mouseout]
/// }
/// ```
#[macro_export]
macro_rules! handlers {
    ($($($segment:ident)::+),* $(,)?) => {
        vec![$(
            $crate::events::Handler::new(
                $crate::__last_segment!($($segment)::+),
                $($segment)::+,
            )
        ),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_sets_do_not_overlap() {
        let bubbling = ListenerSet::bubbling();
        let capturing = ListenerSet::capturing();

        assert_eq!(bubbling.phase, PropagationPhase::Bubbling);
        assert!(bubbling.handles(&EventType::Click));
        assert!(bubbling.handles(&EventType::Submit));
        assert!(!bubbling.handles(&EventType::Focus));

        assert_eq!(capturing.phase, PropagationPhase::Capturing);
        assert!(capturing.handles(&EventType::Blur));
        assert!(capturing.handles(&EventType::Slotchange));
        assert!(!capturing.handles(&EventType::Mouseover));

        for event in &bubbling.events {
            assert!(!capturing.handles(event));
        }
    }

    #[test]
    fn test_event_type_names() {
        for name in BUBBLE_EVENTS.iter().chain(CAPTURE_EVENTS) {
            assert_eq!(EventType::from(*name).as_str(), *name);
        }
        assert_eq!(
            EventType::from("update-data"),
            EventType::Custom("update-data".to_string())
        );
    }
}
