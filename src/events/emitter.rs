//! Listeners for custom, non-delegated signals

use std::cell::RefCell;
use std::fmt;

use super::HandlerFn;
use crate::component::Component;

/// Custom signal listeners of one component host
///
/// Unlike delegated DOM events, signals are delivered straight to the
/// registered handler by name of the signal, regardless of any target.
pub struct EventEmitter<C: Component> {
    listeners: RefCell<Vec<(String, HandlerFn<C>)>>,
}

impl<C: Component> EventEmitter<C> {
    /// Create a new event emitter
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Register `handler` for the signal `name`
    pub fn on(&self, name: &str, handler: HandlerFn<C>) {
        self.listeners
            .borrow_mut()
            .push((name.to_string(), handler));
    }

    /// Handlers registered for `name`, in registration order
    pub fn listeners_for(&self, name: &str) -> Vec<HandlerFn<C>> {
        self.listeners
            .borrow()
            .iter()
            .filter(|(signal, _)| signal == name)
            .map(|(_, handler)| *handler)
            .collect()
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Drop every listener
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }
}

impl<C: Component> Default for EventEmitter<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component> fmt::Debug for EventEmitter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.len())
            .finish()
    }
}
