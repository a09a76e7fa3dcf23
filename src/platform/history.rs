//! Client-side session history

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use log::debug;

/// Identifier of a location-change listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type LocationListener = Rc<dyn Fn(&str)>;

struct HistoryInner {
    entries: RefCell<Vec<String>>,
    index: Cell<usize>,
    listeners: RefCell<Vec<(ListenerId, LocationListener)>>,
    next_listener: Cell<u64>,
}

/// Session history shared by the app router and its pages
///
/// `push_state` changes the location without telling anyone, like the
/// browser API. Listeners only hear about changes through
/// [`History::notify_location_change`], which `back`/`forward` call
/// themselves.
#[derive(Clone)]
pub struct History {
    inner: Rc<HistoryInner>,
}

impl History {
    /// Create a history whose only entry is `initial_path`
    pub fn new(initial_path: &str) -> Self {
        Self {
            inner: Rc::new(HistoryInner {
                entries: RefCell::new(vec![initial_path.to_string()]),
                index: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    /// Current path
    pub fn location(&self) -> String {
        let entries = self.inner.entries.borrow();
        entries
            .get(self.inner.index.get())
            .cloned()
            .unwrap_or_default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    /// Push a new entry, dropping any forward entries
    pub fn push_state(&self, path: &str) {
        let index = self.inner.index.get();
        let mut entries = self.inner.entries.borrow_mut();
        entries.truncate(index + 1);
        entries.push(path.to_string());
        self.inner.index.set(entries.len() - 1);
        debug!("History push {}", path);
    }

    /// Go back one entry. Returns `false` at the first entry.
    pub fn back(&self) -> bool {
        let index = self.inner.index.get();
        if index == 0 {
            return false;
        }
        self.inner.index.set(index - 1);
        self.notify_location_change();
        true
    }

    /// Go forward one entry. Returns `false` at the last entry.
    pub fn forward(&self) -> bool {
        let index = self.inner.index.get();
        if index + 1 >= self.len() {
            return false;
        }
        self.inner.index.set(index + 1);
        self.notify_location_change();
        true
    }

    /// Register a location-change listener
    pub fn on_location_change<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&str) + 'static,
    {
        let id = ListenerId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener; unknown ids are ignored
    pub fn remove_listener(&self, id: ListenerId) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(listener, _)| *listener != id);
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Tell every listener about the current location
    pub fn notify_location_change(&self) {
        let location = self.location();
        let listeners: Vec<_> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&location);
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new("/")
    }
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("entries", &self.inner.entries.borrow())
            .field("index", &self.inner.index.get())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
