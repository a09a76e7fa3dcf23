//! Observable record store

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use log::{debug, trace};

use super::{Record, StoreError};

/// Callback invoked with a fresh snapshot after every notification
type Subscriber = Rc<dyn Fn(&[Record])>;

/// Handle returned by [`DataStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct StoreInner {
    records: RefCell<Vec<Record>>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: Cell<u64>,
    /// Source of generated keys, bumped on every `add` and never reset
    increment: Cell<u64>,
    batch_depth: Cell<u32>,
    dirty: Cell<bool>,
}

/// The single authoritative, ordered collection of [`Record`]s
///
/// Every mutating call validates first and mutates second, so observers
/// only ever see consistent snapshots. `add`, `remove` and `update` notify
/// immediately; `set` and [`batch`](Self::batch) notify once when done.
///
/// Subscribers are called synchronously in registration order.
#[derive(Clone)]
pub struct DataStore {
    inner: Rc<StoreInner>,
}

impl std::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("records", &self.inner.records.borrow())
            .field(
                "subscribers",
                &format!("[{} callbacks]", self.inner.subscribers.borrow().len()),
            )
            .finish()
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: Rc::new(StoreInner {
                records: RefCell::new(Vec::new()),
                subscribers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
                increment: Cell::new(0),
                batch_depth: Cell::new(0),
                dirty: Cell::new(false),
            }),
        }
    }

    /// Append a record.
    ///
    /// An empty key is replaced by a generated numeric key that does not
    /// collide with any key currently stored. Returns the key used.
    pub fn add(&self, key: &str, val: f64) -> Result<String, StoreError> {
        if self.position(key).is_some() {
            return Err(StoreError::DuplicateKey {
                key: key.to_string(),
            });
        }
        if !key.is_empty() && key.trim().is_empty() {
            return Err(StoreError::InvalidKey {
                key: key.to_string(),
            });
        }
        if !val.is_finite() {
            return Err(StoreError::InvalidValue {
                key: key.to_string(),
            });
        }

        let key = if key.is_empty() {
            self.generate_key()
        } else {
            self.inner.increment.set(self.inner.increment.get() + 1);
            key.to_string()
        };

        self.inner
            .records
            .borrow_mut()
            .push(Record::new(key.clone(), val));
        debug!("Added record {key:?}");

        self.changed();
        Ok(key)
    }

    /// Remove the record with `key`
    pub fn remove(&self, key: &str) -> Result<Record, StoreError> {
        let index = self.position(key).ok_or_else(|| StoreError::UnknownKey {
            key: key.to_string(),
        })?;

        let removed = self.inner.records.borrow_mut().remove(index);
        debug!("Removed record {key:?}");

        self.changed();
        Ok(removed)
    }

    /// Replace the value of `key` in place
    pub fn update(&self, key: &str, val: f64) -> Result<(), StoreError> {
        let index = self.position(key).ok_or_else(|| StoreError::UnknownKey {
            key: key.to_string(),
        })?;
        if !val.is_finite() {
            return Err(StoreError::InvalidValue {
                key: key.to_string(),
            });
        }

        self.inner.records.borrow_mut()[index].val = val;
        debug!("Updated record {key:?}");

        self.changed();
        Ok(())
    }

    /// Atomically replace every record.
    ///
    /// The whole batch is validated before anything changes; on success
    /// subscribers are notified exactly once.
    pub fn set(&self, records: Vec<Record>) -> Result<(), StoreError> {
        let mut unique = HashSet::new();
        for record in &records {
            validate_entry(&mut unique, Some(&record.key), Some(record.val), &[])?;
        }

        self.replace_all(records);
        Ok(())
    }

    /// Atomically replace every record from a JSON array of
    /// `{ "key": string, "val": number }` objects.
    ///
    /// Items are checked in order: key, duplicate key, value, extra fields.
    pub fn set_json(&self, batch: &serde_json::Value) -> Result<(), StoreError> {
        let items = batch
            .as_array()
            .ok_or_else(|| StoreError::InvalidBatch("expected an array of records".to_string()))?;

        let mut unique = HashSet::new();
        let mut records = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let object = item.as_object().ok_or_else(|| {
                StoreError::InvalidBatch(format!("item {index} is not an object"))
            })?;

            let key = object.get("key").and_then(serde_json::Value::as_str);
            let val = object.get("val").and_then(serde_json::Value::as_f64);
            let extra: Vec<String> = object
                .iter()
                .filter(|(name, _)| name.as_str() != "key" && name.as_str() != "val")
                .map(|(name, value)| format!("{{ \"{name}\" : {value} }}"))
                .collect();

            if key.is_none() {
                return Err(StoreError::InvalidKey {
                    key: object.get("key").map(ToString::to_string).unwrap_or_default(),
                });
            }
            let record = validate_entry(&mut unique, key, val, &extra)?;
            records.push(record);
        }

        self.replace_all(records);
        Ok(())
    }

    /// Look up a record by key
    pub fn get(&self, key: &str) -> Option<Record> {
        self.inner
            .records
            .borrow()
            .iter()
            .find(|record| record.key == key)
            .cloned()
    }

    /// Copy of every record, in order
    pub fn get_all(&self) -> Vec<Record> {
        self.inner.records.borrow().clone()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.inner.records.borrow().len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.inner.records.borrow().is_empty()
    }

    /// Register `callback` and immediately replay the current snapshot to it
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&[Record]) + 'static,
    {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);

        let callback: Subscriber = Rc::new(callback);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, callback.clone()));
        trace!("Subscriber {id:?} registered");

        let snapshot = self.get_all();
        callback(&snapshot);
        id
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .subscribers
            .borrow_mut()
            .retain(|(subscriber, _)| *subscriber != id);
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Run `f` with notifications suppressed, then notify once if anything
    /// changed. Nested batches notify when the outermost one closes.
    pub fn batch<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&DataStore) -> T,
    {
        self.inner.batch_depth.set(self.inner.batch_depth.get() + 1);
        let guard = BatchGuard { store: self };
        let result = f(self);
        drop(guard);
        result
    }

    fn replace_all(&self, records: Vec<Record>) {
        self.batch(|store| {
            let mut current = store.inner.records.borrow_mut();
            current.clear();
            current.extend(records);
            drop(current);
            store.inner.dirty.set(true);
        });
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.inner
            .records
            .borrow()
            .iter()
            .position(|record| record.key == key)
    }

    fn generate_key(&self) -> String {
        loop {
            let candidate = self.inner.increment.get().to_string();
            self.inner.increment.set(self.inner.increment.get() + 1);
            if self.position(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn changed(&self) {
        if self.inner.batch_depth.get() > 0 {
            self.inner.dirty.set(true);
        } else {
            self.notify();
        }
    }

    fn notify(&self) {
        let subscribers: Vec<(SubscriptionId, Subscriber)> =
            self.inner.subscribers.borrow().clone();
        trace!("Notifying {} subscribers", subscribers.len());

        for (id, callback) in subscribers {
            // A subscriber removed earlier in this round is skipped.
            let still_registered = self
                .inner
                .subscribers
                .borrow()
                .iter()
                .any(|(subscriber, _)| *subscriber == id);
            if still_registered {
                let snapshot = self.get_all();
                callback(&snapshot);
            }
        }
    }
}

struct BatchGuard<'a> {
    store: &'a DataStore,
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        let inner = &self.store.inner;
        let depth = inner.batch_depth.get().saturating_sub(1);
        inner.batch_depth.set(depth);

        if depth == 0 && inner.dirty.replace(false) {
            self.store.notify();
        }
    }
}

fn validate_entry(
    unique: &mut HashSet<String>,
    key: Option<&str>,
    val: Option<f64>,
    extra: &[String],
) -> Result<Record, StoreError> {
    let key = match key {
        Some(key) if !key.trim().is_empty() => key,
        other => {
            return Err(StoreError::InvalidKey {
                key: other.unwrap_or_default().to_string(),
            })
        }
    };

    if unique.contains(key) {
        return Err(StoreError::DuplicateKey {
            key: key.to_string(),
        });
    }

    let val = match val {
        Some(val) if val.is_finite() => val,
        _ => {
            return Err(StoreError::InvalidValue {
                key: key.to_string(),
            })
        }
    };

    if !extra.is_empty() {
        return Err(StoreError::UnexpectedField {
            key: key.to_string(),
            fields: extra.to_vec(),
        });
    }

    unique.insert(key.to_string());
    Ok(Record::new(key, val))
}
