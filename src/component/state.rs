//! Component state patches

use serde_json::{Map, Value};

use super::ComponentError;

/// A partial update applied to a component's state by `set_state`
///
/// Closures receive the state mutably and overwrite whatever fields they
/// touch; everything else is preserved.
pub trait StatePatch<S> {
    fn apply(self, state: &mut S);
}

impl<S, F> StatePatch<S> for F
where
    F: FnOnce(&mut S),
{
    fn apply(self, state: &mut S) {
        self(state)
    }
}

/// Untyped key/value component state
///
/// Patching a `StateMap` with another one is a shallow merge: top-level keys
/// of the patch overwrite, all other keys are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateMap(Map<String, Value>);

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The state as a JSON object
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl StatePatch<StateMap> for StateMap {
    fn apply(self, state: &mut StateMap) {
        state.0.extend(self.0);
    }
}

impl From<Map<String, Value>> for StateMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for StateMap {
    type Error = ComponentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ComponentError::InvalidStatePatch(format!(
                "expected an object, got {}",
                other
            ))),
        }
    }
}
