//! Key/value record held by the store

use serde::{Deserialize, Serialize, Serializer};

/// A single `{ key, val }` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    pub key: String,
    #[serde(serialize_with = "serialize_val")]
    pub val: f64,
}

impl Record {
    /// Create a record
    pub fn new(key: impl Into<String>, val: f64) -> Self {
        Self {
            key: key.into(),
            val,
        }
    }
}

// Integral values go out as JSON integers so edited JSON reads `12`, not `12.0`.
fn serialize_val<S: Serializer>(val: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if val.fract() == 0.0 && val.abs() < 9.0e15 {
        serializer.serialize_i64(*val as i64)
    } else {
        serializer.serialize_f64(*val)
    }
}
