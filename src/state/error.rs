//! Store validation errors

/// Errors raised synchronously by store mutations
///
/// A failed call never leaves the store partially mutated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Cannot add \"{key}\", key already exists")]
    DuplicateKey { key: String },

    #[error("Unknown key \"{key}\"")]
    UnknownKey { key: String },

    #[error("Invalid key {key:?}, keys must be non-empty strings")]
    InvalidKey { key: String },

    #[error("Invalid value for item (key \"{key}\"), \"val\" must be a finite number")]
    InvalidValue { key: String },

    #[error("Unexpected fields for item (key \"{key}\"): {}", fields.join(", "))]
    UnexpectedField { key: String, fields: Vec<String> },

    #[error("Invalid batch: {0}")]
    InvalidBatch(String),
}
