//! Error types for component operations

use std::error::Error;
use std::fmt;

use crate::component::LifecyclePhase;
use crate::dom::SelectorError;
use crate::state::StoreError;
use crate::template::TemplateError;

/// Errors that can occur during component operations
#[derive(Debug)]
pub enum ComponentError {
    /// Operation not allowed in the current lifecycle phase
    InvalidLifecycleTransition(LifecyclePhase, String),

    /// Template rendering failed
    Template(TemplateError),

    /// A store mutation issued by the component failed
    Store(StoreError),

    /// A query used an unsupported selector
    Selector(SelectorError),

    /// A JSON payload could not be converted
    Serialization(String),

    /// A state patch was not a JSON object
    InvalidStatePatch(String),
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLifecycleTransition(phase, operation) => write!(
                f,
                "Invalid lifecycle transition: cannot {} while in {:?} phase",
                operation, phase
            ),
            Self::Template(error) => write!(f, "Template error: {}", error),
            Self::Store(error) => write!(f, "Store error: {}", error),
            Self::Selector(error) => write!(f, "Selector error: {}", error),
            Self::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Self::InvalidStatePatch(msg) => write!(f, "Invalid state patch: {}", msg),
        }
    }
}

impl Error for ComponentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Template(error) => Some(error),
            Self::Store(error) => Some(error),
            Self::Selector(error) => Some(error),
            _ => None,
        }
    }
}

impl From<TemplateError> for ComponentError {
    fn from(error: TemplateError) -> Self {
        ComponentError::Template(error)
    }
}

impl From<StoreError> for ComponentError {
    fn from(error: StoreError) -> Self {
        ComponentError::Store(error)
    }
}

impl From<SelectorError> for ComponentError {
    fn from(error: SelectorError) -> Self {
        ComponentError::Selector(error)
    }
}

impl From<serde_json::Error> for ComponentError {
    fn from(error: serde_json::Error) -> Self {
        ComponentError::Serialization(error.to_string())
    }
}
