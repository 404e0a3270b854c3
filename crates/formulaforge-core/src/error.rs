//! Error types for formulaforge-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in formulaforge-core
#[derive(Debug, Error)]
pub enum Error {
    /// Input id not declared by the calculator
    #[error("Unknown input: {0}")]
    UnknownInput(String),

    /// Calculator id not present in a store
    #[error("Calculator not found: {0}")]
    UnknownCalculator(String),

    /// Calculator id already present in a store
    #[error("Calculator already exists: {0}")]
    DuplicateCalculator(String),

    /// Field index out of bounds
    #[error("{kind} index {index} out of bounds (count: {count})")]
    FieldIndexOutOfBounds {
        kind: &'static str,
        index: usize,
        count: usize,
    },

    /// Identifier does not follow the formula identifier grammar
    #[error("Invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// Field update rejected at the boundary
    #[error("Invalid update for {field}: {reason}")]
    InvalidUpdate {
        field: &'static str,
        reason: String,
    },
}

impl Error {
    pub(crate) fn invalid_update(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidUpdate {
            field,
            reason: reason.into(),
        }
    }
}
