//! JSON boundary error types

use thiserror::Error;

/// Result type for import/export operations
pub type JsonResult<T> = std::result::Result<T, JsonError>;

/// Errors that can occur while importing or exporting calculators
#[derive(Debug, Error)]
pub enum JsonError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON, or a field of the wrong type
    #[error("Failed to import calculator: {0}")]
    Json(#[from] serde_json::Error),

    /// One or more of the mandatory top-level fields is absent or null
    #[error("Failed to import calculator: Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// Document has the wrong structure
    #[error("Failed to import calculator: {0}")]
    InvalidShape(String),

    /// Document parsed but the calculator definition is invalid
    #[error("Failed to import calculator: Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Calculator could not be serialized
    #[error("Failed to export calculator: {0}")]
    Export(serde_json::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
