//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Formula is blank
    #[error("Formula cannot be empty")]
    Empty,

    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Identifier bound neither in the scope nor in the whitelist
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    /// Call to a function outside the whitelist
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Whitelisted function name used where a value is expected
    #[error("Function {0} must be called with arguments")]
    FunctionAsValue(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },
}

impl FormulaError {
    /// Whether the error is an unresolved identifier rather than a syntax fault
    pub fn is_unresolved(&self) -> bool {
        matches!(
            self,
            FormulaError::UndefinedVariable(_) | FormulaError::UnknownFunction(_)
        )
    }
}
