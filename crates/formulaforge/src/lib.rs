//! # formulaforge
//!
//! A formula evaluation engine for parameterized calculators.
//!
//! A calculator declares typed inputs and ordered outputs whose formulas
//! reference inputs (and earlier outputs) by identifier. This crate ties the
//! pieces together:
//!
//! - Evaluate formulas against a scope, with a fixed rounding policy
//! - Render formulas as LaTeX-style display notation
//! - Run calculation passes as inputs change ([`CalculationSession`])
//! - Author calculators ([`CalculatorDraft`]) and keep them in a file-backed
//!   [`CalculatorStore`]
//! - Import and export calculator documents as JSON, CSV or Markdown
//!
//! ## Example
//!
//! ```rust
//! use formulaforge::prelude::*;
//!
//! let calc = Calculator::new("ohms-law", "Ohm's Law", "Resistance and power")
//!     .with_input(InputField::number("v", "Voltage", "V", "V"))
//!     .with_input(InputField::number("i", "Current", "I", "A"))
//!     .with_output(OutputField::new("r", "Resistance", "R", "Ω", "v / i"))
//!     .with_output(OutputField::new("p", "Power", "P", "W", "v * i"));
//!
//! let mut session = CalculationSession::new(&calc);
//! session.set_inputs([("v", Some(12.0)), ("i", Some(0.5))]).unwrap();
//!
//! assert_eq!(session.results()["r"], 24.0);
//! assert_eq!(session.results()["p"], 6.0);
//! assert_eq!(session.notation("r").unwrap(), r"R = \frac{V}{I}");
//! ```

pub mod builder;
pub mod metadata;
pub mod prelude;
pub mod session;
pub mod store;

pub use builder::CalculatorDraft;
pub use metadata::{complexity, summary, CalculatorMetadata, MAX_COMPLEXITY};
pub use session::{
    calculate, CalculationSession, OutputFailure, PassOutcome, SessionOptions, SessionState,
};
pub use store::{CalculatorStore, StoreConfig, StoreError, StoreResult, STORE_ENV_VAR};

// Re-export core types
pub use formulaforge_core::{
    is_identifier, slugify, validate_input_value, validate_input_values, Calculator,
    CalculatorUpdate, Error, InputField, InputUpdate, InputValidationError, OutputField,
    OutputUpdate, Result, SelectOption, ValueType,
};

// Re-export formula types
pub use formulaforge_formula::{
    display_formula, evaluate, evaluate_with, parse_formula, to_display_notation,
    validate_calculator, validate_formula, EvaluationScope, FormulaError, FormulaExpr,
    FormulaResult, FormulaValidation, NotationResult, RoundingPolicy, ValidationReport,
};

// Re-export import/export types
pub use formulaforge_json::{
    CalculatorReader, CalculatorWriter, ExportFormat, JsonError, JsonResult, ReadOptions,
    WriteOptions,
};
