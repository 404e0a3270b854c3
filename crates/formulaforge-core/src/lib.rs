//! # formulaforge-core
//!
//! Core data structures for the formulaforge calculator engine.
//!
//! This crate provides the fundamental types used throughout formulaforge:
//! - [`Calculator`] - A titled set of ordered inputs and ordered outputs
//! - [`InputField`] and [`OutputField`] - Typed fields referenced by formulas
//! - [`InputUpdate`], [`OutputUpdate`], [`CalculatorUpdate`] - Closed edit operations
//! - Input value validation run at the start of every recalculation pass
//!
//! ## Example
//!
//! ```rust
//! use formulaforge_core::{Calculator, InputField, OutputField};
//!
//! let calc = Calculator::new("ohms-law", "Ohm's Law", "Relates voltage, current and resistance")
//!     .with_input(InputField::number("v", "Voltage", "V", "V"))
//!     .with_input(InputField::number("i", "Current", "I", "A"))
//!     .with_output(OutputField::new("r", "Resistance", "R", "Ω", "v / i"));
//!
//! assert_eq!(calc.input_ids().count(), 2);
//! ```

pub mod calculator;
pub mod error;
pub mod field;
pub mod update;
pub mod validation;

// Re-exports for convenience
pub use calculator::{slugify, Calculator};
pub use error::{Error, Result};
pub use field::{InputField, OutputField, SelectOption, ValueType, DEFAULT_PLACEHOLDER};
pub use update::{is_identifier, CalculatorUpdate, InputUpdate, OutputUpdate};
pub use validation::{validate_input_value, validate_input_values, InputValidationError};
