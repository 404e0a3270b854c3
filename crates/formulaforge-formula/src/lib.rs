//! # formulaforge-formula
//!
//! Formula parser, evaluator and notation converter for formulaforge.
//!
//! This crate provides:
//! - Formula parsing (text → AST) for a small arithmetic language with a
//!   fixed whitelist of math functions and the constants `pi` and `e`
//! - Formula evaluation (AST → rounded number) against an identifier scope
//! - Conversion of formulas to LaTeX-style display notation
//! - Formula and calculator definition validation
//!
//! Formulas are never executed as host code: anything that is not a number,
//! an operator, a bound identifier or a whitelisted name is rejected.
//!
//! ## Example
//!
//! ```rust
//! use formulaforge_formula::{evaluate, to_display_notation, EvaluationScope};
//! use std::collections::HashMap;
//!
//! let scope: EvaluationScope = [("a", 3.0), ("b", 4.0)].into_iter().collect();
//! assert_eq!(evaluate("sqrt(a^2 + b^2)", &scope).unwrap(), 5.0);
//!
//! let notation = to_display_notation("sqrt(a^2 + b^2)", &HashMap::new(), "c");
//! assert_eq!(notation.notation, r"c = \sqrt{a^{2} + b^{2}}");
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod notation;
pub mod parser;
pub mod references;
pub mod validate;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, evaluate_expr, evaluate_with, Evaluation, EvaluationScope, RoundingPolicy};
pub use functions::FunctionRegistry;
pub use notation::{display_formula, to_display_notation, NotationConverter, NotationResult};
pub use parser::{parse_formula, scan_identifiers};
pub use references::formula_complexity;
pub use validate::{validate_calculator, validate_formula, FormulaValidation, ValidationReport};
