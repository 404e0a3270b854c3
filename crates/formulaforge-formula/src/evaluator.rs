//! Formula evaluator
//!
//! Evaluates formula ASTs against a scope of named values and applies the
//! result rounding policy.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::functions::FunctionRegistry;
use crate::parser::parse_formula;
use ahash::AHashMap;
use std::collections::HashMap;

/// Identifier → value bindings visible to one evaluation.
///
/// A calculation pass seeds the scope with the bound input values and binds
/// each computed output before evaluating the next one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationScope {
    values: AHashMap<String, f64>,
}

impl EvaluationScope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind (or rebind) an identifier
    pub fn bind(&mut self, id: impl Into<String>, value: f64) {
        self.values.insert(id.into(), value);
    }

    /// Look up an identifier
    pub fn get(&self, id: &str) -> Option<f64> {
        self.values.get(id).copied()
    }

    /// Check if an identifier is bound
    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for EvaluationScope {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut scope = Self::new();
        for (id, value) in iter {
            scope.bind(id, value);
        }
        scope
    }
}

impl From<HashMap<String, f64>> for EvaluationScope {
    fn from(values: HashMap<String, f64>) -> Self {
        values.into_iter().collect()
    }
}

/// 2^52: every `f64` at or above this magnitude is an integer
const MAX_EXACT_INTEGER: f64 = 4_503_599_627_370_496.0;

/// How raw results are rounded before they are shown or bound into a scope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundingPolicy {
    /// Decimal places kept (default: 4)
    pub decimal_places: u32,
    /// Below this magnitude the mantissa is rounded instead (default: 0.0001)
    pub small_magnitude: f64,
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self {
            decimal_places: 4,
            small_magnitude: 0.0001,
        }
    }
}

impl RoundingPolicy {
    /// Round a raw result, or `None` if it is not finite.
    ///
    /// Values smaller than `small_magnitude` are written as
    /// `mantissa × 10^exponent` with `exponent = floor(log10(|raw|))` and the
    /// mantissa is rounded, so tiny results keep their significant digits.
    /// Ties round away from zero.
    pub fn round(&self, raw: f64) -> Option<f64> {
        if !raw.is_finite() {
            return None;
        }
        if raw == 0.0 {
            return Some(0.0);
        }

        let factor = 10f64.powi(self.decimal_places as i32);
        let magnitude = raw.abs();

        let rounded = if magnitude < self.small_magnitude {
            let exponent = magnitude.log10().floor();
            let scale = 10f64.powf(exponent);
            // Subnormal results have no representable scale
            if !scale.is_normal() {
                return Some(raw);
            }
            let rounded_mantissa = (raw / scale * factor).round() / factor;
            rounded_mantissa * scale
        } else if magnitude >= MAX_EXACT_INTEGER / factor || !(magnitude * factor).is_finite() {
            // Scaled value is already an integer
            raw
        } else {
            (raw * factor).round() / factor
        };

        rounded.is_finite().then_some(rounded)
    }
}

/// Outcome of evaluating a formula string
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Rounded value, `0` when the raw result was not finite
    pub value: f64,
    /// Unrounded result
    pub raw: f64,
}

impl Evaluation {
    /// Whether the raw result was NaN or infinite and the value fell back to `0`
    pub fn is_degraded(&self) -> bool {
        !self.raw.is_finite()
    }
}

/// Parse and evaluate `formula`, rounding the result with the default policy.
///
/// Non-finite results (division by zero, `sqrt` of a negative) are not errors:
/// they evaluate to `0` and a warning is logged.
///
/// # Example
/// ```rust
/// use formulaforge_formula::{evaluate, EvaluationScope};
///
/// let scope: EvaluationScope = [("v", 10.0), ("i", 2.0)].into_iter().collect();
/// assert_eq!(evaluate("v / i", &scope).unwrap(), 5.0);
/// assert_eq!(evaluate("1/3", &EvaluationScope::new()).unwrap(), 0.3333);
/// ```
pub fn evaluate(formula: &str, scope: &EvaluationScope) -> FormulaResult<f64> {
    evaluate_with(formula, scope, &RoundingPolicy::default()).map(|e| e.value)
}

/// Parse and evaluate `formula` with an explicit rounding policy
pub fn evaluate_with(
    formula: &str,
    scope: &EvaluationScope,
    policy: &RoundingPolicy,
) -> FormulaResult<Evaluation> {
    let ast = parse_formula(formula)?;
    let raw = evaluate_expr(&ast, scope)?;

    let value = match policy.round(raw) {
        Some(value) => value,
        None => {
            tracing::warn!(formula, raw, "formula produced a non-finite value, using 0");
            0.0
        }
    };

    Ok(Evaluation { value, raw })
}

/// Evaluate a formula expression without rounding
pub fn evaluate_expr(expr: &FormulaExpr, scope: &EvaluationScope) -> FormulaResult<f64> {
    match expr {
        // === Literals ===
        FormulaExpr::Number(n) => Ok(*n),
        FormulaExpr::Scientific { value, .. } => Ok(*value),

        // === References ===
        FormulaExpr::Variable(name) => resolve_variable(name, scope),

        FormulaExpr::Group(inner) => evaluate_expr(inner, scope),

        // === Operators ===
        FormulaExpr::BinaryOp { op, left, right } => {
            let left = evaluate_expr(left, scope)?;
            let right = evaluate_expr(right, scope)?;
            Ok(evaluate_binary_op(*op, left, right))
        }

        FormulaExpr::UnaryOp { op, operand } => {
            let value = evaluate_expr(operand, scope)?;
            Ok(match op {
                UnaryOperator::Negate => -value,
            })
        }

        // === Functions ===
        FormulaExpr::Function { name, args } => evaluate_function(name, args, scope),
    }
}

fn resolve_variable(name: &str, scope: &EvaluationScope) -> FormulaResult<f64> {
    if let Some(value) = scope.get(name) {
        return Ok(value);
    }

    let registry = FunctionRegistry::global();
    if let Some(value) = registry.constant(name) {
        return Ok(value);
    }
    if registry.get(name).is_some() {
        return Err(FormulaError::FunctionAsValue(name.to_string()));
    }

    Err(FormulaError::UndefinedVariable(name.to_string()))
}

/// Evaluate a binary operation
fn evaluate_binary_op(op: BinaryOperator, left: f64, right: f64) -> f64 {
    match op {
        BinaryOperator::Add => left + right,
        BinaryOperator::Subtract => left - right,
        BinaryOperator::Multiply => left * right,
        BinaryOperator::Divide => left / right,
        BinaryOperator::Power => left.powf(right),
    }
}

/// Evaluate a function call
fn evaluate_function(
    name: &str,
    args: &[FormulaExpr],
    scope: &EvaluationScope,
) -> FormulaResult<f64> {
    let def = FunctionRegistry::global()
        .get(name)
        .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

    if args.len() < def.min_args || args.len() > def.max_args {
        return Err(FormulaError::ArgumentCount {
            function: name.to_string(),
            expected: def.arity(),
            actual: args.len(),
        });
    }

    let values = args
        .iter()
        .map(|arg| evaluate_expr(arg, scope))
        .collect::<FormulaResult<Vec<f64>>>()?;

    Ok((def.implementation)(&values))
}
