//! Calculation session
//!
//! Holds the values bound to a calculator's inputs and recomputes every output
//! whenever one of them changes.
//!
//! A pass validates the bound values first. If any input fails its
//! `required`/`min`/`max` check, the pass stops there: no output is computed and
//! results from the previous pass are cleared. Otherwise outputs are evaluated
//! in declaration order against a running scope, and each computed value is
//! bound under the output's id so later outputs can reference it. An output
//! that fails to evaluate yields `0` without affecting the others.
//!
//! # Example
//!
//! ```rust
//! use formulaforge::prelude::*;
//!
//! let calc = Calculator::new("ohms-law", "Ohm's Law", "Resistance from voltage and current")
//!     .with_input(InputField::number("v", "Voltage", "V", "V"))
//!     .with_input(InputField::number("i", "Current", "I", "A"))
//!     .with_output(OutputField::new("r", "Resistance", "R", "Ω", "v / i"));
//!
//! let mut session = CalculationSession::new(&calc);
//! session.set_input("v", Some(10.0)).unwrap();
//! assert_eq!(session.errors().get("i").map(String::as_str), Some("This field is required"));
//!
//! session.set_input("i", Some(4.0)).unwrap();
//! assert_eq!(session.results()["r"], 2.5);
//! ```

use crate::{Calculator, Error, Result};
use formulaforge_core::validate_input_values;
use formulaforge_formula::{display_formula, evaluate_with, EvaluationScope, RoundingPolicy};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Options for a calculation session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    /// Decimal places results are rounded to (default: 4)
    pub decimal_places: u32,
    /// Magnitude below which the mantissa is rounded instead (default: 0.0001)
    pub small_magnitude: f64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        let policy = RoundingPolicy::default();
        Self {
            decimal_places: policy.decimal_places,
            small_magnitude: policy.small_magnitude,
        }
    }
}

impl SessionOptions {
    fn rounding(&self) -> RoundingPolicy {
        RoundingPolicy {
            decimal_places: self.decimal_places,
            small_magnitude: self.small_magnitude,
        }
    }
}

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SessionState {
    /// No pass in flight
    #[default]
    Idle,
    /// A pass is running
    Computing,
}

/// An output that fell back to `0`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFailure {
    pub output_id: String,
    pub reason: String,
}

/// Result of one calculation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PassOutcome {
    /// Output id → rounded value. Empty when any input failed validation.
    pub results: BTreeMap<String, f64>,
    /// Input id → validation message
    pub errors: BTreeMap<String, String>,
    /// Outputs that failed to evaluate or produced a non-finite value
    pub failures: Vec<OutputFailure>,
}

impl PassOutcome {
    /// Whether every input passed validation
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run one calculation pass over `values` (input id → bound value).
///
/// Absent ids and `NaN` values count as unbound.
pub fn calculate(
    calculator: &Calculator,
    values: &HashMap<String, Option<f64>>,
    options: &SessionOptions,
) -> PassOutcome {
    let errors = validate_input_values(calculator, values);
    if !errors.is_empty() {
        tracing::debug!(calculator = %calculator.id, errors = errors.len(), "pass stopped by input validation");
        return PassOutcome {
            errors,
            ..PassOutcome::default()
        };
    }

    let mut scope: EvaluationScope = values
        .iter()
        .filter_map(|(id, value)| value.filter(|v| !v.is_nan()).map(|v| (id.as_str(), v)))
        .collect();

    let policy = options.rounding();
    let mut outcome = PassOutcome::default();

    for output in &calculator.outputs {
        match evaluate_with(&output.formula, &scope, &policy) {
            Ok(evaluation) => {
                if evaluation.is_degraded() {
                    outcome.failures.push(OutputFailure {
                        output_id: output.id.clone(),
                        reason: format!("Non-finite result {}", evaluation.raw),
                    });
                }
                outcome.results.insert(output.id.clone(), evaluation.value);
                scope.bind(output.id.as_str(), evaluation.value);
            }
            Err(e) => {
                tracing::warn!(
                    calculator = %calculator.id,
                    output = %output.id,
                    error = %e,
                    "output failed to evaluate, using 0"
                );
                outcome.failures.push(OutputFailure {
                    output_id: output.id.clone(),
                    reason: e.to_string(),
                });
                outcome.results.insert(output.id.clone(), 0.0);
            }
        }
    }

    tracing::debug!(
        calculator = %calculator.id,
        outputs = outcome.results.len(),
        failures = outcome.failures.len(),
        "pass complete"
    );
    outcome
}

/// Bound input values and the outcome of the latest pass for one calculator
#[derive(Debug, Clone)]
pub struct CalculationSession {
    calculator: Calculator,
    options: SessionOptions,
    values: HashMap<String, Option<f64>>,
    state: SessionState,
    outcome: PassOutcome,
}

impl CalculationSession {
    /// Create a session with default options. No pass runs until an input is set.
    pub fn new(calculator: &Calculator) -> Self {
        Self::with_options(calculator, SessionOptions::default())
    }

    /// Create a session with custom options
    pub fn with_options(calculator: &Calculator, options: SessionOptions) -> Self {
        Self {
            calculator: calculator.clone(),
            options,
            values: HashMap::new(),
            state: SessionState::Idle,
            outcome: PassOutcome::default(),
        }
    }

    /// Bind a value to an input and recompute if it changed.
    ///
    /// `None` and `NaN` clear the binding.
    pub fn set_input(&mut self, id: &str, value: Option<f64>) -> Result<&PassOutcome> {
        self.check_input(id)?;
        if self.bind(id, value) {
            self.run_pass();
        }
        Ok(&self.outcome)
    }

    /// Bind several values at once with a single pass.
    ///
    /// Nothing is bound if any id is unknown.
    pub fn set_inputs<'a, I>(&mut self, values: I) -> Result<&PassOutcome>
    where
        I: IntoIterator<Item = (&'a str, Option<f64>)>,
    {
        let values: Vec<_> = values.into_iter().collect();
        for (id, _) in &values {
            self.check_input(id)?;
        }

        let mut changed = false;
        for (id, value) in values {
            changed |= self.bind(id, value);
        }
        if changed {
            self.run_pass();
        }
        Ok(&self.outcome)
    }

    /// Clear the value bound to an input
    pub fn clear_input(&mut self, id: &str) -> Result<&PassOutcome> {
        self.set_input(id, None)
    }

    /// Run a pass with the current values
    pub fn recalculate(&mut self) -> &PassOutcome {
        self.run_pass();
        &self.outcome
    }

    /// Drop every bound value and the latest outcome
    pub fn reset(&mut self) {
        self.values.clear();
        self.outcome = PassOutcome::default();
        self.state = SessionState::Idle;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Value currently bound to an input
    pub fn value(&self, id: &str) -> Option<f64> {
        self.values.get(id).copied().flatten()
    }

    /// Output id → rounded value from the latest pass
    pub fn results(&self) -> &BTreeMap<String, f64> {
        &self.outcome.results
    }

    /// Input id → validation message from the latest pass
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.outcome.errors
    }

    /// Outputs that fell back to `0` in the latest pass
    pub fn failures(&self) -> &[OutputFailure] {
        &self.outcome.failures
    }

    pub fn outcome(&self) -> &PassOutcome {
        &self.outcome
    }

    /// Display notation for an output, `None` for an unknown id
    pub fn notation(&self, output_id: &str) -> Option<String> {
        self.calculator
            .output(output_id)
            .map(|output| display_formula(output, &self.calculator.inputs))
    }

    fn check_input(&self, id: &str) -> Result<()> {
        if self.calculator.input(id).is_some() {
            Ok(())
        } else {
            Err(Error::UnknownInput(id.to_string()))
        }
    }

    /// Store a binding, returning whether it changed
    fn bind(&mut self, id: &str, value: Option<f64>) -> bool {
        let value = value.filter(|v| !v.is_nan());
        let previous = self.values.insert(id.to_string(), value);
        match previous {
            Some(previous) => previous.map(f64::to_bits) != value.map(f64::to_bits),
            None => true,
        }
    }

    fn run_pass(&mut self) {
        self.state = SessionState::Computing;
        self.outcome = calculate(&self.calculator, &self.values, &self.options);
        self.state = SessionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputField, OutputField};
    use pretty_assertions::assert_eq;

    fn ohms_law() -> Calculator {
        Calculator::new("ohms-law", "Ohm's Law", "Resistance from voltage and current")
            .with_input(InputField::number("v", "Voltage", "V", "V").with_range(Some(0.0), None))
            .with_input(InputField::number("i", "Current", "I", "A"))
            .with_output(OutputField::new("resistance", "Resistance", "R", "Ω", "v / i"))
            .with_output(OutputField::new("power", "Power", "P", "W", "v * i"))
            .with_output(OutputField::new("doublePower", "Double power", "2P", "W", "power * 2"))
    }

    #[test]
    fn test_scope_chaining() {
        let mut session = CalculationSession::new(&ohms_law());
        let outcome = session.set_inputs([("v", Some(10.0)), ("i", Some(2.0))]).unwrap();

        assert!(outcome.is_valid());
        assert_eq!(outcome.results["resistance"], 5.0);
        assert_eq!(outcome.results["power"], 20.0);
        assert_eq!(outcome.results["doublePower"], 40.0);
        assert!(outcome.failures.is_empty());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_validation_clears_stale_results() {
        let mut session = CalculationSession::new(&ohms_law());
        session.set_inputs([("v", Some(10.0)), ("i", Some(2.0))]).unwrap();
        assert_eq!(session.results().len(), 3);

        session.set_input("v", Some(-1.0)).unwrap();
        assert!(session.results().is_empty());
        assert_eq!(session.errors()["v"], "Value must be at least 0");

        session.clear_input("i").unwrap();
        assert_eq!(session.errors()["i"], "This field is required");
    }

    #[test]
    fn test_nan_is_unbound() {
        let mut session = CalculationSession::new(&ohms_law());
        session.set_inputs([("v", Some(1.0)), ("i", Some(f64::NAN))]).unwrap();
        assert_eq!(session.value("i"), None);
        assert_eq!(session.errors()["i"], "This field is required");
    }

    #[test]
    fn test_failing_output_does_not_block_others() {
        let calc = ohms_law()
            .with_output(OutputField::new("broken", "Broken", "B", "", "v / missing"))
            .with_output(OutputField::new("after", "After", "A", "", "resistance + 1"));
        let mut session = CalculationSession::new(&calc);
        session.set_inputs([("v", Some(10.0)), ("i", Some(0.0))]).unwrap();

        // v / 0 is non-finite and degrades to 0, which is still bound
        assert_eq!(session.results()["resistance"], 0.0);
        assert_eq!(session.results()["broken"], 0.0);
        assert_eq!(session.results()["after"], 1.0);

        let failed: Vec<&str> = session.failures().iter().map(|f| f.output_id.as_str()).collect();
        assert_eq!(failed, vec!["resistance", "broken"]);
        assert_eq!(session.failures()[1].reason, "Undefined variable: missing");
    }

    #[test]
    fn test_declaration_order_matters() {
        let calc = Calculator::new("c", "Chain", "Out of order")
            .with_input(InputField::number("x", "X", "x", ""))
            .with_output(OutputField::new("early", "Early", "E", "", "later + 1"))
            .with_output(OutputField::new("later", "Later", "L", "", "x * 2"));
        let mut session = CalculationSession::new(&calc);
        session.set_input("x", Some(3.0)).unwrap();

        assert_eq!(session.results()["early"], 0.0);
        assert_eq!(session.results()["later"], 6.0);
    }

    #[test]
    fn test_optional_unbound_input_fails_its_outputs_only() {
        let calc = Calculator::new("c", "Optional", "Optional offset")
            .with_input(InputField::number("x", "X", "x", ""))
            .with_input(InputField::number("offset", "Offset", "o", "").optional())
            .with_output(OutputField::new("double", "Double", "D", "", "x * 2"))
            .with_output(OutputField::new("shifted", "Shifted", "S", "", "x + offset"));
        let mut session = CalculationSession::new(&calc);
        session.set_input("x", Some(2.0)).unwrap();

        assert!(session.errors().is_empty());
        assert_eq!(session.results()["double"], 4.0);
        assert_eq!(session.results()["shifted"], 0.0);
    }

    #[test]
    fn test_unknown_input() {
        let mut session = CalculationSession::new(&ohms_law());
        let err = session.set_input("r", Some(1.0)).unwrap_err();
        assert!(matches!(err, Error::UnknownInput(id) if id == "r"));

        // No partial binding
        assert!(session.set_inputs([("v", Some(1.0)), ("nope", Some(1.0))]).is_err());
        assert_eq!(session.value("v"), None);
    }

    #[test]
    fn test_reset_and_recalculate() {
        let mut session = CalculationSession::new(&ohms_law());
        session.set_inputs([("v", Some(9.0)), ("i", Some(3.0))]).unwrap();
        assert_eq!(session.recalculate().results["resistance"], 3.0);

        session.reset();
        assert!(session.results().is_empty());
        assert!(session.errors().is_empty());
        assert_eq!(session.value("v"), None);
    }

    #[test]
    fn test_custom_rounding() {
        let options = SessionOptions {
            decimal_places: 2,
            ..SessionOptions::default()
        };
        let mut session = CalculationSession::with_options(&ohms_law(), options);
        session.set_inputs([("v", Some(1.0)), ("i", Some(3.0))]).unwrap();
        assert_eq!(session.results()["resistance"], 0.33);
    }

    #[test]
    fn test_notation() {
        let session = CalculationSession::new(&ohms_law());
        assert_eq!(session.notation("resistance").as_deref(), Some(r"R = \frac{V}{I}"));
        assert_eq!(session.notation("doublePower").as_deref(), Some(r"2P = power \cdot 2"));
        assert_eq!(session.notation("nope"), None);
    }
}
