//! Formula and calculator definition validation
//!
//! Both validators collect every problem they find instead of stopping at the
//! first one, so a builder can show them all at once.

use crate::error::FormulaError;
use crate::evaluator::{evaluate_expr, EvaluationScope};
use crate::functions::FunctionRegistry;
use crate::parser::{parse_formula, scan_identifiers};
use formulaforge_core::{is_identifier, Calculator, ValueType};
use serde::Serialize;
use std::collections::HashSet;

/// Value bound to every declared identifier during the trial evaluation
const TRIAL_VALUE: f64 = 1.0;

/// Outcome of validating a single formula
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Validate `formula` against the identifiers it may reference.
///
/// # Example
/// ```rust
/// use formulaforge_formula::validate_formula;
///
/// let result = validate_formula("v / i", &["v", "i"]);
/// assert!(result.is_valid);
///
/// let result = validate_formula("v / r", &["v", "i"]);
/// assert_eq!(result.errors, vec!["Undefined variables: r"]);
/// ```
pub fn validate_formula<S: AsRef<str>>(formula: &str, declared: &[S]) -> FormulaValidation {
    if formula.trim().is_empty() {
        return FormulaValidation {
            is_valid: false,
            errors: vec![FormulaError::Empty.to_string()],
            warnings: Vec::new(),
        };
    }

    let declared: HashSet<&str> = declared.iter().map(|d| d.as_ref()).collect();
    let registry = FunctionRegistry::global();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let undefined: Vec<String> = scan_identifiers(formula)
        .into_iter()
        .filter(|name| !declared.contains(name.as_str()) && !registry.is_whitelisted(name))
        .collect();
    if !undefined.is_empty() {
        errors.push(format!("Undefined variables: {}", undefined.join(", ")));
    }

    match parse_formula(formula) {
        Ok(ast) => {
            let scope: EvaluationScope = declared.iter().map(|id| (*id, TRIAL_VALUE)).collect();
            match evaluate_expr(&ast, &scope) {
                Ok(raw) if !raw.is_finite() => {
                    warnings.push("Formula may produce invalid results for some input values".to_string());
                }
                Ok(_) => {}
                Err(e) if e.is_unresolved() => {}
                Err(e) => errors.push(format!("Formula syntax error: {}", e)),
            }
        }
        Err(FormulaError::Parse(message)) => {
            errors.push(format!("Formula syntax error: {}", message));
        }
        Err(e) => errors.push(format!("Formula syntax error: {}", e)),
    }

    FormulaValidation {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Problems found in a calculator definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation failed: {}", self.errors.join(", "))
    }
}

impl std::error::Error for ValidationReport {}

/// Validate a whole calculator definition.
///
/// Each output formula may reference every input plus the outputs declared
/// before it, matching the order of a calculation pass.
pub fn validate_calculator(calculator: &Calculator) -> ValidationReport {
    let mut report = ValidationReport::default();

    if calculator.title.trim().is_empty() {
        report.error("Title is required");
    }
    if calculator.description.trim().is_empty() {
        report.error("Description is required");
    }
    if calculator.inputs.is_empty() {
        report.error("At least one input is required");
    }
    if calculator.outputs.is_empty() {
        report.error("At least one output is required");
    }

    // === Inputs ===
    let mut input_ids = HashSet::new();
    for (index, input) in calculator.inputs.iter().enumerate() {
        let prefix = format!("Input {}", index + 1);

        if input.label.trim().is_empty() {
            report.error(format!("{}: Label is required", prefix));
        }
        if input.symbol.trim().is_empty() {
            report.error(format!("{}: Symbol is required", prefix));
        }
        check_id(&mut report, &prefix, &input.id);
        if !input.id.is_empty() && !input_ids.insert(input.id.as_str()) {
            report.error(format!("{}: Duplicate id '{}'", prefix, input.id));
        }
        if let (Some(min), Some(max)) = (input.min, input.max) {
            if min > max {
                report.error(format!("{}: Minimum cannot exceed maximum", prefix));
            }
        }
        let has_options = input.options.as_ref().is_some_and(|o| !o.is_empty());
        if input.value_type == ValueType::Select && !has_options {
            report.warning(format!("{}: Select field has no options", prefix));
        }
    }

    // === Outputs ===
    let mut visible: Vec<&str> = calculator.inputs.iter().map(|i| i.id.as_str()).collect();
    let mut output_ids = HashSet::new();
    for (index, output) in calculator.outputs.iter().enumerate() {
        let prefix = format!("Output {}", index + 1);

        if output.label.trim().is_empty() {
            report.error(format!("{}: Label is required", prefix));
        }
        if output.symbol.trim().is_empty() {
            report.error(format!("{}: Symbol is required", prefix));
        }
        check_id(&mut report, &prefix, &output.id);
        if input_ids.contains(output.id.as_str()) {
            report.error(format!("{}: Id '{}' is already used by an input", prefix, output.id));
        } else if !output.id.is_empty() && !output_ids.insert(output.id.as_str()) {
            report.error(format!("{}: Duplicate id '{}'", prefix, output.id));
        }

        if output.formula.trim().is_empty() {
            report.error(format!("{}: Formula is required", prefix));
        } else {
            let validation = validate_formula(&output.formula, &visible);
            if !validation.is_valid {
                report.error(format!("{}: {}", prefix, validation.errors.join(", ")));
            }
            for warning in validation.warnings {
                report.warning(format!("{}: {}", prefix, warning));
            }
        }

        visible.push(output.id.as_str());
    }

    report
}

fn check_id(report: &mut ValidationReport, prefix: &str, id: &str) {
    if id.is_empty() {
        report.error(format!("{}: Id is required", prefix));
    } else if !is_identifier(id) {
        report.error(format!("{}: Id '{}' is not a valid identifier", prefix, id));
    }
}
