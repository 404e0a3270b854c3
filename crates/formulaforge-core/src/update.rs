//! Field update operations
//!
//! Builders and stores never write arbitrary keys into a field. Each edit is
//! one variant of a closed enum and is validated when it is applied.

use crate::calculator::Calculator;
use crate::error::{Error, Result};
use crate::field::{InputField, OutputField, SelectOption, ValueType};
use lazy_regex::regex_is_match;

/// Check that `s` can be referenced from a formula
pub fn is_identifier(s: &str) -> bool {
    regex_is_match!(r"^[A-Za-z_][A-Za-z0-9_]*$", s)
}

fn check_identifier(id: &str) -> Result<()> {
    if is_identifier(id) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier(id.to_string()))
    }
}

fn check_bound(field: &'static str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() => Err(Error::invalid_update(field, "must be a finite number")),
        _ => Ok(()),
    }
}

/// A single edit to an [`InputField`]
#[derive(Debug, Clone, PartialEq)]
pub enum InputUpdate {
    Id(String),
    Label(String),
    Symbol(String),
    Unit(String),
    ValueType(ValueType),
    Required(bool),
    Min(Option<f64>),
    Max(Option<f64>),
    Step(Option<f64>),
    Placeholder(String),
    Options(Option<Vec<SelectOption>>),
}

impl InputUpdate {
    /// Apply the edit, rejecting values the field cannot hold
    pub fn apply(self, field: &mut InputField) -> Result<()> {
        match self {
            InputUpdate::Id(id) => {
                check_identifier(&id)?;
                field.id = id;
            }
            InputUpdate::Label(label) => field.label = label,
            InputUpdate::Symbol(symbol) => field.symbol = symbol,
            InputUpdate::Unit(unit) => field.unit = unit,
            InputUpdate::ValueType(value_type) => field.value_type = value_type,
            InputUpdate::Required(required) => field.required = required,
            InputUpdate::Min(min) => {
                check_bound("min", min)?;
                field.min = min;
            }
            InputUpdate::Max(max) => {
                check_bound("max", max)?;
                field.max = max;
            }
            InputUpdate::Step(step) => {
                if let Some(s) = step {
                    if !(s.is_finite() && s > 0.0) {
                        return Err(Error::invalid_update("step", "must be greater than zero"));
                    }
                }
                field.step = step;
            }
            InputUpdate::Placeholder(placeholder) => field.placeholder = placeholder,
            InputUpdate::Options(options) => field.options = options,
        }
        Ok(())
    }
}

/// A single edit to an [`OutputField`]
#[derive(Debug, Clone, PartialEq)]
pub enum OutputUpdate {
    Id(String),
    Label(String),
    Symbol(String),
    Unit(String),
    Formula(String),
    FormulaDisplay(Option<String>),
    Description(Option<String>),
}

impl OutputUpdate {
    /// Apply the edit, rejecting values the field cannot hold
    pub fn apply(self, field: &mut OutputField) -> Result<()> {
        match self {
            OutputUpdate::Id(id) => {
                check_identifier(&id)?;
                field.id = id;
            }
            OutputUpdate::Label(label) => field.label = label,
            OutputUpdate::Symbol(symbol) => field.symbol = symbol,
            OutputUpdate::Unit(unit) => field.unit = unit,
            OutputUpdate::Formula(formula) => field.formula = formula,
            OutputUpdate::FormulaDisplay(display) => {
                field.formula_display = display.filter(|d| !d.trim().is_empty());
            }
            OutputUpdate::Description(description) => field.description = description,
        }
        Ok(())
    }
}

/// A single edit to a stored [`Calculator`]
#[derive(Debug, Clone, PartialEq)]
pub enum CalculatorUpdate {
    Title(String),
    Description(String),
    Category(Option<String>),
    Inputs(Vec<InputField>),
    Outputs(Vec<OutputField>),
}

impl CalculatorUpdate {
    pub fn apply(self, calculator: &mut Calculator) -> Result<()> {
        match self {
            CalculatorUpdate::Title(title) => {
                if title.trim().is_empty() {
                    return Err(Error::invalid_update("title", "must not be blank"));
                }
                calculator.title = title;
            }
            CalculatorUpdate::Description(description) => calculator.description = description,
            CalculatorUpdate::Category(category) => {
                calculator.category = category.filter(|c| !c.trim().is_empty());
            }
            CalculatorUpdate::Inputs(inputs) => calculator.inputs = inputs,
            CalculatorUpdate::Outputs(outputs) => calculator.outputs = outputs,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identifier_grammar() {
        assert!(is_identifier("voltage"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_input_updates() {
        let mut field = InputField::default();
        InputUpdate::Id("v".into()).apply(&mut field).unwrap();
        InputUpdate::Label("Voltage".into()).apply(&mut field).unwrap();
        InputUpdate::Min(Some(0.0)).apply(&mut field).unwrap();
        InputUpdate::Step(Some(0.5)).apply(&mut field).unwrap();

        assert_eq!(field.id, "v");
        assert_eq!(field.label, "Voltage");
        assert_eq!(field.min, Some(0.0));
        assert_eq!(field.step, Some(0.5));
    }

    #[test]
    fn test_input_updates_rejected() {
        let mut field = InputField::number("v", "Voltage", "V", "V");
        assert!(matches!(
            InputUpdate::Id("bad id".into()).apply(&mut field),
            Err(Error::InvalidIdentifier(_))
        ));
        assert!(matches!(
            InputUpdate::Step(Some(0.0)).apply(&mut field),
            Err(Error::InvalidUpdate { field: "step", .. })
        ));
        assert!(InputUpdate::Max(Some(f64::INFINITY)).apply(&mut field).is_err());
        assert_eq!(field.id, "v");
        assert_eq!(field.max, None);
    }

    #[test]
    fn test_output_display_blank_clears() {
        let mut field = OutputField::new("r", "Resistance", "R", "Ω", "v/i").with_display("R");
        OutputUpdate::FormulaDisplay(Some("  ".into()))
            .apply(&mut field)
            .unwrap();
        assert_eq!(field.formula_display, None);
    }

    #[test]
    fn test_calculator_updates() {
        let mut calc = Calculator::new("c", "Title", "Desc");
        CalculatorUpdate::Category(Some("Physics".into()))
            .apply(&mut calc)
            .unwrap();
        assert_eq!(calc.category.as_deref(), Some("Physics"));
        assert!(CalculatorUpdate::Title(" ".into()).apply(&mut calc).is_err());
        assert_eq!(calc.title, "Title");
    }
}
