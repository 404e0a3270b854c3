//! Calculator builder
//!
//! A [`CalculatorDraft`] is an editable calculator that may be incomplete.
//! Fields are edited through the closed [`InputUpdate`] / [`OutputUpdate`]
//! operations and [`CalculatorDraft::build`] produces a validated
//! [`Calculator`].

use crate::{
    Calculator, CalculatorUpdate, Error, InputField, InputUpdate, OutputField, OutputUpdate, Result,
};
use chrono::{SecondsFormat, Utc};
use formulaforge_core::slugify;
use formulaforge_formula::{to_display_notation, validate_calculator, ValidationReport};
use lazy_regex::regex_is_match;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Current time as an RFC 3339 timestamp
pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Identifier for a field created without one: `<prefix>_<millis>_<random>`
fn generate_field_id(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), suffix)
}

/// An editable calculator definition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculatorDraft {
    calculator: Calculator,
}

impl CalculatorDraft {
    /// Create an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing an existing calculator, keeping its ids and creation time
    pub fn from_calculator(calculator: &Calculator) -> Self {
        Self {
            calculator: calculator.clone(),
        }
    }

    /// Clear everything
    pub fn reset(&mut self) {
        self.calculator = Calculator::default();
    }

    /// Edit the title, description, category or field lists
    pub fn update(&mut self, update: CalculatorUpdate) -> Result<()> {
        update.apply(&mut self.calculator)
    }

    pub fn title(&self) -> &str {
        &self.calculator.title
    }

    pub fn inputs(&self) -> &[InputField] {
        &self.calculator.inputs
    }

    pub fn outputs(&self) -> &[OutputField] {
        &self.calculator.outputs
    }

    // === Inputs ===

    /// Append a blank number input, returning its index
    pub fn add_input(&mut self) -> usize {
        self.push_input(InputField::default())
    }

    /// Append a prepared input, returning its index
    pub fn push_input(&mut self, input: InputField) -> usize {
        self.calculator.inputs.push(input);
        self.calculator.inputs.len() - 1
    }

    pub fn remove_input(&mut self, index: usize) -> Result<InputField> {
        check_index("Input", index, self.calculator.inputs.len())?;
        Ok(self.calculator.inputs.remove(index))
    }

    pub fn update_input(&mut self, index: usize, update: InputUpdate) -> Result<()> {
        let count = self.calculator.inputs.len();
        let input = self
            .calculator
            .inputs
            .get_mut(index)
            .ok_or(Error::FieldIndexOutOfBounds {
                kind: "Input",
                index,
                count,
            })?;
        update.apply(input)
    }

    // === Outputs ===

    /// Append a blank output, returning its index
    pub fn add_output(&mut self) -> usize {
        self.push_output(OutputField::default())
    }

    /// Append a prepared output, returning its index
    pub fn push_output(&mut self, output: OutputField) -> usize {
        self.calculator.outputs.push(output);
        self.calculator.outputs.len() - 1
    }

    pub fn remove_output(&mut self, index: usize) -> Result<OutputField> {
        check_index("Output", index, self.calculator.outputs.len())?;
        Ok(self.calculator.outputs.remove(index))
    }

    pub fn update_output(&mut self, index: usize, update: OutputUpdate) -> Result<()> {
        let output = self.output_mut(index)?;
        update.apply(output)
    }

    /// Append a token (identifier, number, function call) to an output formula.
    ///
    /// When the formula already ends in an operand, `" * "` is inserted first
    /// so that clicking two inputs in a row multiplies them.
    pub fn append_token(&mut self, index: usize, token: &str) -> Result<()> {
        let output = self.output_mut(index)?;
        if regex_is_match!(r"[A-Za-z0-9_)]$", &output.formula) {
            output.formula.push_str(" * ");
        }
        output.formula.push_str(token);
        Ok(())
    }

    /// Notation for an output's formula, `None` while the formula is blank
    pub fn preview_notation(&self, index: usize) -> Result<Option<String>> {
        let output = self
            .calculator
            .outputs
            .get(index)
            .ok_or(Error::FieldIndexOutOfBounds {
                kind: "Output",
                index,
                count: self.calculator.outputs.len(),
            })?;
        if output.formula.trim().is_empty() {
            return Ok(None);
        }

        let symbol = if output.symbol.trim().is_empty() {
            format!("output_{}", index)
        } else {
            output.symbol.clone()
        };
        let result = to_display_notation(&output.formula, &self.calculator.input_symbols(), &symbol);
        Ok(Some(result.notation))
    }

    /// Validate the calculator the draft would build
    pub fn validate(&self) -> ValidationReport {
        validate_calculator(&self.assemble())
    }

    /// Build the calculator.
    ///
    /// Blank field ids are generated, a blank calculator id is derived from
    /// the title and outputs without a notation override get the converted
    /// notation when conversion succeeds.
    pub fn build(&self) -> std::result::Result<Calculator, ValidationReport> {
        let mut calculator = self.assemble();
        let report = validate_calculator(&calculator);
        if !report.is_valid() {
            return Err(report);
        }

        let symbols = calculator.input_symbols();
        for output in &mut calculator.outputs {
            let has_override = output
                .formula_display
                .as_deref()
                .is_some_and(|d| !d.trim().is_empty());
            if !has_override {
                let result = to_display_notation(&output.formula, &symbols, output.display_symbol());
                output.formula_display = result.ok.then_some(result.notation);
            }
        }

        let now = timestamp();
        calculator.created_at.get_or_insert_with(|| now.clone());
        calculator.updated_at = Some(now);
        Ok(calculator)
    }

    fn assemble(&self) -> Calculator {
        let mut calculator = self.calculator.clone();
        if calculator.id.trim().is_empty() {
            calculator.id = slugify(&calculator.title);
        }
        for input in calculator.inputs.iter_mut().filter(|i| i.id.is_empty()) {
            input.id = generate_field_id("input");
        }
        for output in calculator.outputs.iter_mut().filter(|o| o.id.is_empty()) {
            output.id = generate_field_id("output");
        }
        calculator
    }

    fn output_mut(&mut self, index: usize) -> Result<&mut OutputField> {
        let count = self.calculator.outputs.len();
        self.calculator
            .outputs
            .get_mut(index)
            .ok_or(Error::FieldIndexOutOfBounds {
                kind: "Output",
                index,
                count,
            })
    }
}

fn check_index(kind: &'static str, index: usize, count: usize) -> Result<()> {
    if index < count {
        Ok(())
    } else {
        Err(Error::FieldIndexOutOfBounds { kind, index, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ohms_law_draft() -> CalculatorDraft {
        let mut draft = CalculatorDraft::new();
        draft.update(CalculatorUpdate::Title("Ohm's Law".into())).unwrap();
        draft
            .update(CalculatorUpdate::Description("Resistance from voltage and current".into()))
            .unwrap();

        for (id, label, symbol) in [("v", "Voltage", "V"), ("i", "Current", "I")] {
            let index = draft.add_input();
            draft.update_input(index, InputUpdate::Id(id.into())).unwrap();
            draft.update_input(index, InputUpdate::Label(label.into())).unwrap();
            draft.update_input(index, InputUpdate::Symbol(symbol.into())).unwrap();
        }

        let index = draft.add_output();
        draft.update_output(index, OutputUpdate::Id("r".into())).unwrap();
        draft.update_output(index, OutputUpdate::Label("Resistance".into())).unwrap();
        draft.update_output(index, OutputUpdate::Symbol("R".into())).unwrap();
        draft.update_output(index, OutputUpdate::Formula("v / i".into())).unwrap();
        draft
    }

    #[test]
    fn test_build() {
        let calc = ohms_law_draft().build().unwrap();
        assert_eq!(calc.id, "ohms-law");
        assert_eq!(calc.outputs[0].formula_display.as_deref(), Some(r"R = \frac{V}{I}"));
        assert!(calc.created_at.is_some());
        assert_eq!(calc.created_at, calc.updated_at);
    }

    #[test]
    fn test_build_rejects_invalid() {
        let mut draft = ohms_law_draft();
        draft.update_output(0, OutputUpdate::Formula("v / x".into())).unwrap();
        let report = draft.build().unwrap_err();
        assert_eq!(report.errors, vec!["Output 1: Undefined variables: x"]);
        assert_eq!(draft.validate(), report);

        assert!(!CalculatorDraft::new().validate().is_valid());
    }

    #[test]
    fn test_append_token() {
        let mut draft = ohms_law_draft();
        draft.update_output(0, OutputUpdate::Formula(String::new())).unwrap();

        draft.append_token(0, "v").unwrap();
        draft.append_token(0, "i").unwrap();
        assert_eq!(draft.outputs()[0].formula, "v * i");

        draft.update_output(0, OutputUpdate::Formula("v * i / ".into())).unwrap();
        draft.append_token(0, "sqrt(v)").unwrap();
        draft.append_token(0, "2").unwrap();
        assert_eq!(draft.outputs()[0].formula, "v * i / sqrt(v) * 2");

        assert!(draft.append_token(5, "v").is_err());
    }

    #[test]
    fn test_preview_notation() {
        let mut draft = ohms_law_draft();
        assert_eq!(draft.preview_notation(0).unwrap().as_deref(), Some(r"R = \frac{V}{I}"));

        let index = draft.add_output();
        assert_eq!(draft.preview_notation(index).unwrap(), None);
        draft.update_output(index, OutputUpdate::Formula("v * i".into())).unwrap();
        assert_eq!(
            draft.preview_notation(index).unwrap().as_deref(),
            Some(r"output_1 = V \cdot I")
        );
    }

    #[test]
    fn test_generated_ids() {
        let mut draft = ohms_law_draft();
        let index = draft.add_output();
        draft.update_output(index, OutputUpdate::Label("Power".into())).unwrap();
        draft.update_output(index, OutputUpdate::Symbol("P".into())).unwrap();
        draft.update_output(index, OutputUpdate::Formula("v * i".into())).unwrap();

        let calc = draft.build().unwrap();
        let id = &calc.outputs[1].id;
        assert!(id.starts_with("output_"), "{id}");
        assert_eq!(id.split('_').count(), 3);
    }

    #[test]
    fn test_remove_and_edit_existing() {
        let calc = ohms_law_draft().build().unwrap();
        let mut draft = CalculatorDraft::from_calculator(&calc);
        assert_eq!(draft.remove_input(1).unwrap().id, "i");
        assert!(draft.remove_input(1).is_err());
        assert!(draft.remove_output(0).is_ok());
        assert!(draft.outputs().is_empty());

        draft.reset();
        assert_eq!(draft, CalculatorDraft::new());
    }
}
