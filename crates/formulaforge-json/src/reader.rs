//! Calculator document reader

use std::fs;
use std::path::Path;

use crate::error::{JsonError, JsonResult};
use crate::options::ReadOptions;
use formulaforge_core::{slugify, Calculator, DEFAULT_PLACEHOLDER};
use formulaforge_formula::validate_calculator;
use serde_json::{Map, Value};

/// Top-level fields a document must carry (absent or `null` is rejected)
const REQUIRED_FIELDS: &[&str] = &["title", "description", "inputs", "outputs"];

/// Calculator document reader
pub struct CalculatorReader;

impl CalculatorReader {
    /// Read a calculator document from a file
    pub fn read_file<P: AsRef<Path>>(path: P, options: &ReadOptions) -> JsonResult<Calculator> {
        let text = fs::read_to_string(path)?;
        Self::read_str(&text, options)
    }

    /// Read a single calculator document.
    ///
    /// Missing optional fields get their defaults: `type` is `number`,
    /// `required` is `true`, `placeholder` is `"Enter value"`, blank field ids
    /// become `input_N` / `output_N` and a blank calculator id is derived from
    /// the title.
    ///
    /// # Example
    /// ```rust
    /// use formulaforge_json::{CalculatorReader, ReadOptions};
    ///
    /// let json = r#"{
    ///     "title": "Ohm's Law",
    ///     "description": "Resistance from voltage and current",
    ///     "inputs": [
    ///         {"id": "v", "label": "Voltage", "symbol": "V", "unit": "V"},
    ///         {"id": "i", "label": "Current", "symbol": "I", "unit": "A"}
    ///     ],
    ///     "outputs": [
    ///         {"id": "r", "label": "Resistance", "symbol": "R", "unit": "Ω", "formula": "v / i"}
    ///     ]
    /// }"#;
    ///
    /// let calc = CalculatorReader::read_str(json, &ReadOptions::default()).unwrap();
    /// assert_eq!(calc.id, "ohms-law");
    /// assert!(calc.inputs[0].required);
    /// ```
    pub fn read_str(json: &str, options: &ReadOptions) -> JsonResult<Calculator> {
        let value: Value = serde_json::from_str(json)?;
        Self::read_value(value, options)
    }

    /// Read a list of calculators from either a JSON array or a single document.
    ///
    /// Nothing is returned unless every document imports cleanly.
    pub fn read_many(json: &str, options: &ReadOptions) -> JsonResult<Vec<Calculator>> {
        let value: Value = serde_json::from_str(json)?;
        match value {
            Value::Array(documents) => documents
                .into_iter()
                .map(|document| Self::read_value(document, options))
                .collect(),
            document => Ok(vec![Self::read_value(document, options)?]),
        }
    }

    /// Read a calculator from an already parsed document
    pub fn read_value(value: Value, options: &ReadOptions) -> JsonResult<Calculator> {
        let mut document = match value {
            Value::Object(map) => map,
            _ => {
                return Err(JsonError::InvalidShape(
                    "Calculator document must be a JSON object".to_string(),
                ))
            }
        };

        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| document.get(**field).map_or(true, Value::is_null))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(JsonError::MissingFields(missing));
        }

        fill_field_defaults(&mut document, "inputs", "Input", "input")?;
        fill_field_defaults(&mut document, "outputs", "Output", "output")?;

        let mut calculator: Calculator = serde_json::from_value(Value::Object(document))?;
        if calculator.id.trim().is_empty() {
            calculator.id = slugify(&calculator.title);
        }

        if options.validate {
            let report = validate_calculator(&calculator);
            if !report.is_valid() {
                return Err(JsonError::Validation(report.errors));
            }
            for warning in &report.warnings {
                tracing::warn!(calculator = %calculator.id, warning = %warning, "imported calculator has a warning");
            }
        }

        tracing::debug!(
            calculator = %calculator.id,
            inputs = calculator.inputs.len(),
            outputs = calculator.outputs.len(),
            "imported calculator"
        );
        Ok(calculator)
    }
}

/// Normalize the field list under `key` so serde defaults apply: drop `null`
/// members, replace blank ids and placeholders.
fn fill_field_defaults(
    document: &mut Map<String, Value>,
    key: &str,
    label: &str,
    id_prefix: &str,
) -> JsonResult<()> {
    let fields = match document.get_mut(key) {
        Some(Value::Array(fields)) => fields,
        _ => return Err(JsonError::InvalidShape(format!("{}s must be an array", label))),
    };

    for (index, field) in fields.iter_mut().enumerate() {
        let field = match field {
            Value::Object(field) => field,
            _ => {
                return Err(JsonError::InvalidShape(format!(
                    "{} {} must be an object",
                    label,
                    index + 1
                )))
            }
        };

        field.retain(|_, v| !v.is_null());

        if is_blank(field.get("id")) {
            field.insert("id".into(), Value::String(format!("{}_{}", id_prefix, index + 1)));
        }
        if id_prefix == "input" && is_blank(field.get("placeholder")) {
            field.insert("placeholder".into(), Value::String(DEFAULT_PLACEHOLDER.into()));
        }
    }

    Ok(())
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formulaforge_core::ValueType;
    use pretty_assertions::assert_eq;

    const OHMS_LAW: &str = r#"{
        "id": "ohms-law",
        "title": "Ohm's Law",
        "description": "Resistance from voltage and current",
        "category": "Electrical",
        "inputs": [
            {"id": "v", "label": "Voltage", "symbol": "V", "unit": "V", "min": 0},
            {"id": "i", "label": "Current", "symbol": "I", "unit": "A", "placeholder": ""}
        ],
        "outputs": [
            {"id": "r", "label": "Resistance", "symbol": "R", "unit": "Ω", "formula": "v / i"}
        ],
        "exported_at": "2024-01-01T00:00:00Z"
    }"#;

    fn read(json: &str) -> JsonResult<Calculator> {
        CalculatorReader::read_str(json, &ReadOptions::default())
    }

    #[test]
    fn test_read_with_defaults() {
        let calc = read(OHMS_LAW).unwrap();
        assert_eq!(calc.id, "ohms-law");
        assert_eq!(calc.category.as_deref(), Some("Electrical"));
        assert_eq!(calc.inputs[0].value_type, ValueType::Number);
        assert!(calc.inputs[0].required);
        assert_eq!(calc.inputs[0].min, Some(0.0));
        assert_eq!(calc.inputs[1].placeholder, "Enter value");
        assert_eq!(calc.outputs[0].formula_display, None);
    }

    #[test]
    fn test_missing_ids_are_generated() {
        let json = r#"{
            "title": "Kinetic Energy",
            "description": "E = mv²/2",
            "inputs": [
                {"label": "Mass", "symbol": "m", "unit": "kg", "required": null},
                {"id": "", "label": "Velocity", "symbol": "v", "unit": "m/s"}
            ],
            "outputs": [
                {"label": "Energy", "symbol": "E", "unit": "J", "formula": "input_1 * input_2^2 / 2"}
            ]
        }"#;
        let calc = read(json).unwrap();
        assert_eq!(calc.id, "kinetic-energy");
        assert_eq!(calc.input_ids().collect::<Vec<_>>(), vec!["input_1", "input_2"]);
        assert!(calc.inputs[0].required);
        assert_eq!(calc.outputs[0].id, "output_1");
    }

    #[test]
    fn test_camel_case_aliases() {
        let json = r#"{
            "title": "Select",
            "description": "Aliases",
            "inputs": [{"id": "k", "label": "K", "symbol": "k", "valueType": "select",
                        "options": [{"value": "1", "label": "One"}]}],
            "outputs": [{"id": "y", "label": "Y", "symbol": "y", "formula": "k",
                         "formulaDisplay": "y = k"}]
        }"#;
        let calc = read(json).unwrap();
        assert_eq!(calc.inputs[0].value_type, ValueType::Select);
        assert_eq!(calc.outputs[0].formula_display.as_deref(), Some("y = k"));
    }

    #[test]
    fn test_missing_required_fields() {
        let err = read(r#"{"title": "T", "description": null, "inputs": []}"#).unwrap_err();
        assert!(matches!(&err, JsonError::MissingFields(f) if f == &["description", "outputs"]));
        assert_eq!(
            err.to_string(),
            "Failed to import calculator: Missing required fields: description, outputs"
        );
    }

    #[test]
    fn test_invalid_shapes() {
        let err = read(r#"{"title": "T", "description": "D", "inputs": {}, "outputs": []}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to import calculator: Inputs must be an array");

        let err = read("[1, 2]").unwrap_err();
        assert!(matches!(err, JsonError::InvalidShape(_)));

        let err = read("{not json").unwrap_err();
        assert!(matches!(err, JsonError::Json(_)));
        assert!(err.to_string().starts_with("Failed to import calculator:"));
    }

    #[test]
    fn test_empty_field_lists_fail_validation() {
        let err = read(r#"{"title": "T", "description": "D", "inputs": [], "outputs": []}"#)
            .unwrap_err();
        match err {
            JsonError::Validation(errors) => assert_eq!(
                errors,
                vec!["At least one input is required", "At least one output is required"]
            ),
            other => panic!("unexpected error: {other}"),
        }

        let lenient = ReadOptions { validate: false };
        let calc = CalculatorReader::read_str(
            r#"{"title": "T", "description": "D", "inputs": [], "outputs": []}"#,
            &lenient,
        )
        .unwrap();
        assert!(calc.inputs.is_empty());
    }

    #[test]
    fn test_undefined_variable_is_named() {
        let json = OHMS_LAW.replace("v / i", "v / x");
        let err = read(&json).unwrap_err();
        assert!(err.to_string().contains("Undefined variables: x"), "{err}");
    }

    #[test]
    fn test_read_many_is_all_or_nothing() {
        let many = format!("[{}, {}]", OHMS_LAW, OHMS_LAW.replace("Ohm's Law", "Ohm's Law 2"));
        let calcs = CalculatorReader::read_many(&many, &ReadOptions::default()).unwrap();
        assert_eq!(calcs.len(), 2);

        let single = CalculatorReader::read_many(OHMS_LAW, &ReadOptions::default()).unwrap();
        assert_eq!(single.len(), 1);

        let broken = format!("[{}, {{\"title\": \"x\"}}]", OHMS_LAW);
        assert!(CalculatorReader::read_many(&broken, &ReadOptions::default()).is_err());
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ohms.json");
        std::fs::write(&path, OHMS_LAW).unwrap();
        let calc = CalculatorReader::read_file(&path, &ReadOptions::default()).unwrap();
        assert_eq!(calc.title, "Ohm's Law");

        let err = CalculatorReader::read_file(dir.path().join("missing.json"), &ReadOptions::default())
            .unwrap_err();
        assert!(matches!(err, JsonError::Io(_)));
    }
}
