//! Calculator document writer

use std::fs;
use std::path::Path;

use crate::error::{JsonError, JsonResult};
use crate::options::{ExportFormat, WriteOptions};
use crate::{markdown, tabular};
use chrono::{SecondsFormat, Utc};
use formulaforge_core::Calculator;
use formulaforge_formula::display_formula;
use serde::Serialize;

/// Exported document: the calculator plus export metadata
#[derive(Serialize)]
struct ExportDocument {
    #[serde(flatten)]
    calculator: Calculator,
    #[serde(skip_serializing_if = "Option::is_none")]
    exported_at: Option<String>,
}

/// Calculator document writer
pub struct CalculatorWriter;

impl CalculatorWriter {
    /// Serialize a calculator as a JSON document
    pub fn to_string(calculator: &Calculator, options: &WriteOptions) -> JsonResult<String> {
        let document = Self::document(calculator, options);
        Self::serialize(&document, options)
    }

    /// Serialize several calculators as one JSON array
    pub fn export_all(calculators: &[Calculator], options: &WriteOptions) -> JsonResult<String> {
        let documents: Vec<ExportDocument> = calculators
            .iter()
            .map(|calculator| Self::document(calculator, options))
            .collect();
        Self::serialize(&documents, options)
    }

    /// Write a calculator document to a file
    pub fn write_file<P: AsRef<Path>>(
        calculator: &Calculator,
        path: P,
        options: &WriteOptions,
    ) -> JsonResult<()> {
        let text = Self::to_string(calculator, options)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Render a calculator in the requested format
    pub fn render(
        calculator: &Calculator,
        format: ExportFormat,
        options: &WriteOptions,
    ) -> JsonResult<String> {
        match format {
            ExportFormat::Json => Self::to_string(calculator, options),
            ExportFormat::Csv => tabular::to_csv(calculator),
            ExportFormat::Markdown => Ok(markdown::to_markdown(calculator)),
        }
    }

    fn document(calculator: &Calculator, options: &WriteOptions) -> ExportDocument {
        let mut calculator = calculator.clone();

        if options.fill_formula_display {
            let displays: Vec<String> = calculator
                .outputs
                .iter()
                .map(|output| display_formula(output, &calculator.inputs))
                .collect();
            for (output, display) in calculator.outputs.iter_mut().zip(displays) {
                output.formula_display = Some(display);
            }
        }

        ExportDocument {
            calculator,
            exported_at: options
                .include_exported_at
                .then(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }

    fn serialize<T: Serialize>(value: &T, options: &WriteOptions) -> JsonResult<String> {
        let text = if options.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        text.map_err(JsonError::Export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CalculatorReader, ReadOptions};
    use formulaforge_core::{InputField, OutputField};
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn ohms_law() -> Calculator {
        Calculator::new("ohms-law", "Ohm's Law", "Resistance from voltage and current")
            .with_category("Electrical")
            .with_input(InputField::number("v", "Voltage", "V", "V").with_range(Some(0.0), None))
            .with_input(InputField::number("i", "Current", "I", "A"))
            .with_output(OutputField::new("r", "Resistance", "R", "Ω", "v / i"))
            .with_output(OutputField::new("g", "Conductance", "G", "S", "1 / r").with_display("G = 1/R"))
    }

    #[test]
    fn test_export_fills_display_and_defaults() {
        let text = CalculatorWriter::to_string(&ohms_law(), &WriteOptions::default()).unwrap();
        let json: Value = serde_json::from_str(&text).unwrap();

        assert!(json["exported_at"].as_str().is_some_and(|s| s.ends_with('Z')));
        assert_eq!(json["inputs"][1]["type"], "number");
        assert_eq!(json["inputs"][1]["required"], true);
        assert_eq!(json["inputs"][1]["placeholder"], "Enter value");
        assert_eq!(json["outputs"][0]["formula_display"], r"R = \frac{V}{I}");
        assert_eq!(json["outputs"][1]["formula_display"], "G = 1/R");
        assert!(text.contains('\n'));
    }

    #[test]
    fn test_export_options() {
        let options = WriteOptions {
            pretty: false,
            include_exported_at: false,
            fill_formula_display: false,
        };
        let text = CalculatorWriter::to_string(&ohms_law(), &options).unwrap();
        let json: Value = serde_json::from_str(&text).unwrap();
        assert!(json.get("exported_at").is_none());
        assert!(json["outputs"][0].get("formula_display").is_none());
        assert!(!text.contains('\n'));
    }

    #[test]
    fn test_round_trip() {
        let calc = ohms_law();
        let text = CalculatorWriter::to_string(&calc, &WriteOptions::default()).unwrap();
        let back = CalculatorReader::read_str(&text, &ReadOptions::default()).unwrap();

        assert_eq!(back.inputs, calc.inputs);
        assert_eq!(back.title, calc.title);
        assert_eq!(back.outputs[0].formula, "v / i");
        assert_eq!(back.outputs[0].formula_display.as_deref(), Some(r"R = \frac{V}{I}"));
    }

    #[test]
    fn test_export_all_and_file() {
        let text =
            CalculatorWriter::export_all(&[ohms_law(), ohms_law()], &WriteOptions::default()).unwrap();
        let many = CalculatorReader::read_many(&text, &ReadOptions::default()).unwrap();
        assert_eq!(many.len(), 2);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ohms.json");
        CalculatorWriter::write_file(&ohms_law(), &path, &WriteOptions::default()).unwrap();
        let back = CalculatorReader::read_file(&path, &ReadOptions::default()).unwrap();
        assert_eq!(back.id, "ohms-law");
    }

    #[test]
    fn test_render_formats() {
        let calc = ohms_law();
        let options = WriteOptions::default();
        let csv = CalculatorWriter::render(&calc, ExportFormat::Csv, &options).unwrap();
        assert!(csv.starts_with("Type,Label,Symbol,Unit,Formula,Formula Display"));
        let md = CalculatorWriter::render(&calc, ExportFormat::Markdown, &options).unwrap();
        assert!(md.starts_with("# Ohm's Law"));
    }
}
