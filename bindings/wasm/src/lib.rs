//! WebAssembly bindings for formulaforge
//!
//! This module provides wasm-bindgen-based bindings so a browser host can
//! evaluate formulas, render notation and drive calculation sessions.
//! Calculators cross the boundary as JSON documents; structured results
//! cross as plain JS objects.

use serde::Serialize;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

use formulaforge::{
    CalculationSession, Calculator as CoreCalculator, CalculatorMetadata, CalculatorReader,
    CalculatorWriter, EvaluationScope, ExportFormat, ReadOptions, WriteOptions,
};

// =============================================================================
// Error Conversion
// =============================================================================

fn to_js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// Serialize with maps as plain objects so hosts can index results by id
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).map_err(to_js_error)
}

/// Read a JS object of `{ id: number }` pairs
fn number_map(value: JsValue) -> Result<HashMap<String, f64>, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(HashMap::new());
    }
    serde_wasm_bindgen::from_value(value).map_err(to_js_error)
}

// =============================================================================
// Free functions
// =============================================================================

/// Evaluate a formula against `{ id: number }` bindings, returning the rounded result.
#[wasm_bindgen]
pub fn evaluate(formula: &str, scope: JsValue) -> Result<f64, JsError> {
    let scope = EvaluationScope::from(number_map(scope)?);
    formulaforge::evaluate(formula, &scope).map_err(to_js_error)
}

/// Convert a formula to display notation. Returns `{ notation, ok, errors }`.
#[wasm_bindgen(js_name = toDisplayNotation)]
pub fn to_display_notation(
    formula: &str,
    symbols: JsValue,
    output_symbol: &str,
) -> Result<JsValue, JsError> {
    let symbols: HashMap<String, String> = if symbols.is_undefined() || symbols.is_null() {
        HashMap::new()
    } else {
        serde_wasm_bindgen::from_value(symbols).map_err(to_js_error)?
    };
    to_js(&formulaforge::to_display_notation(formula, &symbols, output_symbol))
}

/// Validate a formula against the identifiers it may use.
/// Returns `{ isValid, errors, warnings }`.
#[wasm_bindgen(js_name = validateFormula)]
pub fn validate_formula(formula: &str, declared: Vec<String>) -> Result<JsValue, JsError> {
    to_js(&formulaforge::validate_formula(formula, &declared))
}

// =============================================================================
// Calculator - an imported calculator document
// =============================================================================

/// A calculator definition imported from JSON.
#[wasm_bindgen]
pub struct Calculator {
    inner: CoreCalculator,
}

#[wasm_bindgen]
impl Calculator {
    /// Import a calculator document. Throws with a descriptive message when
    /// the document is malformed, incomplete or invalid.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<Calculator, JsError> {
        let inner = CalculatorReader::read_str(json, &ReadOptions::default()).map_err(to_js_error)?;
        Ok(Self { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn id(&self) -> String {
        self.inner.id.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn title(&self) -> String {
        self.inner.title.clone()
    }

    /// Listing summary: `{ id, title, input_count, output_count, complexity, ... }`
    pub fn metadata(&self) -> Result<JsValue, JsError> {
        to_js(&CalculatorMetadata::from_calculator(&self.inner))
    }

    /// Definition problems: `{ errors, warnings }`
    pub fn validate(&self) -> Result<JsValue, JsError> {
        to_js(&formulaforge::validate_calculator(&self.inner))
    }

    /// Render as `"json"`, `"csv"` or `"markdown"`
    pub fn export(&self, format: &str) -> Result<String, JsError> {
        let format: ExportFormat = format.parse().map_err(|e: String| JsError::new(&e))?;
        CalculatorWriter::render(&self.inner, format, &WriteOptions::default()).map_err(to_js_error)
    }

    /// Start a calculation session over this calculator
    pub fn session(&self) -> Session {
        Session {
            inner: CalculationSession::new(&self.inner),
        }
    }
}

// =============================================================================
// Session - per-view calculation state
// =============================================================================

/// Calculation state for one calculator view.
#[wasm_bindgen]
pub struct Session {
    inner: CalculationSession,
}

#[wasm_bindgen]
impl Session {
    /// Bind one input (`undefined`/`null` clears it) and return the pass outcome
    /// `{ results, errors, failures }`.
    #[wasm_bindgen(js_name = setInput)]
    pub fn set_input(&mut self, id: &str, value: Option<f64>) -> Result<JsValue, JsError> {
        let outcome = self.inner.set_input(id, value).map_err(to_js_error)?;
        to_js(outcome)
    }

    /// Bind several inputs from a `{ id: number }` object at once.
    #[wasm_bindgen(js_name = setInputs)]
    pub fn set_inputs(&mut self, values: JsValue) -> Result<JsValue, JsError> {
        let values = number_map(values)?;
        let outcome = self
            .inner
            .set_inputs(values.iter().map(|(id, v)| (id.as_str(), Some(*v))))
            .map_err(to_js_error)?;
        to_js(outcome)
    }

    #[wasm_bindgen(getter)]
    pub fn results(&self) -> Result<JsValue, JsError> {
        to_js(self.inner.results())
    }

    #[wasm_bindgen(getter)]
    pub fn errors(&self) -> Result<JsValue, JsError> {
        to_js(self.inner.errors())
    }

    /// Current value of an input, `undefined` when unbound
    pub fn value(&self, id: &str) -> Option<f64> {
        self.inner.value(id)
    }

    /// Display notation of an output
    pub fn notation(&self, output_id: &str) -> Option<String> {
        self.inner.notation(output_id)
    }

    /// Clear every input, result and error
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}
