//! Input and output field definitions

use serde::{Deserialize, Serialize};

/// Placeholder text given to inputs that do not declare one
pub const DEFAULT_PLACEHOLDER: &str = "Enter value";

fn default_required() -> bool {
    true
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

/// Kind of control an input is rendered with.
///
/// The engine only ever binds numbers; `Text` and `Select` describe how a host
/// collects the raw value before it is coerced with [`InputField::coerce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    Number,
    Text,
    Select,
}

impl ValueType {
    /// Lowercase name as written in calculator documents
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Number => "number",
            ValueType::Text => "text",
            ValueType::Select => "select",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a select input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A typed input declared by a calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputField {
    /// Identifier referenced by formulas, unique within the calculator
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    /// Display name used in notation (falls back to `id` when blank)
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub unit: String,
    #[serde(rename = "type", alias = "valueType", default)]
    pub value_type: ValueType,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
}

impl Default for InputField {
    fn default() -> Self {
        Self {
            id: String::new(),
            label: String::new(),
            symbol: String::new(),
            unit: String::new(),
            value_type: ValueType::Number,
            required: true,
            min: None,
            max: None,
            step: None,
            placeholder: default_placeholder(),
            options: None,
        }
    }
}

impl InputField {
    /// Create a required number input
    pub fn number(
        id: impl Into<String>,
        label: impl Into<String>,
        symbol: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            symbol: symbol.into(),
            unit: unit.into(),
            ..Self::default()
        }
    }

    /// Constrain the accepted value range
    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Mark the input as optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Turn the input into a select with the given options
    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.value_type = ValueType::Select;
        self.options = Some(options);
        self
    }

    /// Symbol shown in notation, or the raw id when no symbol is set
    pub fn display_symbol(&self) -> &str {
        if self.symbol.trim().is_empty() {
            &self.id
        } else {
            &self.symbol
        }
    }

    /// Coerce a raw control value into the number bound into a scope.
    ///
    /// Number inputs yield `None` for blank or unparseable text so the
    /// required check can fire; text and select inputs fall back to `0`.
    pub fn coerce(&self, raw: &str) -> Option<f64> {
        let parsed = raw.trim().parse::<f64>().ok().filter(|n| !n.is_nan());
        match self.value_type {
            ValueType::Number => parsed,
            ValueType::Text | ValueType::Select => Some(parsed.unwrap_or(0.0)),
        }
    }
}

/// An output computed from a formula
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutputField {
    /// Identifier, unique within the calculator and distinct from every input id
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub unit: String,
    /// Source expression referencing input and preceding output ids
    #[serde(default)]
    pub formula: String,
    /// Pre-authored notation, used instead of the converted one when present
    #[serde(
        default,
        alias = "formulaDisplay",
        skip_serializing_if = "Option::is_none"
    )]
    pub formula_display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OutputField {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        symbol: impl Into<String>,
        unit: impl Into<String>,
        formula: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            symbol: symbol.into(),
            unit: unit.into(),
            formula: formula.into(),
            formula_display: None,
            description: None,
        }
    }

    /// Attach a pre-authored notation override
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.formula_display = Some(display.into());
        self
    }

    /// Symbol used on the left-hand side of notation
    pub fn display_symbol(&self) -> &str {
        if self.symbol.trim().is_empty() {
            &self.id
        } else {
            &self.symbol
        }
    }
}
