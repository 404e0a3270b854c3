//! Calculator definitions

use crate::field::{InputField, OutputField};
use lazy_regex::regex_replace_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Derive a calculator id from its title: lowercase, whitespace runs become
/// `-`, anything outside `[a-z0-9-]` is dropped.
///
/// ```rust
/// use formulaforge_core::slugify;
///
/// assert_eq!(slugify("Ohm's Law"), "ohms-law");
/// ```
pub fn slugify(title: &str) -> String {
    let lower = title.trim().to_lowercase();
    let dashed = regex_replace_all!(r"\s+", &lower, "-");
    regex_replace_all!(r"[^a-z0-9-]", &dashed, "").into_owned()
}

/// A parameterized calculator: ordered inputs and ordered outputs.
///
/// Outputs are evaluated in declaration order; an output formula may reference
/// any input id and the id of any output declared before it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Calculator {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub inputs: Vec<InputField>,
    pub outputs: Vec<OutputField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Calculator {
    /// Create an empty calculator
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_input(mut self, input: InputField) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_output(mut self, output: OutputField) -> Self {
        self.outputs.push(output);
        self
    }

    /// Look up an input by id
    pub fn input(&self, id: &str) -> Option<&InputField> {
        self.inputs.iter().find(|i| i.id == id)
    }

    /// Look up an output by id
    pub fn output(&self, id: &str) -> Option<&OutputField> {
        self.outputs.iter().find(|o| o.id == id)
    }

    /// Declared input ids, in order
    pub fn input_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.inputs.iter().map(|i| i.id.as_str())
    }

    /// Input id → display symbol table used by the notation layer
    pub fn input_symbols(&self) -> HashMap<String, String> {
        self.inputs
            .iter()
            .map(|i| (i.id.clone(), i.display_symbol().to_string()))
            .collect()
    }
}
