//! Input value validation
//!
//! Every recalculation pass first checks each bound value against its
//! field's `required`, `min` and `max` constraints. A failing input blocks
//! output computation for that pass but is never fatal.
//!
//! ## Example
//!
//! ```rust
//! use formulaforge_core::{validate_input_value, InputField, InputValidationError};
//!
//! let voltage = InputField::number("v", "Voltage", "V", "V").with_range(Some(0.0), None);
//!
//! assert_eq!(validate_input_value(&voltage, Some(12.0)), None);
//! assert_eq!(
//!     validate_input_value(&voltage, Some(-1.0)),
//!     Some(InputValidationError::BelowMin { min: 0.0 })
//! );
//! ```

use crate::calculator::Calculator;
use crate::field::InputField;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Why a bound input value was rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputValidationError {
    /// Required input has no value
    Required,
    /// Value is below the declared minimum
    BelowMin { min: f64 },
    /// Value is above the declared maximum
    AboveMax { max: f64 },
}

impl fmt::Display for InputValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValidationError::Required => write!(f, "This field is required"),
            InputValidationError::BelowMin { min } => write!(f, "Value must be at least {}", min),
            InputValidationError::AboveMax { max } => write!(f, "Value must be at most {}", max),
        }
    }
}

impl std::error::Error for InputValidationError {}

/// Check a single bound value against its field.
///
/// `NaN` counts as a missing value. Optional inputs without a value pass.
pub fn validate_input_value(field: &InputField, value: Option<f64>) -> Option<InputValidationError> {
    let value = match value.filter(|v| !v.is_nan()) {
        Some(v) => v,
        None if field.required => return Some(InputValidationError::Required),
        None => return None,
    };

    if let Some(min) = field.min {
        if value < min {
            return Some(InputValidationError::BelowMin { min });
        }
    }
    if let Some(max) = field.max {
        if value > max {
            return Some(InputValidationError::AboveMax { max });
        }
    }

    None
}

/// Validate every declared input, returning one message per failing input id
pub fn validate_input_values(
    calculator: &Calculator,
    values: &HashMap<String, Option<f64>>,
) -> BTreeMap<String, String> {
    calculator
        .inputs
        .iter()
        .filter_map(|input| {
            let value = values.get(&input.id).copied().flatten();
            validate_input_value(input, value).map(|err| (input.id.clone(), err.to_string()))
        })
        .collect()
}
