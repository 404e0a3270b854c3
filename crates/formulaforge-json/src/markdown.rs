//! Markdown documentation page for a calculator

use formulaforge_core::Calculator;
use formulaforge_formula::display_formula;
use std::fmt::Write;

/// Render a documentation page listing the calculator's inputs and outputs
pub fn to_markdown(calculator: &Calculator) -> String {
    let mut doc = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(doc, "# {}\n", calculator.title);
    let _ = writeln!(doc, "{}\n", calculator.description);

    if let Some(category) = calculator.category.as_deref().filter(|c| !c.trim().is_empty()) {
        let _ = writeln!(doc, "**Category:** {}\n", category);
    }

    doc.push_str("## Inputs\n\n");
    for (index, input) in calculator.inputs.iter().enumerate() {
        let _ = writeln!(doc, "{}. **{}** ({})", index + 1, input.label, input.display_symbol());
        if !input.unit.is_empty() {
            let _ = writeln!(doc, "   - Unit: {}", input.unit);
        }
        let _ = writeln!(doc, "   - Type: {}", input.value_type);
        let _ = writeln!(doc, "   - Required: {}", if input.required { "Yes" } else { "No" });
        if let Some(min) = input.min {
            let _ = writeln!(doc, "   - Minimum: {}", min);
        }
        if let Some(max) = input.max {
            let _ = writeln!(doc, "   - Maximum: {}", max);
        }
        doc.push('\n');
    }

    doc.push_str("## Outputs\n\n");
    for (index, output) in calculator.outputs.iter().enumerate() {
        let _ = writeln!(doc, "{}. **{}** ({})", index + 1, output.label, output.display_symbol());
        if !output.unit.is_empty() {
            let _ = writeln!(doc, "   - Unit: {}", output.unit);
        }
        let _ = writeln!(doc, "   - Formula: `{}`", output.formula);
        let _ = writeln!(doc, "   - Display: ${}$", display_formula(output, &calculator.inputs));
        if let Some(description) = output.description.as_deref() {
            let _ = writeln!(doc, "   - {}", description);
        }
        doc.push('\n');
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use formulaforge_core::{InputField, OutputField};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_markdown() {
        let calc = Calculator::new("ohms-law", "Ohm's Law", "Resistance from voltage and current")
            .with_category("Electrical")
            .with_input(InputField::number("v", "Voltage", "V", "V").with_range(Some(0.0), Some(1000.0)))
            .with_input(InputField::number("i", "Current", "I", "A").optional())
            .with_output(OutputField::new("r", "Resistance", "R", "Ω", "v / i"));

        let expected = "\
# Ohm's Law

Resistance from voltage and current

**Category:** Electrical

## Inputs

1. **Voltage** (V)
   - Unit: V
   - Type: number
   - Required: Yes
   - Minimum: 0
   - Maximum: 1000

2. **Current** (I)
   - Unit: A
   - Type: number
   - Required: No

## Outputs

1. **Resistance** (R)
   - Unit: Ω
   - Formula: `v / i`
   - Display: $R = \\frac{V}{I}$

";
        assert_eq!(to_markdown(&calc), expected);
    }
}
