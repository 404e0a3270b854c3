//! Calculator metadata for listings

use crate::Calculator;
use formulaforge_formula::formula_complexity;
use serde::Serialize;

/// Complexity scores are capped at this value
pub const MAX_COMPLEXITY: usize = 10;

/// Summary of a calculator shown in listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculatorMetadata {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub input_count: usize,
    pub output_count: usize,
    /// Operators, function calls and parentheses across all formulas, capped at [`MAX_COMPLEXITY`]
    pub complexity: usize,
    pub last_updated: Option<String>,
}

impl CalculatorMetadata {
    pub fn from_calculator(calculator: &Calculator) -> Self {
        Self {
            id: calculator.id.clone(),
            title: calculator.title.clone(),
            description: calculator.description.clone(),
            category: calculator.category.clone(),
            input_count: calculator.inputs.len(),
            output_count: calculator.outputs.len(),
            complexity: complexity(calculator),
            last_updated: calculator.updated_at.clone(),
        }
    }
}

/// Complexity score of a calculator, from 0 to [`MAX_COMPLEXITY`]
pub fn complexity(calculator: &Calculator) -> usize {
    let total: usize = calculator
        .outputs
        .iter()
        .map(|output| formula_complexity(&output.formula))
        .sum();
    total.min(MAX_COMPLEXITY)
}

/// One-line description: `"Calculate <outputs> from <inputs>"`
pub fn summary(calculator: &Calculator) -> String {
    let outputs: Vec<&str> = calculator.outputs.iter().map(|o| o.label.as_str()).collect();
    let inputs: Vec<&str> = calculator.inputs.iter().map(|i| i.label.as_str()).collect();
    format!("Calculate {} from {}", outputs.join(", "), inputs.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputField, OutputField};
    use pretty_assertions::assert_eq;

    fn triangle() -> Calculator {
        Calculator::new("triangle", "Right Triangle", "Hypotenuse and area")
            .with_category("Geometry")
            .with_input(InputField::number("a", "Side A", "a", "m"))
            .with_input(InputField::number("b", "Side B", "b", "m"))
            .with_output(OutputField::new("c", "Hypotenuse", "c", "m", "sqrt(a^2 + b^2)"))
            .with_output(OutputField::new("area", "Area", "A", "m²", "a * b / 2"))
    }

    #[test]
    fn test_metadata() {
        let meta = CalculatorMetadata::from_calculator(&triangle());
        assert_eq!(meta.input_count, 2);
        assert_eq!(meta.output_count, 2);
        // 6 for the hypotenuse, 2 for the area
        assert_eq!(meta.complexity, 8);
        assert_eq!(meta.category.as_deref(), Some("Geometry"));
        assert_eq!(meta.last_updated, None);
    }

    #[test]
    fn test_complexity_is_capped() {
        let calc = triangle().with_output(OutputField::new(
            "p",
            "Perimeter",
            "p",
            "m",
            "a + b + sqrt((a * a) + (b * b))",
        ));
        assert_eq!(complexity(&calc), MAX_COMPLEXITY);
    }

    #[test]
    fn test_summary() {
        assert_eq!(summary(&triangle()), "Calculate Hypotenuse, Area from Side A, Side B");
    }
}
