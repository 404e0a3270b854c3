//! Formula → display notation
//!
//! Renders a formula as a LaTeX-flavoured notation string for display next
//! to a calculator output. Conversion works on the parsed tree, so identifier
//! substitution only ever touches whole identifiers and every rewritten
//! function closes its own bracket.
//!
//! | Formula            | Notation                    |
//! |--------------------|-----------------------------|
//! | `v / i`            | `\frac{V}{I}`               |
//! | `(a + b) / (c - d)`| `\frac{a + b}{c - d}`       |
//! | `a * b`            | `a \cdot b`                 |
//! | `x ** 2`, `x ^ 2`  | `x^{2}`                     |
//! | `sqrt(x)`          | `\sqrt{x}`                  |
//! | `log(x)`           | `\ln(x)`                    |
//! | `abs(x)`           | `\left|x\right|`            |
//! | `pow(x, y)`        | `\text{pow}(x, y)`          |
//! | `1.6e-19`          | `1.6 \times 10^{-19}`       |
//!
//! Divisions that are neither `atom / atom` nor `(group) / (group)` keep the
//! plain slash.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::parser::parse_formula;
use formulaforge_core::{InputField, OutputField};
use serde::Serialize;
use std::collections::HashMap;

/// Result of converting a formula to notation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotationResult {
    /// `"<output symbol> = <notation>"`, or the raw formula when conversion failed
    pub notation: String,
    pub ok: bool,
    pub errors: Vec<String>,
}

/// Convert `formula` to display notation.
///
/// `input_symbols` maps input ids to their display symbols; ids missing from
/// the table (earlier outputs, constants) are shown as written. Never fails:
/// when the formula cannot be converted the raw formula is returned behind
/// the output symbol with `ok == false`.
///
/// # Example
/// ```rust
/// use formulaforge_formula::to_display_notation;
/// use std::collections::HashMap;
///
/// let symbols = HashMap::from([("v".to_string(), "V".to_string()), ("i".to_string(), "I".to_string())]);
/// let result = to_display_notation("v / i", &symbols, "R");
/// assert_eq!(result.notation, r"R = \frac{V}{I}");
/// ```
pub fn to_display_notation(
    formula: &str,
    input_symbols: &HashMap<String, String>,
    output_symbol: &str,
) -> NotationResult {
    match parse_formula(formula) {
        Ok(ast) => {
            let converter = NotationConverter::new(input_symbols);
            NotationResult {
                notation: format!("{} = {}", output_symbol, converter.render(&ast)),
                ok: true,
                errors: Vec::new(),
            }
        }
        Err(e) => {
            tracing::debug!(formula, error = %e, "notation conversion fell back to raw formula");
            NotationResult {
                notation: format!("{} = {}", output_symbol, formula),
                ok: false,
                errors: vec![format!("Notation conversion error: {}", e)],
            }
        }
    }
}

/// Notation shown for an output: its pre-authored `formula_display` when set,
/// else the converted formula (or the raw formula if conversion fails).
pub fn display_formula(output: &OutputField, inputs: &[InputField]) -> String {
    if let Some(display) = output.formula_display.as_deref() {
        if !display.trim().is_empty() {
            return display.to_string();
        }
    }

    let symbols: HashMap<String, String> = inputs
        .iter()
        .map(|i| (i.id.clone(), i.display_symbol().to_string()))
        .collect();
    to_display_notation(&output.formula, &symbols, output.display_symbol()).notation
}

/// Renders expression trees using an identifier → symbol table
pub struct NotationConverter<'a> {
    symbols: &'a HashMap<String, String>,
}

impl<'a> NotationConverter<'a> {
    pub fn new(symbols: &'a HashMap<String, String>) -> Self {
        Self { symbols }
    }

    /// Render an expression (without the `symbol = ` prefix)
    pub fn render(&self, expr: &FormulaExpr) -> String {
        match expr {
            FormulaExpr::Number(n) => format_number(*n),
            FormulaExpr::Scientific {
                mantissa, exponent, ..
            } => format!("{} \\times 10^{{{}}}", mantissa, exponent),
            FormulaExpr::Variable(name) => self.symbol(name),
            FormulaExpr::Group(inner) => format!("({})", self.render(inner)),
            FormulaExpr::BinaryOp { op, left, right } => self.render_binary(*op, left, right),
            FormulaExpr::UnaryOp { op, operand } => match op {
                UnaryOperator::Negate => format!("-{}", self.render(operand)),
            },
            FormulaExpr::Function { name, args } => self.render_function(name, args),
        }
    }

    fn symbol(&self, name: &str) -> String {
        match self.symbols.get(name) {
            Some(symbol) if !symbol.trim().is_empty() => symbol.clone(),
            _ if name == "pi" => "\\pi".to_string(),
            _ => name.to_string(),
        }
    }

    /// Render without the outer parentheses of a group, for bracket-delimited forms
    fn render_bare(&self, expr: &FormulaExpr) -> String {
        match expr.ungrouped() {
            Some(inner) => self.render(inner),
            None => self.render(expr),
        }
    }

    fn render_binary(&self, op: BinaryOperator, left: &FormulaExpr, right: &FormulaExpr) -> String {
        match op {
            BinaryOperator::Add => format!("{} + {}", self.render(left), self.render(right)),
            BinaryOperator::Subtract => format!("{} - {}", self.render(left), self.render(right)),
            BinaryOperator::Multiply => {
                format!("{} \\cdot {}", self.render(left), self.render(right))
            }
            BinaryOperator::Divide => self.render_division(left, right),
            BinaryOperator::Power => {
                format!("{}^{{{}}}", self.render(left), self.render_bare(right))
            }
        }
    }

    fn render_division(&self, left: &FormulaExpr, right: &FormulaExpr) -> String {
        if left.is_atom() && right.is_atom() {
            return format!("\\frac{{{}}}{{{}}}", self.render(left), self.render(right));
        }

        if let (Some(numerator), Some(denominator)) = (left.ungrouped(), right.ungrouped()) {
            return format!(
                "\\frac{{{}}}{{{}}}",
                self.render(numerator),
                self.render(denominator)
            );
        }

        format!("{} / {}", self.render(left), self.render(right))
    }

    fn render_function(&self, name: &str, args: &[FormulaExpr]) -> String {
        match (name, args) {
            ("sqrt", [arg]) => format!("\\sqrt{{{}}}", self.render_bare(arg)),
            ("log", [arg]) => format!("\\ln({})", self.render_bare(arg)),
            ("log", [arg, base]) => {
                format!("\\log_{{{}}}({})", self.render_bare(base), self.render_bare(arg))
            }
            ("sin", [arg]) | ("cos", [arg]) | ("tan", [arg]) => {
                format!("\\{}({})", name, self.render_bare(arg))
            }
            ("abs", [arg]) => format!("\\left|{}\\right|", self.render_bare(arg)),
            ("floor", [arg]) => format!("\\lfloor {} \\rfloor", self.render_bare(arg)),
            ("ceil", [arg]) => format!("\\lceil {} \\rceil", self.render_bare(arg)),
            _ => {
                let rendered: Vec<String> = args.iter().map(|a| self.render_bare(a)).collect();
                format!("\\text{{{}}}({})", name, rendered.join(", "))
            }
        }
    }
}

/// Format a literal without a trailing `.0`
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn symbols(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(id, symbol)| (id.to_string(), symbol.to_string()))
            .collect()
    }

    fn convert(formula: &str, pairs: &[(&str, &str)]) -> String {
        let result = to_display_notation(formula, &symbols(pairs), "y");
        assert!(result.ok, "conversion of {formula:?} failed: {:?}", result.errors);
        result.notation
    }

    #[test]
    fn test_simple_fraction_with_symbols() {
        assert_eq!(
            convert("v / i", &[("v", "V"), ("i", "I")]),
            r"y = \frac{V}{I}"
        );
        assert_eq!(convert("1/2", &[]), r"y = \frac{1}{2}");
    }

    #[test]
    fn test_grouped_fraction() {
        assert_eq!(
            convert("(a + b) / (c - d)", &[]),
            r"y = \frac{a + b}{c - d}"
        );
    }

    #[test]
    fn test_other_divisions_keep_slash() {
        assert_eq!(convert("a * b / c", &[]), r"y = a \cdot b / c");
        assert_eq!(convert("a / (b + c)", &[]), r"y = a / (b + c)");
    }

    #[test]
    fn test_whole_word_substitution() {
        assert_eq!(
            convert("voltage1/voltage", &[("voltage", "V")]),
            r"y = \frac{voltage1}{V}"
        );
    }

    #[test]
    fn test_blank_symbol_keeps_id() {
        assert_eq!(convert("m * g", &[("m", ""), ("g", "g")]), r"y = m \cdot g");
    }

    #[test]
    fn test_operators() {
        assert_eq!(convert("m * c ** 2", &[]), r"y = m \cdot c^{2}");
        assert_eq!(convert("x ^ (n + 1)", &[]), r"y = x^{n + 1}");
        assert_eq!(convert("-a + b - c", &[]), r"y = -a + b - c");
    }

    #[test]
    fn test_functions() {
        assert_eq!(convert("sqrt(a^2 + b^2)", &[]), r"y = \sqrt{a^{2} + b^{2}}");
        assert_eq!(convert("Math.sqrt(x)", &[]), r"y = \sqrt{x}");
        assert_eq!(convert("log(x)", &[]), r"y = \ln(x)");
        assert_eq!(convert("log(x, 10)", &[]), r"y = \log_{10}(x)");
        assert_eq!(convert("sin(t) + cos(t)", &[("t", r"\theta")]), r"y = \sin(\theta) + \cos(\theta)");
        assert_eq!(convert("tan(x)", &[]), r"y = \tan(x)");
        assert_eq!(convert("abs(a - b)", &[]), r"y = \left|a - b\right|");
        assert_eq!(convert("pow(x, 3)", &[]), r"y = \text{pow}(x, 3)");
        assert_eq!(convert("floor(x)", &[]), r"y = \lfloor x \rfloor");
    }

    #[test]
    fn test_nested_functions_stay_balanced() {
        let notation = convert("sqrt(abs(log(x)))", &[]);
        assert_eq!(notation, r"y = \sqrt{\left|\ln(x)\right|}");
        assert_eq!(notation.matches('{').count(), notation.matches('}').count());
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(convert("q * 1.6e-19", &[]), r"y = q \cdot 1.6 \times 10^{-19}");
        assert_eq!(convert("3e8", &[]), r"y = 3 \times 10^{8}");
    }

    #[test]
    fn test_constants() {
        assert_eq!(convert("2 * pi * r", &[]), r"y = 2 \cdot \pi \cdot r");
    }

    #[test]
    fn test_fallback_on_failure() {
        let result = to_display_notation("v / (i", &symbols(&[("v", "V")]), "R");
        assert!(!result.ok);
        assert_eq!(result.notation, "R = v / (i");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("Notation conversion error:"));
    }

    #[test]
    fn test_deep_nesting_falls_back() {
        let deep = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
        let result = to_display_notation(&deep, &HashMap::new(), "y");
        assert!(!result.ok);
        assert_eq!(result.errors, vec!["Notation conversion error: Parse error: Formula is nested too deeply"]);
    }

    #[test]
    fn test_display_formula_prefers_override() {
        let inputs = vec![InputField::number("m", "Mass", "m", "kg")];
        let output = OutputField::new("w", "Weight", "W", "N", "m * 9.81");
        assert_eq!(display_formula(&output, &inputs), r"W = m \cdot 9.81");

        let output = output.with_display("W = mg");
        assert_eq!(display_formula(&output, &inputs), "W = mg");
    }

    proptest! {
        #[test]
        fn prop_substitution_never_touches_longer_identifiers(suffix in "[a-z0-9_]{1,6}") {
            let longer = format!("x{}", suffix);
            let formula = format!("{} + x", longer);
            let result = to_display_notation(&formula, &symbols(&[("x", "X")]), "y");
            prop_assert!(result.ok);
            prop_assert_eq!(result.notation, format!("y = {} + X", longer));
        }
    }
}
