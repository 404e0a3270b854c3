//! Formula Abstract Syntax Tree types

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    // === Literals ===
    /// Numeric literal
    Number(f64),
    /// Numeric literal written with an exponent, e.g. `1.6e-19`
    Scientific {
        value: f64,
        /// Digits before the `e`, as written
        mantissa: String,
        /// Exponent after the `e`, sign included when written
        exponent: String,
    },

    // === References ===
    /// Input id, earlier output id, or whitelisted constant
    Variable(String),

    /// Parenthesized sub-expression, kept so notation can see the author's grouping
    Group(Box<FormulaExpr>),

    // === Operators ===
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<FormulaExpr>,
    },

    // === Function call ===
    Function {
        name: String,
        args: Vec<FormulaExpr>,
    },
}

impl FormulaExpr {
    /// Bare identifier or number literal
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            FormulaExpr::Number(_) | FormulaExpr::Scientific { .. } | FormulaExpr::Variable(_)
        )
    }

    /// The expression inside a parenthesized group
    pub fn ungrouped(&self) -> Option<&FormulaExpr> {
        match self {
            FormulaExpr::Group(inner) => Some(inner),
            _ => None,
        }
    }

    pub(crate) fn binary(op: BinaryOperator, left: FormulaExpr, right: FormulaExpr) -> Self {
        FormulaExpr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
}
