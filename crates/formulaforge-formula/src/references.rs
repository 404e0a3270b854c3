//! Formula complexity scoring

use crate::parser::{tokenize, Token};

/// Rough complexity score of a formula: operators, function calls and parentheses
pub fn formula_complexity(formula: &str) -> usize {
    let tokens = tokenize(formula);
    tokens
        .iter()
        .enumerate()
        .filter(|(i, token)| match token {
            Token::Plus
            | Token::Minus
            | Token::Star
            | Token::Slash
            | Token::Caret
            | Token::LeftParen
            | Token::RightParen => true,
            Token::Identifier(_) => matches!(tokens.get(i + 1), Some(Token::LeftParen)),
            _ => false,
        })
        .count()
}
