//! Formula parser
//!
//! A recursive descent parser for calculator formulas with proper operator precedence.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};

/// Deepest tree the parser builds. Groups, calls, prefix operators, exponents
/// and each chained binary operator count as one level.
pub const MAX_DEPTH: usize = 256;

/// Parse a formula string into an AST
///
/// # Example
/// ```rust
/// use formulaforge_formula::parse_formula;
///
/// let ast = parse_formula("v / i").unwrap();
/// let ast = parse_formula("sqrt(a^2 + b^2)").unwrap();
/// let ast = parse_formula("Math.log(x) * 1.6e-19").unwrap();
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<FormulaExpr> {
    let formula = formula.trim();
    if formula.is_empty() {
        return Err(FormulaError::Empty);
    }

    let mut parser = FormulaParser::new(formula);
    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    if !matches!(parser.current_token(), Token::Eof) {
        return Err(FormulaError::Parse(format!(
            "Unexpected {} after expression",
            parser.current_token().describe()
        )));
    }

    Ok(expr)
}

/// Every identifier appearing in `formula`, once each, in order of first appearance.
///
/// Works on the token stream alone, so it still reports identifiers from
/// formulas that fail to parse.
pub fn scan_identifiers(formula: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for token in tokenize(formula) {
        if let Token::Identifier(name) = token {
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
    }
    seen
}

/// Split a formula into tokens, skipping nothing but whitespace
pub(crate) fn tokenize(formula: &str) -> Vec<Token> {
    let mut parser = FormulaParser::new(formula);
    let mut tokens = Vec::new();
    loop {
        match parser.consume() {
            Token::Eof => break,
            token => tokens.push(token),
        }
    }
    tokens
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    // Literals
    Number(f64),
    Scientific {
        value: f64,
        mantissa: String,
        exponent: String,
    },

    // Identifiers (variables, constants, function names)
    Identifier(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Comma,

    // Delimiters
    LeftParen,
    RightParen,

    /// Character or literal the scanner could not make sense of
    Invalid(String),

    // End of input
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Scientific {
                mantissa, exponent, ..
            } => format!("number {}e{}", mantissa, exponent),
            Token::Identifier(name) => format!("identifier '{}'", name),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::Caret => "'^'".into(),
            Token::Comma => "','".into(),
            Token::LeftParen => "'('".into(),
            Token::RightParen => "')'".into(),
            Token::Invalid(text) => format!("character '{}'", text),
            Token::Eof => "end of formula".into(),
        }
    }
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    current_token: Option<Token>,
    depth: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> Self {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: None,
            depth: 0,
        };
        parser.advance_token();
        parser
    }

    // === Token scanning ===

    fn advance_token(&mut self) {
        self.current_token = Some(self.scan_token());
    }

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace();

        let c = match self.peek_char() {
            Some(c) => c,
            None => return Token::Eof,
        };

        // Single-character tokens
        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '/' => Some(Token::Slash),
            '^' => Some(Token::Caret),
            ',' => Some(Token::Comma),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return token;
        }

        // '*' or '**'
        if c == '*' {
            self.advance();
            if self.peek_char() == Some('*') {
                self.advance();
                return Token::Caret;
            }
            return Token::Star;
        }

        // Number
        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        // Identifier
        if c.is_ascii_alphabetic() || c == '_' {
            return self.scan_identifier();
        }

        // Unknown character
        self.advance();
        Token::Invalid(c.to_string())
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;

        // Integer part
        self.skip_digits();

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        let mantissa_end = self.pos;

        // Exponent part, only when digits actually follow
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            let digits_at = match self.peek_char_at(1) {
                Some('+') | Some('-') => 2,
                _ => 1,
            };
            if self
                .peek_char_at(digits_at)
                .map_or(false, |c| c.is_ascii_digit())
            {
                for _ in 0..digits_at {
                    self.advance();
                }
                self.skip_digits();
            }
        }

        let text = &self.input[start..self.pos];
        let value = match text.parse::<f64>() {
            Ok(value) => value,
            Err(_) => return Token::Invalid(text.to_string()),
        };

        if self.pos == mantissa_end {
            return Token::Number(value);
        }

        Token::Scientific {
            value,
            mantissa: self.input[start..mantissa_end].to_string(),
            exponent: self.input[mantissa_end + 1..self.pos].to_string(),
        }
    }

    fn scan_identifier(&mut self) -> Token {
        let mut word = self.scan_word();

        // `Math.sqrt` and friends: drop the namespace
        if word == "Math"
            && self.peek_char() == Some('.')
            && self
                .peek_char_at(1)
                .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        {
            self.advance();
            word = self.scan_word();
        }

        Token::Identifier(word.to_string())
    }

    fn scan_word(&mut self) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }
        &input[start..self.pos]
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_digits(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        self.current_token.as_ref().unwrap_or(&Token::Eof)
    }

    fn consume(&mut self) -> Token {
        let token = self.current_token.take().unwrap_or(Token::Eof);
        self.advance_token();
        token
    }

    fn enter(&mut self) -> FormulaResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(FormulaError::Parse("Formula is nested too deeply".to_string()));
        }
        Ok(())
    }

    fn leave(&mut self, levels: usize) {
        self.depth = self.depth.saturating_sub(levels);
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume();
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {}, got {}",
                expected.describe(),
                self.current_token().describe()
            )))
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: -, +
    // 4. Exponentiation: ^ (right associative, exponent may carry a sign)
    // 5. Primary: literals, identifiers, function calls, parentheses

    fn parse_expression(&mut self) -> FormulaResult<FormulaExpr> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_multiplicative()?;
        let mut chained = 0;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume();
            self.enter()?;
            chained += 1;
            let right = self.parse_multiplicative()?;
            left = FormulaExpr::binary(op, left, right);
        }

        self.leave(chained);
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_unary()?;
        let mut chained = 0;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume();
            self.enter()?;
            chained += 1;
            let right = self.parse_unary()?;
            left = FormulaExpr::binary(op, left, right);
        }

        self.leave(chained);
        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<FormulaExpr> {
        // Prefix unary minus
        if matches!(self.current_token(), Token::Minus) {
            self.consume();
            self.enter()?;
            let operand = self.parse_unary()?;
            self.leave(1);
            return Ok(FormulaExpr::UnaryOp {
                op: UnaryOperator::Negate,
                operand: Box::new(operand),
            });
        }

        // Prefix plus (no-op)
        if matches!(self.current_token(), Token::Plus) {
            self.consume();
            self.enter()?;
            let operand = self.parse_unary()?;
            self.leave(1);
            return Ok(operand);
        }

        self.parse_power()
    }

    fn parse_power(&mut self) -> FormulaResult<FormulaExpr> {
        let base = self.parse_primary()?;

        if matches!(self.current_token(), Token::Caret) {
            self.consume();
            self.enter()?;
            let exponent = self.parse_unary()?; // Right associative
            self.leave(1);
            return Ok(FormulaExpr::binary(BinaryOperator::Power, base, exponent));
        }

        Ok(base)
    }

    fn parse_primary(&mut self) -> FormulaResult<FormulaExpr> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume();
                Ok(FormulaExpr::Number(n))
            }

            Token::Scientific {
                value,
                mantissa,
                exponent,
            } => {
                self.consume();
                Ok(FormulaExpr::Scientific {
                    value,
                    mantissa,
                    exponent,
                })
            }

            Token::LeftParen => {
                self.consume();
                self.enter()?;
                let expr = self.parse_expression()?;
                self.expect(&Token::RightParen)?;
                self.leave(1);
                Ok(FormulaExpr::Group(Box::new(expr)))
            }

            Token::Identifier(name) => {
                self.consume();
                // Check if it's a function call
                if matches!(self.current_token(), Token::LeftParen) {
                    self.parse_function_call(name)
                } else {
                    Ok(FormulaExpr::Variable(name))
                }
            }

            other => Err(FormulaError::Parse(format!(
                "Unexpected {}",
                other.describe()
            ))),
        }
    }

    fn parse_function_call(&mut self, name: String) -> FormulaResult<FormulaExpr> {
        self.expect(&Token::LeftParen)?;
        self.enter()?;

        let mut args = Vec::new();

        // Parse arguments
        if !matches!(self.current_token(), Token::RightParen) {
            args.push(self.parse_expression()?);

            while matches!(self.current_token(), Token::Comma) {
                self.consume();
                args.push(self.parse_expression()?);
            }
        }

        self.expect(&Token::RightParen)?;
        self.leave(1);

        Ok(FormulaExpr::Function { name, args })
    }
}
