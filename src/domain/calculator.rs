//! Arithmetic for the calculator panel.
//!
//! Expressions are parsed by a small recursive-descent parser that accepts
//! numeric literals, `+ - * /` (plus the `×` and `÷` glyphs the keypad emits),
//! parentheses and unary minus. Nothing else is evaluated.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculatorError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unbalanced parentheses")]
    UnbalancedParens,
    #[error("division by zero")]
    DivisionByZero,
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("parentheses nested deeper than {0}")]
    TooDeep(usize),
}

/// Deepest parenthesis nesting the parser will follow.
const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalculatorError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| CalculatorError::InvalidNumber(literal.clone()))?;
                tokens.push(Token::Num(value));
            }
            '+' => {
                tokens.push(Token::Plus);
                chars.next();
            }
            '-' | '−' => {
                tokens.push(Token::Minus);
                chars.next();
            }
            '*' | '×' => {
                tokens.push(Token::Star);
                chars.next();
            }
            '/' | '÷' => {
                tokens.push(Token::Slash);
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            other => return Err(CalculatorError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64, CalculatorError> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.next();
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<f64, CalculatorError> {
        let mut value = self.factor()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.next();
            let rhs = self.factor()?;
            if op == Token::Star {
                value *= rhs;
            } else {
                if rhs == 0.0 {
                    return Err(CalculatorError::DivisionByZero);
                }
                value /= rhs;
            }
        }
        Ok(value)
    }

    // factor := ('-' | '+')* (number | '(' expr ')')
    fn factor(&mut self) -> Result<f64, CalculatorError> {
        let mut negative = false;
        while let Some(sign @ (Token::Minus | Token::Plus)) = self.peek() {
            self.next();
            if sign == Token::Minus {
                negative = !negative;
            }
        }

        let value = match self.next() {
            Some(Token::Num(n)) => n,
            Some(Token::LParen) => {
                self.depth += 1;
                if self.depth > MAX_NESTING {
                    return Err(CalculatorError::TooDeep(MAX_NESTING));
                }
                let value = self.expr()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::RParen) => value,
                    _ => return Err(CalculatorError::UnbalancedParens),
                }
            }
            Some(Token::RParen) => return Err(CalculatorError::UnbalancedParens),
            Some(_) | None => return Err(CalculatorError::UnexpectedEnd),
        };

        Ok(if negative { -value } else { value })
    }
}

pub fn evaluate(expression: &str) -> Result<f64, CalculatorError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(CalculatorError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    match parser.peek() {
        None => Ok(value),
        Some(Token::RParen) => Err(CalculatorError::UnbalancedParens),
        Some(_) => Err(CalculatorError::UnexpectedEnd),
    }
}

/// Keypad display state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalcDisplay {
    pub value: String,
}

impl CalcDisplay {
    pub fn append(&mut self, input: &str) {
        if self.value == "Error" {
            self.value.clear();
        }
        self.value.push_str(input);
    }

    pub fn delete_last(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Replaces the display with the result, or `Error` when it cannot be evaluated.
    pub fn evaluate(&mut self) -> Result<f64, CalculatorError> {
        let result = evaluate(&self.value);
        self.value = match &result {
            Ok(v) => format_number(*v),
            Err(_) => "Error".to_string(),
        };
        result
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Chain speed in m/min: V = (P × Z × N) / 1000.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainSpeed {
    pub pitch_mm: f64,
    pub teeth: f64,
    pub rpm: f64,
    pub meters_per_minute: f64,
}

impl ChainSpeed {
    pub fn compute(pitch_mm: f64, teeth: f64, rpm: f64) -> Self {
        Self {
            pitch_mm,
            teeth,
            rpm,
            meters_per_minute: pitch_mm * teeth * rpm / 1000.0,
        }
    }

    pub fn from_inputs(pitch: &str, teeth: &str, rpm: &str) -> Result<Self, CalculatorError> {
        let pitch_mm = parse_field(pitch, "pitch")?;
        let teeth = parse_field(teeth, "teeth")?;
        let rpm = parse_field(rpm, "rpm")?;
        Ok(Self::compute(pitch_mm, teeth, rpm))
    }

    pub fn describe(&self) -> String {
        format!(
            "Chain speed: {:.2} m/min (V = ({} × {} × {}) / 1000)",
            self.meters_per_minute, self.pitch_mm, self.teeth, self.rpm
        )
    }
}

fn parse_field(raw: &str, field: &'static str) -> Result<f64, CalculatorError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(CalculatorError::NotANumber(field))
}
