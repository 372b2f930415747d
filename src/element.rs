use std::fmt;

use crate::lexer::Token;

/// One unit inside a tag: a constant, a variable, a string, a function
/// reference or an operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    ConstantInteger(i32),
    ConstantDouble(f64),
    /// Escape sequences already resolved.
    String(String),
    Variable(String),
    /// Name without the `@` prefix.
    Function(String),
    Operator(char),
}

impl Element {
    /// Canonical source form: strings are re-quoted and functions regain their `@`.
    pub fn as_text(&self) -> String {
        match self {
            Element::ConstantInteger(value) => value.to_string(),
            Element::ConstantDouble(value) => format_double(*value),
            Element::String(value) => quote_string(value),
            Element::Variable(name) => name.clone(),
            Element::Function(name) => format!("@{name}"),
            Element::Operator(op) => op.to_string(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::ConstantInteger(_) => "integer",
            Element::ConstantDouble(_) => "double",
            Element::String(_) => "string",
            Element::Variable(_) => "variable",
            Element::Function(_) => "function",
            Element::Operator(_) => "operator",
        }
    }

    /// Converts an element token, handing back any token that is not one.
    pub(crate) fn from_token(token: Token) -> Result<Element, Token> {
        Ok(match token {
            Token::Variable(name) => Element::Variable(name),
            Token::ConstantInteger(value) => Element::ConstantInteger(value),
            Token::ConstantDouble(value) => Element::ConstantDouble(value),
            Token::String(value) => Element::String(value),
            Token::Function(name) => Element::Function(name),
            Token::Operator(op) => Element::Operator(op),
            other => return Err(other),
        })
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// Renders a double so that it always carries a fractional part and never
/// uses exponent notation, keeping it lexable as a `CONSTANT_DOUBLE`.
pub fn format_double(value: f64) -> String {
    let debug = format!("{value:?}");
    if !value.is_finite() || !debug.contains(['e', 'E']) {
        return debug;
    }

    let mut plain = format!("{value}");
    if !plain.contains('.') {
        plain.push_str(".0");
    }
    plain
}

fn quote_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_text_restores_source_form() {
        assert_eq!(Element::Function("sin".into()).as_text(), "@sin");
        assert_eq!(Element::ConstantInteger(-3).as_text(), "-3");
        assert_eq!(Element::ConstantDouble(2.0).as_text(), "2.0");
        assert_eq!(
            Element::String("say \"hi\"\n\\".into()).as_text(),
            r#""say \"hi\"\n\\""#
        );
    }

    #[test]
    fn doubles_never_use_exponents() {
        assert_eq!(format_double(1e-7), "0.0000001");
        assert_eq!(format_double(1e20), "100000000000000000000.0");
        assert_eq!(format_double(15.14), "15.14");
    }
}
