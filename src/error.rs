use thiserror::Error;

use crate::parser::ParseError;

/// Failures while executing a parsed document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("variable `{0}` is not bound")]
    UnboundVariable(String),
    #[error("stack `{0}` is empty")]
    EmptyStack(String),
    #[error("text {0:?} is not a number")]
    NotANumber(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow evaluating `{0}`")]
    Overflow(char),
    #[error("exponent must be a non-negative integer, found `{0}`")]
    InvalidExponent(String),
    #[error("unknown operator `{0}`")]
    UnknownOperator(char),
    #[error("operator `{op}` needs two operands, found {available}")]
    OperatorUnderflow { op: char, available: usize },
    #[error("unknown function `@{0}`")]
    UnknownFunction(String),
    #[error("`@{function}` needs {needed} operand(s), found {available}")]
    FunctionUnderflow {
        function: &'static str,
        needed: usize,
        available: usize,
    },
    #[error("`@{function}` expected {expected}, found {found}")]
    TypeMismatch {
        function: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid decimal format pattern {0:?}")]
    InvalidFormat(String),
    #[error("FOR loop over `{0}` has a zero step")]
    ZeroStep(String),
    #[error("loop iteration limit of {0} exceeded")]
    IterationLimit(u64),
    #[error("failed to write output")]
    Output(#[from] std::fmt::Error),
}

/// Any failure of [`crate::render`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}
