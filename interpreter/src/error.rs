use std::{fmt::Display, ops::Range};

use crate::value::MAX_DEGREE;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BracketSide {
    Left,
    Right,
}

impl BracketSide {
    fn implicit_reason(self) -> &'static str {
        match self {
            BracketSide::Left => "number or variable followed by left bracket, please use '*'",
            BracketSide::Right => "right bracket followed by number or variable, please use '*'",
        }
    }
}

impl Display for BracketSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketSide::Left => write!(f, "left"),
            BracketSide::Right => write!(f, "right"),
        }
    }
}

/// Every way a request can fail, from tokenizing to root finding.
///
/// The `Display` text of each variant is the reason reported after `Error: `.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    #[error("symbol '{0}' is not defined")]
    UndefinedSymbol(char),

    #[error("malformed number '{0}'")]
    MalformedNumber(String),

    #[error("missing expression")]
    MissingExpression,

    #[error("unmatched {0} bracket")]
    BracketMismatch(BracketSide),

    #[error("left bracket followed by right bracket")]
    EmptyBrackets,

    #[error("right bracket followed by left bracket, please use '*'")]
    AdjacentBrackets,

    #[error("consecutive operators")]
    ConsecutiveOperators,

    /// `Left` is an operand before `(`, `Right` is `)` before an operand.
    #[error("{}", .0.implicit_reason())]
    ImplicitMultiplication(BracketSide),

    #[error("consecutive numbers or variables")]
    ConsecutiveOperands,

    #[error("operator at the beginning")]
    LeadingOperator,

    #[error("operator at the end")]
    TrailingOperator,

    #[error("variables are only permitted in equations")]
    VariableOutsideEquation,

    #[error("divisor must be a constant")]
    NonConstantDivisor,

    #[error("divide by zero")]
    DivideByZero,

    #[error("modulus must be a constant")]
    NonConstantModulus,

    #[error("modulo by zero")]
    ModuloByZero,

    #[error("dividend must be a constant")]
    NonConstantDividend,

    #[error("exponent must be a constant")]
    ExponentNotConstant,

    #[error("exponent must not be negative")]
    ExponentNegative,

    #[error("exponent must be an integer")]
    ExponentNotInteger,

    #[error("expression stack is empty")]
    StackUnderflow,

    #[error("expression stack count is wrong")]
    MalformedExpression,

    #[error("unknown operator '{0}'")]
    UnknownOperator(char),

    #[error("power count is too large (>={})", MAX_DEGREE)]
    DegreeTooLarge,

    #[error("indeterminate bisection on [{lo}, {hi}]")]
    Indeterminate { lo: f64, hi: f64 },
}

/// An [`ErrorKind`] plus the byte range of the request text it refers to.
///
/// Arithmetic failures point at the operator that failed; failures that
/// concern the whole request carry no span.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    pub span: Option<Range<usize>>,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Range<usize>) -> Self {
        Error {
            kind,
            span: Some(span),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error { kind, span: None }
    }
}
