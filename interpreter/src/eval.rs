use std::ops::Range;

use tracing::debug;

use crate::{
    error::{Error, ErrorKind},
    parser::{Operator, Token, TokenKind},
    value::Polynomial,
};

/// Added to the priority of every operator inside one more pair of brackets.
pub const BRACKET_PRIORITY: u32 = 4;

#[derive(Clone, Debug, PartialEq)]
struct Pending {
    op: Operator,
    priority: u32,
    span: Range<usize>,
}

fn apply(
    op: Operator,
    left: &Polynomial,
    right: &Polynomial,
) -> Result<Polynomial, ErrorKind> {
    match op {
        Operator::Add => left.add(right),
        Operator::Sub => left.subtract(right),
        Operator::Mul => left.multiply(right),
        Operator::Div => left.divide(right),
        Operator::Rem => left.modulo(right),
        Operator::Pow => left.power(right),
        Operator::Open | Operator::Close => Err(ErrorKind::UnknownOperator(op.as_char())),
    }
}

/// Folds a validated token stream into one polynomial with an operator stack
/// and a value stack.
///
/// Brackets are never stacked: they raise or lower the priority of the
/// operators that follow, so an operator only reduces tops of equal or higher
/// priority. Equal priorities reduce, which makes every operator, `^`
/// included, left associative.
pub struct Evaluator {
    operators: Vec<Pending>,
    values: Vec<Polynomial>,
    offset: u32,
    trace: bool,
}

impl Evaluator {
    pub fn new(trace: bool) -> Self {
        Evaluator {
            operators: Vec::new(),
            values: Vec::new(),
            offset: 0,
            trace,
        }
    }

    fn push_value(&mut self, value: Polynomial) {
        if self.trace {
            debug!(expression = %value, "stack an expression");
        }
        self.values.push(value);
    }

    pub fn push(&mut self, token: &Token) -> Result<(), Error> {
        match token.kind() {
            TokenKind::Number(num) => self.push_value(Polynomial::constant(num)),
            TokenKind::Variable => self.push_value(Polynomial::variable()),
            TokenKind::Operator(Operator::Open) => self.offset += BRACKET_PRIORITY,
            TokenKind::Operator(Operator::Close) => {
                self.offset = self.offset.saturating_sub(BRACKET_PRIORITY)
            }
            TokenKind::Operator(op) => {
                let unknown = || Error::new(ErrorKind::UnknownOperator(op.as_char()), token.span());
                let priority = op.priority().ok_or_else(unknown)? + self.offset;
                while self
                    .operators
                    .last()
                    .map_or(false, |top| top.priority >= priority)
                {
                    self.reduce()?;
                }
                if self.trace {
                    debug!(operator = %op, priority, "stack an operator");
                }
                self.operators.push(Pending {
                    op,
                    priority,
                    span: token.span(),
                });
            }
            TokenKind::Equals => {
                return Err(Error::new(ErrorKind::UnknownOperator('='), token.span()));
            }
        }
        Ok(())
    }

    fn reduce(&mut self) -> Result<(), Error> {
        let Some(pending) = self.operators.pop() else {
            return Ok(());
        };
        if self.trace {
            debug!(operator = %pending.op, priority = pending.priority, "pop an operator");
        }
        let (right, left) = match (self.values.pop(), self.values.pop()) {
            (Some(right), Some(left)) => (right, left),
            _ => return Err(Error::new(ErrorKind::StackUnderflow, pending.span)),
        };
        if self.trace {
            debug!(left = %left, right = %right, "pop two expressions");
        }
        let result =
            apply(pending.op, &left, &right).map_err(|kind| Error::new(kind, pending.span))?;
        self.push_value(result);
        Ok(())
    }

    pub fn finish(mut self) -> Result<Polynomial, Error> {
        while !self.operators.is_empty() {
            self.reduce()?;
        }
        match (self.values.pop(), self.values.is_empty()) {
            (Some(result), true) => Ok(result),
            _ => Err(ErrorKind::MalformedExpression.into()),
        }
    }
}

pub fn evaluate(tokens: &[Token], trace: bool) -> Result<Polynomial, Error> {
    #[cfg(feature = "tracy")]
    profiling::scope!("evaluate");
    let mut evaluator = Evaluator::new(trace);
    for token in tokens {
        evaluator.push(token)?;
    }
    evaluator.finish()
}
