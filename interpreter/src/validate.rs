use itertools::Itertools;

use crate::{
    error::{BracketSide, Error, ErrorKind},
    parser::{Operator, Token},
};

/// Rejects token sequences the evaluator cannot fold, reporting the first
/// problem found.
pub fn validate(tokens: &[Token]) -> Result<(), Error> {
    let (first, last) = match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(ErrorKind::MissingExpression.into()),
    };

    check_brackets(tokens)?;

    let pairs = || tokens.iter().tuple_windows::<(&Token, &Token)>();
    let fail = |kind: ErrorKind, a: &Token, b: &Token| -> Result<(), Error> {
        Err(Error::new(kind, a.span().start..b.span().end))
    };

    for (a, b) in pairs() {
        if a.is(Operator::Open) && b.is(Operator::Close) {
            return fail(ErrorKind::EmptyBrackets, a, b);
        }
        if a.is(Operator::Close) && b.is(Operator::Open) {
            return fail(ErrorKind::AdjacentBrackets, a, b);
        }
    }

    // Brackets may touch an operator on their open side only.
    for (a, b) in pairs() {
        if let (Some(left), Some(right)) = (a.operator(), b.operator()) {
            if left != Operator::Close && right != Operator::Open {
                return fail(ErrorKind::ConsecutiveOperators, a, b);
            }
        }
    }

    for (a, b) in pairs() {
        if a.is_operand() && b.is(Operator::Open) {
            return fail(ErrorKind::ImplicitMultiplication(BracketSide::Left), a, b);
        }
        if a.is(Operator::Close) && b.is_operand() {
            return fail(ErrorKind::ImplicitMultiplication(BracketSide::Right), a, b);
        }
    }

    for (a, b) in pairs() {
        if a.is_operand() && b.is_operand() {
            return fail(ErrorKind::ConsecutiveOperands, a, b);
        }
    }

    if first.operator().map_or(false, |op| op != Operator::Open) {
        return Err(Error::new(ErrorKind::LeadingOperator, first.span()));
    }
    if last.operator().map_or(false, |op| op != Operator::Close) {
        return Err(Error::new(ErrorKind::TrailingOperator, last.span()));
    }

    Ok(())
}

fn check_brackets(tokens: &[Token]) -> Result<(), Error> {
    let mut open = Vec::new();
    for token in tokens {
        if token.is(Operator::Open) {
            open.push(token.span());
        } else if token.is(Operator::Close) && open.pop().is_none() {
            return Err(Error::new(
                ErrorKind::BracketMismatch(BracketSide::Right),
                token.span(),
            ));
        }
    }
    match open.pop() {
        Some(span) => Err(Error::new(ErrorKind::BracketMismatch(BracketSide::Left), span)),
        None => Ok(()),
    }
}
