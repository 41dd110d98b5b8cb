//! Evaluates expressions in one variable and solves equations for their real
//! roots.
//!
//! ```
//! use interpreter::{calculate, respond, Answer, Options};
//!
//! let options = Options::default();
//! assert_eq!(calculate("2+3*4", &options), Ok(Answer::Value(14.0)));
//! assert_eq!(respond("x^2 + 1 = 0", &options), "Roots: No roots");
//! ```

use tracing::debug;

mod answer;
mod config;
mod error;
mod eval;
pub mod parser;
mod roots;
mod validate;
mod value;

pub use answer::Answer;
pub use config::{ConfigError, Options, SolverConfig};
pub use error::{BracketSide, Error, ErrorKind};
pub use eval::{evaluate, Evaluator, BRACKET_PRIORITY};
pub use parser::{render_tokens, tokenize, Operator, Statement, Token, TokenKind, VARIABLE};
pub use roots::{bisect, find_roots};
pub use validate::validate;
pub use value::{Expression, Polynomial, MAX_DEGREE};

/// Runs one request through the whole pipeline.
pub fn calculate(input: &str, options: &Options) -> Result<Answer, Error> {
    #[cfg(feature = "tracy")]
    profiling::scope!("calculate");
    let tokens = tokenize(input)?;
    validate(&tokens)?;
    let statement = Statement::from_tokens(tokens)?;
    if options.trace {
        debug!(tokens = %render_tokens(statement.tokens()), "parsed");
    }

    let polynomial = evaluate(statement.tokens(), options.trace)?;
    if options.trace {
        debug!(%polynomial, "evaluated");
    }

    match statement {
        Statement::Expression(_) => polynomial
            .as_num()
            .map(Answer::Value)
            .ok_or_else(|| ErrorKind::MalformedExpression.into()),
        Statement::Equation(_) => {
            let roots = find_roots(&polynomial, &options.solver, options.trace)?;
            Ok(Answer::Roots(roots))
        }
    }
}

/// The reply line for one request: the rendered [`Answer`], or
/// `Error: <reason>`.
pub fn respond(input: &str, options: &Options) -> String {
    match calculate(input, options) {
        Ok(answer) => answer.render(options.precision),
        Err(err) => format!("Error: {err}"),
    }
}
