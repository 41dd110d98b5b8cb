use std::fmt::Display;

use itertools::Itertools;

use crate::config::Options;

/// What a request evaluates to.
#[derive(Clone, Debug, PartialEq)]
pub enum Answer {
    /// The value of an expression without `=`.
    Value(f64),
    /// The real roots of an equation, ascending.
    Roots(Vec<f64>),
}

impl Answer {
    /// `Result: 14.000000`, `Roots: -2.000000 2.000000` or `Roots: No roots`.
    pub fn render(&self, precision: usize) -> String {
        let fixed = |value: f64| {
            // Never print "-0.000..." for a value that rounds to zero.
            let text = format!("{value:.precision$}");
            match text.strip_prefix('-') {
                Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
                _ => text,
            }
        };
        match self {
            Answer::Value(value) => format!("Result: {}", fixed(*value)),
            Answer::Roots(roots) if roots.is_empty() => "Roots: No roots".to_string(),
            Answer::Roots(roots) => {
                format!("Roots: {}", roots.iter().map(|&r| fixed(r)).join(" "))
            }
        }
    }
}

impl Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(Options::default().precision))
    }
}
