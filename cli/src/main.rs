#![deny(unsafe_code)]

//! Command-line front end: answers each expression given as an argument, or
//! reads requests line by line from stdin.

use std::{
    io::{self, BufRead},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use interpreter::{calculate, Error, Options};
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Longest request accepted, in bytes.
const MAX_REQUEST_LEN: usize = 1024;

/// Evaluate expressions in x, or solve equations for their real roots.
#[derive(Parser)]
#[command(name = "calc", version, about, long_about = None)]
struct Cli {
    /// Expressions or equations to answer. Without any, requests are read
    /// from stdin until `q`, `quit` or end of input.
    expressions: Vec<String>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "calc.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log tokens, stack operations and roots of every request.
    #[arg(long)]
    trace: bool,

    /// Decimal places in answers.
    #[arg(long)]
    precision: Option<usize>,
}

struct Reply {
    text: String,
    caret: Option<String>,
}

impl Reply {
    fn print(&self) {
        if let Some(caret) = &self.caret {
            eprintln!("{caret}");
        }
        println!("{}", self.text);
    }
}

fn answer(input: &str, options: &Options) -> Reply {
    if input.len() > MAX_REQUEST_LEN {
        return Reply {
            text: format!("Error: request exceeds {MAX_REQUEST_LEN} bytes"),
            caret: None,
        };
    }
    match calculate(input, options) {
        Ok(answer) => Reply {
            text: answer.render(options.precision),
            caret: None,
        },
        Err(err) => Reply {
            caret: underline(input, &err),
            text: format!("Error: {err}"),
        },
    }
}

/// A line of carets under the part of `input` the error points at.
fn underline(input: &str, err: &Error) -> Option<String> {
    let span = err.span.clone()?;
    let offset = input.get(..span.start)?.chars().count();
    let width = input.get(span)?.chars().count().max(1);
    Some(format!("{}{}", " ".repeat(offset), "^".repeat(width)))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.trace) {
        (0, false) => "warn",
        (1, false) => "info",
        (0..=2, _) => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let mut options = load_config(&cli.config)?;
    options.trace |= cli.trace;
    if let Some(precision) = cli.precision {
        options.precision = precision;
    }

    if cli.expressions.is_empty() {
        return repl(&options);
    }

    let replies: Vec<Reply> = cli
        .expressions
        .par_iter()
        .map(|input| answer(input, &options))
        .collect();
    for (input, reply) in cli.expressions.iter().zip(&replies) {
        println!("{input}");
        reply.print();
    }
    Ok(())
}

fn repl(options: &Options) -> Result<()> {
    info!("Reading requests from stdin");
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read request")?;
        let input = line.trim_end();
        match input.trim_start() {
            "" => continue,
            "q" | "quit" => break,
            _ => answer(input, options).print(),
        }
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<Options> {
    if path.exists() {
        let options = Options::load(path)
            .with_context(|| format!("invalid config '{}'", path.display()))?;
        info!(path = %path.display(), "Loaded config");
        Ok(options)
    } else {
        info!(path = %path.display(), "Config file not found, using defaults");
        Ok(Options::default())
    }
}
