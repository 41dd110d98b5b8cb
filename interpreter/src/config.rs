//! Per-call options for the engine, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur while loading or validating [`Options`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Bounds and tolerance for the root finder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Bisection stops below this width; values this close to zero count as
    /// roots and roots this close together are merged.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Leftmost point searched for roots.
    #[serde(default = "default_lower_bound")]
    pub lower_bound: f64,

    /// Rightmost point searched for roots.
    #[serde(default = "default_upper_bound")]
    pub upper_bound: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            lower_bound: default_lower_bound(),
            upper_bound: default_upper_bound(),
        }
    }
}

fn default_threshold() -> f64 {
    1e-6
}

fn default_lower_bound() -> f64 {
    -1e9
}

fn default_upper_bound() -> f64 {
    1e9
}

/// Options for one call into the engine.
///
/// Every request takes its options by reference; nothing here is global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// Emit `debug` events for tokens, stack operations and roots.
    #[serde(default)]
    pub trace: bool,

    /// Decimal places in rendered answers.
    #[serde(default = "default_precision")]
    pub precision: usize,

    #[serde(default)]
    pub solver: SolverConfig,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            trace: false,
            precision: default_precision(),
            solver: SolverConfig::default(),
        }
    }
}

fn default_precision() -> usize {
    6
}

impl Options {
    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse options from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let options: Options = toml::from_str(s)?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let solver = &self.solver;
        if !(solver.threshold.is_finite() && solver.threshold > 0.0) {
            return Err(ConfigError::Validation(format!(
                "solver.threshold must be a positive number, got {}",
                solver.threshold
            )));
        }
        if !(solver.lower_bound.is_finite() && solver.upper_bound.is_finite()) {
            return Err(ConfigError::Validation(
                "solver bounds must be finite".to_string(),
            ));
        }
        if solver.lower_bound >= solver.upper_bound {
            return Err(ConfigError::Validation(format!(
                "solver.lower_bound ({}) must be below solver.upper_bound ({})",
                solver.lower_bound, solver.upper_bound
            )));
        }
        Ok(())
    }
}
