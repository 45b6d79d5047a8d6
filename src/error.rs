//! Crate-level error type for input loading and validation.

use std::fmt;
use std::io;

use thiserror::Error;

/// Validation error with field path and constraint description.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"market.p_max"` or `"fleet[3].duration"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("cannot read \"{path}\": {source}")]
    Read { path: String, source: io::Error },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{} validation error(s):\n{}", .0.len(), join_errors(.0))]
    Invalid(Vec<ConfigError>),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps a non-empty error list, or returns `Ok(())` when there is nothing to report.
    pub fn check(errors: Vec<ConfigError>) -> Result<()> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self::Invalid(errors))
        }
    }
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
