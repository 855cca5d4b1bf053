//! Error types for the docgauge library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using docgauge's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during extraction or analysis.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reading the source tree.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported language for the given file.
    #[error("Unsupported language for file: {path}")]
    UnsupportedLanguage { path: PathBuf },

    /// Parse error for a single source unit. Recoverable: the extractor
    /// logs it and continues with the remaining units.
    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Caller contract violation (bad argument, not a runtime condition).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new parse error.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
