//! Error types for the scripting harness
//!
//! Scoring errors signal a broken policy composition and are fatal.
//! Assertion errors are recovered per check by the runner.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the scripting harness
#[derive(Error, Debug)]
pub enum Error {
    // === Scoring Errors ===
    #[error("Invalid score {value}/{maximum}: value must lie between 0 and the maximum")]
    InvalidScore { value: f64, maximum: f64 },

    #[error("Cannot rescale a score whose maximum is zero")]
    DivisionByZero,

    #[error("Dynamic variable accessed while unbound")]
    UnboundVariable,

    // === Discovery Errors ===
    #[error("Could not find {file} in {}", directory.display())]
    MissingTestedFile { file: String, directory: PathBuf },

    // === Test Errors ===
    #[error("{0}")]
    TestAssertion(String),

    #[error("Interpreter '{name}' not found on PATH")]
    InterpreterNotFound { name: String },

    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Invalid tests file '{}': {message}", path.display())]
    TestsFileParse { path: PathBuf, message: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid score error
    pub fn invalid_score(value: f64, maximum: f64) -> Self {
        Self::InvalidScore { value, maximum }
    }

    /// Create a test assertion error
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::TestAssertion(message.into())
    }

    /// Create a file read error
    pub fn file_read(path: &std::path::Path, error: &io::Error) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Process exit code for an error that aborts the run
    ///
    /// A missing tested file exits with -1, everything else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::MissingTestedFile { .. } => -1,
            _ => 1,
        }
    }
}
