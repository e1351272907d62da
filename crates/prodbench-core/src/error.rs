//! Error types and exit codes for prodbench
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (transaction, index DDL, I/O)
//! - 2: Usage error (bad flags/args, invalid configuration)
//! - 3: Store error (store unreachable or credentials rejected)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args/config (2)
    Usage = 2,
    /// Store unreachable or refused (3)
    Store = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur while loading or benchmarking
#[derive(Error, Debug)]
pub enum BenchError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("invalid config {path:?}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    // Store errors (exit code 3)
    #[error("failed to connect to {target}: {reason}")]
    Connection { target: String, reason: String },

    // Generic failures (exit code 1)
    #[error("failed to {operation}: {reason}")]
    Transaction { operation: String, reason: String },

    #[error("index {index}: {reason}")]
    IndexDdl { index: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("load interrupted; committed batches were kept")]
    Interrupted,

    #[error("{0}")]
    Other(String),
}

impl BenchError {
    /// Create an error for a store that could not be reached
    pub fn connection(target: impl std::fmt::Display, error: impl std::fmt::Display) -> Self {
        BenchError::Connection {
            target: target.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed transaction step
    pub fn transaction(operation: &str, error: impl std::fmt::Display) -> Self {
        BenchError::Transaction {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed index create/drop
    pub fn index_ddl(index: &str, error: impl std::fmt::Display) -> Self {
        BenchError::IndexDdl {
            index: index.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        BenchError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            BenchError::UsageError(_)
            | BenchError::InvalidValue { .. }
            | BenchError::InvalidConfig { .. } => ExitCode::Usage,

            BenchError::Connection { .. } => ExitCode::Store,

            BenchError::Transaction { .. }
            | BenchError::IndexDdl { .. }
            | BenchError::Io(_)
            | BenchError::Toml(_)
            | BenchError::Json(_)
            | BenchError::Interrupted
            | BenchError::Other(_) => ExitCode::Failure,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            BenchError::UsageError(_) => "usage_error",
            BenchError::InvalidValue { .. } => "invalid_value",
            BenchError::InvalidConfig { .. } => "invalid_config",
            BenchError::Connection { .. } => "connection",
            BenchError::Transaction { .. } => "transaction",
            BenchError::IndexDdl { .. } => "index_ddl",
            BenchError::Io(_) => "io_error",
            BenchError::Toml(_) => "toml_error",
            BenchError::Json(_) => "json_error",
            BenchError::Interrupted => "interrupted",
            BenchError::Other(_) => "other",
        }
    }

    /// Convert error to JSON for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

impl From<rusqlite::Error> for BenchError {
    fn from(err: rusqlite::Error) -> Self {
        BenchError::Other(err.to_string())
    }
}

impl From<postgres::Error> for BenchError {
    fn from(err: postgres::Error) -> Self {
        BenchError::Other(err.to_string())
    }
}

/// A single query measurement that could not be taken.
///
/// Recovered locally by the benchmark sweep; never escalated to a
/// [`BenchError`].
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[error("{reason}")]
pub struct TimingError {
    pub reason: String,
}

impl TimingError {
    pub fn new(reason: impl std::fmt::Display) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for prodbench operations
pub type Result<T> = std::result::Result<T, BenchError>;
