//! CLI-specific error types
//!
//! Errors from the library layers keep their own code so the JSON error
//! response names the actual failure.

use std::fmt;
use std::io;

use crate::compiler::CompileError;
use crate::config::ConfigError;
use crate::dataset::QueryError;

/// CLI error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    code: &'static str,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// I/O error (stdin/stdout)
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new("DOCBRIDGE_CLI_IO_ERROR", msg)
    }

    /// Request body does not describe an expression or query
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new("DOCBRIDGE_CLI_INVALID_REQUEST", msg)
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Self::io_error(e.to_string())
        } else {
            Self::invalid_request(format!("JSON error: {}", e))
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

impl From<CompileError> for CliError {
    fn from(e: CompileError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
