//! Caller-visible error type for dataset operations

use thiserror::Error;

use crate::compiler::CompileError;
use crate::store::StoreError;

/// Result type for dataset operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Dataset operation failures.
///
/// `Compile` and `UnsupportedOperation` are raised before the store is
/// contacted. `StoreFailure` keeps the store error as its source together
/// with the console form of the call that failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("{0} is not supported by the document store")]
    UnsupportedOperation(String),

    #[error("{context} failed: {source}")]
    StoreFailure {
        context: String,
        #[source]
        source: StoreError,
    },
}

impl QueryError {
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Compile(e) => e.code(),
            QueryError::UnsupportedOperation(_) => "DOCBRIDGE_UNSUPPORTED_OPERATION",
            QueryError::StoreFailure { .. } => "DOCBRIDGE_STORE_FAILURE",
        }
    }

    /// Returns true if the store was never contacted
    pub fn is_pre_store(&self) -> bool {
        !matches!(self, QueryError::StoreFailure { .. })
    }

    pub(crate) fn unsupported(operation: &str) -> Self {
        QueryError::UnsupportedOperation(operation.to_string())
    }
}
