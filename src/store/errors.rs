//! Store error types
//!
//! Raised by `DocumentStore` implementations. The dataset layer wraps them
//! with the call that failed before handing them to the caller.

use thiserror::Error;

/// Result type for store calls
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by the store collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Collection or field name the store refuses
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Malformed request document
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Server-side operation failure
    #[error("Operation failed: {0}")]
    Operation(String),

    /// Store cannot be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::InvalidName(_) => "DOCBRIDGE_STORE_INVALID_NAME",
            StoreError::InvalidArgument(_) => "DOCBRIDGE_STORE_INVALID_ARGUMENT",
            StoreError::Operation(_) => "DOCBRIDGE_STORE_OPERATION",
            StoreError::Unavailable(_) => "DOCBRIDGE_STORE_UNAVAILABLE",
        }
    }
}
