//! Compiler error types
//!
//! Every compile error is raised before the store is contacted.

use thiserror::Error;

use crate::ast::{CastType, Operator};

/// Result type for compilation
pub type CompileResult<T> = Result<T, CompileError>;

/// Reasons an expression or clause cannot be lowered
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    // ==================
    // Unsupported input
    // ==================
    /// Operator outside the lowerable set
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Cast target other than String or the numeric family
    #[error("Only String, Numeric, Integer, and Float are valid cast types, got {0}")]
    UnsupportedCastType(CastType),

    /// Relational clause with no document-store equivalent
    #[error("{0} is not supported by the document store")]
    UnsupportedClause(String),

    /// Node that has no meaning in this position
    #[error("Cannot compile {0} here")]
    UnsupportedExpression(String),

    /// Pattern operand is not a string literal
    #[error("Operator {0} requires a string literal pattern")]
    UnsupportedPattern(Operator),

    /// Literal with no script spelling
    #[error("Literal has no script representation: {0}")]
    UnsupportedLiteral(String),

    // ==================
    // Malformed input
    // ==================
    /// Operand count does not fit the operator
    #[error("Operator {op} expects {expected} operand(s), got {actual}")]
    InvalidArity {
        op: Operator,
        expected: &'static str,
        actual: usize,
    },

    /// Qualified identifier naming another collection
    #[error("{table}.{column} cannot be resolved against collection {collection}")]
    UnresolvedReference {
        table: String,
        column: String,
        collection: String,
    },
}

impl CompileError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::UnsupportedOperator(_) => "DOCBRIDGE_UNSUPPORTED_OPERATOR",
            CompileError::UnsupportedCastType(_) => "DOCBRIDGE_UNSUPPORTED_CAST_TYPE",
            CompileError::UnsupportedClause(_) => "DOCBRIDGE_UNSUPPORTED_CLAUSE",
            CompileError::UnsupportedExpression(_) => "DOCBRIDGE_UNSUPPORTED_EXPRESSION",
            CompileError::UnsupportedPattern(_) => "DOCBRIDGE_UNSUPPORTED_PATTERN",
            CompileError::UnsupportedLiteral(_) => "DOCBRIDGE_UNSUPPORTED_LITERAL",
            CompileError::InvalidArity { .. } => "DOCBRIDGE_INVALID_ARITY",
            CompileError::UnresolvedReference { .. } => "DOCBRIDGE_UNRESOLVED_REFERENCE",
        }
    }

    pub(crate) fn unsupported_clause(clause: &str) -> Self {
        CompileError::UnsupportedClause(clause.to_string())
    }
}
