//! Native selector
//!
//! The filter document sent with every read and write. It is either empty
//! (match every document) or carries exactly one `$where` script.

use serde::Serialize;
use serde_json::{json, Value};

use crate::ast::{Expr, Query};
use crate::compiler::{CompileError, CompileResult, Compiler};

/// Filter document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selector {
    #[serde(rename = "$where", skip_serializing_if = "Option::is_none")]
    where_clause: Option<String>,
}

impl Selector {
    /// Matches every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Selector evaluating `script` per document
    pub fn where_script(script: impl Into<String>) -> Self {
        Self {
            where_clause: Some(script.into()),
        }
    }

    /// Compiles an optional predicate
    pub fn from_predicate(predicate: Option<&Expr>, compiler: &Compiler<'_>) -> CompileResult<Self> {
        match predicate {
            Some(expr) => Ok(Self::where_script(compiler.compile(expr)?)),
            None => Ok(Self::all()),
        }
    }

    /// True when the selector matches every document
    pub fn is_empty(&self) -> bool {
        self.where_clause.is_none()
    }

    pub fn where_clause(&self) -> Option<&str> {
        self.where_clause.as_deref()
    }

    /// Document form as sent to the store
    pub fn to_document(&self) -> Value {
        match &self.where_clause {
            Some(script) => json!({ "$where": script }),
            None => json!({}),
        }
    }
}

/// Builds the selector for a query descriptor.
///
/// Join, group, and having clauses are rejected before the predicate is
/// looked at.
pub fn build_selector(query: &Query, compiler: &Compiler<'_>) -> CompileResult<Selector> {
    if let Some(clause) = query.unsupported_clause() {
        return Err(CompileError::unsupported_clause(clause));
    }
    Selector::from_predicate(query.predicate.as_ref(), compiler)
}
