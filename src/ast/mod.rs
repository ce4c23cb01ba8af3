//! Relational query AST
//!
//! Expression trees and the query descriptor consumed by the compiler and
//! the dataset operations. Both are built elsewhere and only read here.

mod expr;
mod query;

pub use expr::{CaseExpr, CastType, Expr, Literal, Operator, OperatorClass, OrderedExpr};
pub use query::{Join, JoinKind, Query};
