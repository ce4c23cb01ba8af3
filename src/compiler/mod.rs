//! Predicate compiler
//!
//! Lowers expression trees into the script language evaluated per document
//! by the store's `$where` operator.
//!
//! # Output grammar
//!
//! - Field references resolve to `this.<field>`
//! - `NULL` is `undefined`, booleans are `true`/`false`
//! - Strings are double-quoted script literals
//! - Every compound node is one parenthesized group
//!
//! ```
//! use docbridge::ast::Expr;
//! use docbridge::compiler::compile;
//!
//! let expr = Expr::and([
//!     Expr::ident("age").gt(Expr::lit(18)),
//!     Expr::ident("name").eq(Expr::string("Al")),
//! ]);
//! assert_eq!(
//!     compile(&expr, "users").unwrap(),
//!     r#"((this.age > 18) && (this.name == "Al"))"#
//! );
//! ```

mod errors;
mod fragment;
mod predicate;
mod render;

pub use errors::{CompileError, CompileResult};
pub use fragment::Fragment;
pub use predicate::like_to_regex;
pub use render::{Compiler, NULL_TOKEN, RECEIVER};

use crate::ast::Expr;

/// Compiles `expr` for predicates over `collection` with default settings
pub fn compile(expr: &Expr, collection: &str) -> CompileResult<String> {
    Compiler::new(collection).compile(expr)
}
