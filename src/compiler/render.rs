//! Literal and identifier rendering
//!
//! Atoms become script literals; field references resolve against the
//! implicit per-document receiver `this`.

use serde_json::{Number, Value};

use crate::ast::{Expr, Literal};
use crate::config::CrossCollectionPolicy;

use super::errors::{CompileError, CompileResult};
use super::fragment::Fragment;

/// Receiver bound to the current document inside `$where`
pub const RECEIVER: &str = "this";

/// Script token for a missing value. The evaluator compares absent fields
/// against `undefined`, never `null`.
pub const NULL_TOKEN: &str = "undefined";

/// Lowers expressions for one collection
#[derive(Debug, Clone, Copy)]
pub struct Compiler<'a> {
    collection: &'a str,
    policy: CrossCollectionPolicy,
}

impl<'a> Compiler<'a> {
    /// Compiler for predicates over `collection`
    pub fn new(collection: &'a str) -> Self {
        Self {
            collection,
            policy: CrossCollectionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CrossCollectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn collection(&self) -> &str {
        self.collection
    }

    /// Compiles an expression into script text
    pub fn compile(&self, expr: &Expr) -> CompileResult<String> {
        Ok(self.render(expr)?.into_string())
    }

    /// Renders any node as a fragment
    pub fn render(&self, expr: &Expr) -> CompileResult<Fragment> {
        match expr {
            Expr::Identifier(name) => Ok(field_ref(name)),
            Expr::Qualified { table, column } => {
                if table == self.collection {
                    Ok(field_ref(column))
                } else {
                    self.foreign(table, column).map(Fragment::member)
                }
            }
            Expr::Literal(lit) => self.literal(lit),
            Expr::Complex { op, args } => self.complex(*op, args),
            Expr::Case(case) => self.case(case),
            Expr::Cast { expr, target } => self.cast(expr, *target),
            Expr::Ordered(_) => Err(CompileError::UnsupportedExpression(expr.kind().into())),
        }
    }

    /// Renders a literal
    pub fn literal(&self, lit: &Literal) -> CompileResult<Fragment> {
        match lit {
            Literal::Null => Ok(Fragment::member(NULL_TOKEN)),
            Literal::Bool(true) => Ok(Fragment::member("true")),
            Literal::Bool(false) => Ok(Fragment::member("false")),
            Literal::Integer(n) => Ok(Fragment::loose(n.to_string())),
            Literal::Float(f) => Number::from_f64(*f)
                .map(|n| Fragment::loose(n.to_string()))
                .ok_or_else(|| CompileError::UnsupportedLiteral(f.to_string())),
            Literal::String(s) => Ok(Fragment::member(Value::String(s.clone()).to_string())),
            Literal::Array(items) => {
                let rendered = items
                    .iter()
                    .map(|item| self.render(item).map(Fragment::into_string))
                    .collect::<CompileResult<Vec<_>>>()?;
                Ok(Fragment::member(format!("[{}]", rendered.join(", "))))
            }
        }
    }

    /// Raw field name, without the receiver
    ///
    /// Used where the store expects a field name rather than a script
    /// expression: projections, sort keys, and record keys on writes.
    pub fn field_name(&self, expr: &Expr) -> CompileResult<String> {
        match expr {
            Expr::Identifier(name) => Ok(name.clone()),
            Expr::Qualified { table, column } if table == self.collection => Ok(column.clone()),
            Expr::Qualified { table, column } => self.foreign(table, column),
            Expr::Literal(Literal::String(name)) => Ok(name.clone()),
            Expr::Ordered(ordered) => self.field_name(&ordered.expr),
            other => Err(CompileError::UnsupportedClause(format!(
                "{} as a field name",
                other.kind()
            ))),
        }
    }

    fn foreign(&self, table: &str, column: &str) -> CompileResult<String> {
        match self.policy {
            CrossCollectionPolicy::Literal => Ok(format!("{}.{}", table, column)),
            CrossCollectionPolicy::Reject => Err(CompileError::UnresolvedReference {
                table: table.to_string(),
                column: column.to_string(),
                collection: self.collection.to_string(),
            }),
        }
    }
}

fn field_ref(name: &str) -> Fragment {
    Fragment::member(format!("{}.{}", RECEIVER, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(expr: Expr) -> String {
        Compiler::new("users").compile(&expr).unwrap()
    }

    #[test]
    fn test_identifier_uses_receiver() {
        assert_eq!(render(Expr::ident("age")), "this.age");
    }

    #[test]
    fn test_self_table_qualified() {
        assert_eq!(render(Expr::qualified("users", "age")), "this.age");
    }

    #[test]
    fn test_foreign_qualified_is_verbatim() {
        assert_eq!(render(Expr::qualified("posts", "author")), "posts.author");
    }

    #[test]
    fn test_foreign_qualified_rejected() {
        let compiler = Compiler::new("users").with_policy(CrossCollectionPolicy::Reject);
        let err = compiler
            .compile(&Expr::qualified("posts", "author"))
            .unwrap_err();
        assert_eq!(err.code(), "DOCBRIDGE_UNRESOLVED_REFERENCE");
        assert!(err.to_string().contains("posts.author"));
    }

    #[test]
    fn test_scalars() {
        assert_eq!(render(Expr::lit(true)), "true");
        assert_eq!(render(Expr::lit(false)), "false");
        assert_eq!(render(Expr::null()), "undefined");
        assert_eq!(render(Expr::lit(-42)), "-42");
        assert_eq!(render(Expr::lit(2.5)), "2.5");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(render(Expr::string("Al")), "\"Al\"");
        assert_eq!(render(Expr::string("say \"hi\"")), r#""say \"hi\"""#);
        assert_eq!(render(Expr::string("a\\b")), r#""a\\b""#);
        assert_eq!(render(Expr::string("x/y")), "\"x/y\"");
    }

    #[test]
    fn test_non_finite_float() {
        let err = Compiler::new("t").compile(&Expr::lit(f64::NAN)).unwrap_err();
        assert_eq!(err.code(), "DOCBRIDGE_UNSUPPORTED_LITERAL");
    }

    #[test]
    fn test_array_resolves_elements() {
        let list = Expr::list([
            Expr::lit(1),
            Expr::ident("x"),
            Expr::qualified("users", "y"),
            Expr::string("s"),
        ]);
        assert_eq!(render(list), "[1, this.x, this.y, \"s\"]");
        assert_eq!(render(Expr::list([])), "[]");
    }

    #[test]
    fn test_field_names() {
        let compiler = Compiler::new("users");
        assert_eq!(compiler.field_name(&Expr::ident("age")).unwrap(), "age");
        assert_eq!(
            compiler.field_name(&Expr::qualified("users", "age")).unwrap(),
            "age"
        );
        assert_eq!(
            compiler.field_name(&Expr::qualified("posts", "id")).unwrap(),
            "posts.id"
        );
        assert_eq!(compiler.field_name(&Expr::string("name")).unwrap(), "name");

        let err = compiler
            .field_name(&Expr::ident("a").gt(Expr::lit(1)))
            .unwrap_err();
        assert_eq!(err.code(), "DOCBRIDGE_UNSUPPORTED_CLAUSE");
    }

    #[test]
    fn test_ordered_is_not_a_predicate() {
        let expr: Expr = Expr::ident("a").desc().into();
        let err = Compiler::new("t").compile(&expr).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnsupportedExpression("ordered expression".into())
        );
    }
}
