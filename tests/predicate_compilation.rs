//! Predicate Compilation Tests
//!
//! End-to-end checks on the compiled `$where` grammar:
//! - Binary operators produce one parenthesis pair per node at any depth
//! - IN and NOT IN differ only in the comparison against -1
//! - LIKE patterns are escaped before wildcards are substituted
//! - Cast and cross-collection rules

use docbridge::ast::{CastType, Expr, Operator, OperatorClass, Query};
use docbridge::compiler::{compile, CompileError, Compiler};
use docbridge::config::CrossCollectionPolicy;
use docbridge::request::build_selector;
use proptest::prelude::*;
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn binary_symbol(op: Operator) -> Option<&'static str> {
    match op {
        Operator::Eq | Operator::Is => Some("=="),
        Operator::NotEq | Operator::IsNot => Some("!="),
        Operator::Lt => Some("<"),
        Operator::LtEq => Some("<="),
        Operator::Gt => Some(">"),
        Operator::GtEq => Some(">="),
        Operator::BitAnd => Some("&"),
        Operator::BitOr => Some("|"),
        Operator::BitXor => Some("^"),
        Operator::ShiftLeft => Some("<<"),
        Operator::ShiftRight => Some(">>"),
        _ => None,
    }
}

fn binary_operators() -> Vec<Operator> {
    Operator::ALL
        .into_iter()
        .filter(|op| op.class() == OperatorClass::Binary)
        .collect()
}

fn operand() -> impl Strategy<Value = Expr> {
    prop_oneof![
        "[a-z][a-z0-9_]{0,8}".prop_map(Expr::ident),
        any::<i64>().prop_map(Expr::lit),
        any::<bool>().prop_map(Expr::lit),
    ]
}

/// Operand trees nested up to three binary levels deep
fn nested_operand() -> impl Strategy<Value = Expr> {
    let ops = binary_operators();
    operand().prop_recursive(3, 16, 2, move |inner| {
        (prop::sample::select(ops.clone()), inner.clone(), inner)
            .prop_map(|(op, lhs, rhs)| Expr::binary(op, lhs, rhs))
    })
}

fn users(expr: &Expr) -> String {
    compile(expr, "users").unwrap()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn binary_node_is_one_group(
        op in prop::sample::select(binary_operators()),
        lhs in nested_operand(),
        rhs in nested_operand(),
    ) {
        let symbol = binary_symbol(op).unwrap();
        let expected = format!("({} {} {})", users(&lhs), symbol, users(&rhs));
        prop_assert_eq!(users(&Expr::binary(op, lhs, rhs)), expected);
    }

    #[test]
    fn in_and_not_in_differ_only_in_comparison(
        field in "[a-z][a-z0-9_]{0,8}",
        items in prop::collection::vec(any::<i64>(), 0..6),
    ) {
        let list = || Expr::list(items.iter().copied().map(Expr::lit));
        let inside = users(&Expr::binary(Operator::In, Expr::ident(field.as_str()), list()));
        let outside = users(&Expr::binary(Operator::NotIn, Expr::ident(field.as_str()), list()));

        prop_assert!(inside.ends_with(" != -1)"));
        prop_assert_eq!(inside.replace(" != -1)", " == -1)"), outside);
    }

    #[test]
    fn like_without_wildcards_matches_literally(text in "[a-z0-9.+*?()]{0,12}") {
        let compiled = users(&Expr::ident("s").like(text.as_str()));
        let body = compiled
            .strip_prefix("(this.s.match(/^")
            .and_then(|rest| rest.strip_suffix("$/))"))
            .unwrap();
        prop_assert_eq!(body, regex::escape(&text));
    }
}

// =============================================================================
// Fixed Scenarios
// =============================================================================

#[test]
fn test_conjunction_over_users() {
    let expr = Expr::and([
        Expr::ident("age").gt(Expr::lit(18)),
        Expr::ident("name").eq(Expr::string("Al")),
    ]);
    assert_eq!(users(&expr), r#"((this.age > 18) && (this.name == "Al"))"#);
}

#[test]
fn test_like_escapes_before_substitution() {
    let expr = Expr::ident("url").like("50%_off.com");
    assert_eq!(users(&expr), r"(this.url.match(/^50.*.off\.com$/))");
}

#[test]
fn test_numeric_cast() {
    let expr = Expr::ident("price").cast(CastType::Numeric);
    assert_eq!(users(&expr), "(this.price - 0)");
}

#[test]
fn test_unsupported_cast() {
    let expr = Expr::ident("born").cast(CastType::Time);
    assert_eq!(
        compile(&expr, "users").unwrap_err(),
        CompileError::UnsupportedCastType(CastType::Time)
    );
}

#[test]
fn test_null_comparison_uses_undefined() {
    let expr = Expr::binary(Operator::Is, Expr::ident("deleted_at"), Expr::null());
    assert_eq!(users(&expr), "(this.deleted_at == undefined)");
}

#[test]
fn test_cross_collection_reference() {
    let expr = Expr::qualified("posts", "author").eq(Expr::ident("name"));
    assert_eq!(users(&expr), "(posts.author == this.name)");

    let strict = Compiler::new("users").with_policy(CrossCollectionPolicy::Reject);
    let err = strict.compile(&expr).unwrap_err();
    assert_eq!(err.code(), "DOCBRIDGE_UNRESOLVED_REFERENCE");
}

#[test]
fn test_selector_from_json_descriptor() {
    let query: Query = serde_json::from_value(json!({
        "collection": "users",
        "where": {"complex": {"op": "NOT IN", "args": [
            {"identifier": "role"},
            {"literal": [{"literal": "admin"}, {"literal": "root"}]}
        ]}}
    }))
    .unwrap();

    let selector = build_selector(&query, &Compiler::new("users")).unwrap();
    assert_eq!(
        selector.to_document(),
        json!({"$where": r#"(["admin", "root"].indexOf(this.role) == -1)"#})
    );
}
