//! Query descriptor
//!
//! Immutable snapshot of the clauses a dataset has accumulated. The mapper
//! reads it; nothing in this crate mutates one after it is handed over.

use serde::{Deserialize, Serialize};

use super::expr::{Expr, OrderedExpr};

/// Join flavours a relational builder can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

/// Join clause. Never lowered; its presence alone rejects the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    #[serde(default)]
    pub on: Option<Expr>,
}

impl Join {
    pub fn inner(table: impl Into<String>, on: Expr) -> Self {
        Self {
            kind: JoinKind::Inner,
            table: table.into(),
            on: Some(on),
        }
    }
}

/// Query descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Target collection name
    pub collection: String,
    /// Filter expression
    #[serde(default, rename = "where")]
    pub predicate: Option<Expr>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    /// Projected columns, in order
    #[serde(default)]
    pub select: Vec<Expr>,
    /// Sort keys, in order
    #[serde(default)]
    pub order: Vec<OrderedExpr>,
    #[serde(default)]
    pub group: Vec<Expr>,
    #[serde(default)]
    pub having: Option<Expr>,
    #[serde(default)]
    pub joins: Vec<Join>,
}

impl Query {
    /// Creates an unfiltered query over a collection
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            predicate: None,
            limit: None,
            offset: None,
            select: Vec::new(),
            order: Vec::new(),
            group: Vec::new(),
            having: None,
            joins: Vec::new(),
        }
    }

    /// Adds a filter. Repeated filters are combined with AND.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => Expr::and([existing, expr]),
            None => expr,
        });
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Replaces the projection
    pub fn select(mut self, columns: impl IntoIterator<Item = Expr>) -> Self {
        self.select = columns.into_iter().collect();
        self
    }

    /// Appends a sort key
    pub fn order_by(mut self, key: OrderedExpr) -> Self {
        self.order.push(key);
        self
    }

    pub fn group_by(mut self, keys: impl IntoIterator<Item = Expr>) -> Self {
        self.group = keys.into_iter().collect();
        self
    }

    pub fn with_having(mut self, expr: Expr) -> Self {
        self.having = Some(expr);
        self
    }

    pub fn with_join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Name of the first relational clause the store cannot express
    pub fn unsupported_clause(&self) -> Option<&'static str> {
        if !self.joins.is_empty() {
            Some("join")
        } else if !self.group.is_empty() {
            Some("group")
        } else if self.having.is_some() {
            Some("having")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Operator;
    use serde_json::json;

    #[test]
    fn test_query_builder() {
        let query = Query::new("users")
            .filter(Expr::ident("age").gt(Expr::lit(18)))
            .with_limit(10)
            .with_offset(20)
            .order_by(Expr::ident("name").desc());

        assert_eq!(query.collection, "users");
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.offset, Some(20));
        assert_eq!(query.order.len(), 1);
        assert!(query.order[0].descending);
        assert_eq!(query.unsupported_clause(), None);
    }

    #[test]
    fn test_repeated_filters_are_anded() {
        let a = Expr::ident("a").eq(Expr::lit(1));
        let b = Expr::ident("b").eq(Expr::lit(2));
        let query = Query::new("t").filter(a.clone()).filter(b.clone());

        assert_eq!(query.predicate, Some(Expr::complex(Operator::And, [a, b])));
    }

    #[test]
    fn test_unsupported_clauses() {
        let base = Query::new("users");
        assert_eq!(
            base.clone()
                .with_join(Join::inner("posts", Expr::ident("id")))
                .unsupported_clause(),
            Some("join")
        );
        assert_eq!(
            base.clone().group_by([Expr::ident("age")]).unsupported_clause(),
            Some("group")
        );
        assert_eq!(
            base.with_having(Expr::ident("x")).unsupported_clause(),
            Some("having")
        );
    }

    #[test]
    fn test_query_from_json() {
        let query: Query = serde_json::from_value(json!({
            "collection": "users",
            "where": {"complex": {"op": "=", "args": [{"identifier": "a"}, {"literal": 1}]}},
            "limit": 5,
            "order": [{"expr": {"identifier": "a"}, "descending": true}]
        }))
        .unwrap();

        assert_eq!(query.limit, Some(5));
        assert!(query.predicate.is_some());
        assert!(query.select.is_empty());
        assert!(query.order[0].descending);
    }
}
