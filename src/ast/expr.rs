//! Expression tree handed to the predicate compiler
//!
//! The tree is built by the query builder that sits in front of this crate.
//! Nodes are immutable once built; the compiler only borrows them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::compiler::CompileError;

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Bare field reference: `age`
    Identifier(String),
    /// Table-qualified field reference: `users.age`
    Qualified { table: String, column: String },
    /// Atomic or sequence literal
    Literal(Literal),
    /// Operator applied to an ordered operand list
    Complex { op: Operator, args: Vec<Expr> },
    /// `CASE [subject] WHEN .. THEN .. ELSE .. END`
    Case(CaseExpr),
    /// Sort key with direction
    Ordered(Box<OrderedExpr>),
    /// `CAST(expr AS target)`
    Cast { expr: Box<Expr>, target: CastType },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Expr::Qualified {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn lit(value: impl Into<Literal>) -> Self {
        Expr::Literal(value.into())
    }

    /// String literal (as opposed to `From<&str>`, which names a field)
    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(value.into()))
    }

    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    /// Sequence literal
    pub fn list(items: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Literal(Literal::Array(items.into_iter().collect()))
    }

    pub fn complex(op: Operator, args: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Complex {
            op,
            args: args.into_iter().collect(),
        }
    }

    pub fn binary(op: Operator, lhs: Expr, rhs: Expr) -> Self {
        Self::complex(op, [lhs, rhs])
    }

    pub fn unary(op: Operator, operand: Expr) -> Self {
        Self::complex(op, [operand])
    }

    pub fn and(operands: impl IntoIterator<Item = Expr>) -> Self {
        Self::complex(Operator::And, operands)
    }

    pub fn or(operands: impl IntoIterator<Item = Expr>) -> Self {
        Self::complex(Operator::Or, operands)
    }

    pub fn not(operand: Expr) -> Self {
        Self::unary(Operator::Not, operand)
    }

    pub fn eq(self, rhs: Expr) -> Self {
        Self::binary(Operator::Eq, self, rhs)
    }

    pub fn gt(self, rhs: Expr) -> Self {
        Self::binary(Operator::Gt, self, rhs)
    }

    pub fn lt(self, rhs: Expr) -> Self {
        Self::binary(Operator::Lt, self, rhs)
    }

    pub fn like(self, pattern: impl Into<String>) -> Self {
        Self::binary(Operator::Like, self, Expr::string(pattern))
    }

    pub fn is_in(self, collection: Expr) -> Self {
        Self::binary(Operator::In, self, collection)
    }

    pub fn cast(self, target: CastType) -> Self {
        Expr::Cast {
            expr: Box::new(self),
            target,
        }
    }

    pub fn asc(self) -> OrderedExpr {
        OrderedExpr::new(self, false)
    }

    pub fn desc(self) -> OrderedExpr {
        OrderedExpr::new(self, true)
    }

    /// Short label for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Identifier(_) => "identifier",
            Expr::Qualified { .. } => "qualified identifier",
            Expr::Literal(_) => "literal",
            Expr::Complex { .. } => "complex expression",
            Expr::Case(_) => "case expression",
            Expr::Ordered(_) => "ordered expression",
            Expr::Cast { .. } => "cast",
        }
    }
}

/// Field names convert to identifiers, mirroring how record keys are written.
impl From<&str> for Expr {
    fn from(name: &str) -> Self {
        Expr::Identifier(name.to_string())
    }
}

impl From<String> for Expr {
    fn from(name: String) -> Self {
        Expr::Identifier(name)
    }
}

impl From<Literal> for Expr {
    fn from(value: Literal) -> Self {
        Expr::Literal(value)
    }
}

/// Literal values
///
/// Untagged so that JSON scalars map onto literals directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Expr>),
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Bool(v)
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Literal::Integer(v.into())
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Integer(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::String(v.to_string())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::String(v)
    }
}

/// `CASE` expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseExpr {
    /// Optional value compared against each condition
    #[serde(default)]
    pub subject: Option<Box<Expr>>,
    /// `(condition, result)` pairs in evaluation order
    pub conditions: Vec<(Expr, Expr)>,
    /// Result when no condition holds
    pub default: Box<Expr>,
}

impl CaseExpr {
    pub fn new(conditions: Vec<(Expr, Expr)>, default: Expr) -> Self {
        Self {
            subject: None,
            conditions,
            default: Box::new(default),
        }
    }

    pub fn with_subject(mut self, subject: Expr) -> Self {
        self.subject = Some(Box::new(subject));
        self
    }
}

impl From<CaseExpr> for Expr {
    fn from(case: CaseExpr) -> Self {
        Expr::Case(case)
    }
}

/// Sort key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedExpr {
    pub expr: Expr,
    #[serde(default)]
    pub descending: bool,
}

impl OrderedExpr {
    pub fn new(expr: Expr, descending: bool) -> Self {
        Self { expr, descending }
    }
}

impl From<OrderedExpr> for Expr {
    fn from(ordered: OrderedExpr) -> Self {
        Expr::Ordered(Box::new(ordered))
    }
}

/// Lowering class of an operator. Each class has one rule in the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    /// Chained infix: `AND`, `OR`, `||`, arithmetic
    Chained,
    /// Two-operand infix: comparisons, `IS`, bitwise
    Binary,
    /// `~ !~ ~* !~*`
    Regex,
    /// `LIKE` family
    Like,
    /// `IN`, `NOT IN`
    Membership,
    /// `NOT`, `B~`
    Unary,
    /// `NOOP`
    Passthrough,
}

/// Closed operator set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    And,
    Or,
    Concat,
    Add,
    Subtract,
    Multiply,
    Divide,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Is,
    IsNot,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    Regex,
    NotRegex,
    RegexCi,
    NotRegexCi,
    Like,
    NotLike,
    ILike,
    NotILike,
    In,
    NotIn,
    Not,
    BitNot,
    Noop,
}

impl Operator {
    pub const ALL: [Operator; 33] = [
        Operator::And,
        Operator::Or,
        Operator::Concat,
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Eq,
        Operator::NotEq,
        Operator::Lt,
        Operator::LtEq,
        Operator::Gt,
        Operator::GtEq,
        Operator::Is,
        Operator::IsNot,
        Operator::BitAnd,
        Operator::BitOr,
        Operator::BitXor,
        Operator::ShiftLeft,
        Operator::ShiftRight,
        Operator::Regex,
        Operator::NotRegex,
        Operator::RegexCi,
        Operator::NotRegexCi,
        Operator::Like,
        Operator::NotLike,
        Operator::ILike,
        Operator::NotILike,
        Operator::In,
        Operator::NotIn,
        Operator::Not,
        Operator::BitNot,
        Operator::Noop,
    ];

    /// SQL spelling
    pub fn sql(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Concat => "||",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
            Operator::BitAnd => "&",
            Operator::BitOr => "|",
            Operator::BitXor => "^",
            Operator::ShiftLeft => "<<",
            Operator::ShiftRight => ">>",
            Operator::Regex => "~",
            Operator::NotRegex => "!~",
            Operator::RegexCi => "~*",
            Operator::NotRegexCi => "!~*",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::ILike => "ILIKE",
            Operator::NotILike => "NOT ILIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Not => "NOT",
            Operator::BitNot => "B~",
            Operator::Noop => "NOOP",
        }
    }

    pub fn class(&self) -> OperatorClass {
        match self {
            Operator::And
            | Operator::Or
            | Operator::Concat
            | Operator::Add
            | Operator::Subtract
            | Operator::Multiply
            | Operator::Divide => OperatorClass::Chained,
            Operator::Eq
            | Operator::NotEq
            | Operator::Lt
            | Operator::LtEq
            | Operator::Gt
            | Operator::GtEq
            | Operator::Is
            | Operator::IsNot
            | Operator::BitAnd
            | Operator::BitOr
            | Operator::BitXor
            | Operator::ShiftLeft
            | Operator::ShiftRight => OperatorClass::Binary,
            Operator::Regex | Operator::NotRegex | Operator::RegexCi | Operator::NotRegexCi => {
                OperatorClass::Regex
            }
            Operator::Like | Operator::NotLike | Operator::ILike | Operator::NotILike => {
                OperatorClass::Like
            }
            Operator::In | Operator::NotIn => OperatorClass::Membership,
            Operator::Not | Operator::BitNot => OperatorClass::Unary,
            Operator::Noop => OperatorClass::Passthrough,
        }
    }

    /// True for the negated pattern operators
    pub fn is_negated_match(&self) -> bool {
        matches!(
            self,
            Operator::NotRegex | Operator::NotRegexCi | Operator::NotLike | Operator::NotILike
        )
    }

    /// True for the case-insensitive pattern operators
    pub fn is_case_insensitive(&self) -> bool {
        matches!(
            self,
            Operator::RegexCi | Operator::NotRegexCi | Operator::ILike | Operator::NotILike
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

impl FromStr for Operator {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted == "<>" {
            return Ok(Operator::NotEq);
        }
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.sql().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CompileError::UnsupportedOperator(wanted.to_string()))
    }
}

impl TryFrom<String> for Operator {
    type Error = CompileError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.sql().to_string()
    }
}

/// Cast targets a caller may request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastType {
    String,
    Numeric,
    Integer,
    Float,
    Boolean,
    Date,
    Time,
    Blob,
}

impl CastType {
    pub fn name(&self) -> &'static str {
        match self {
            CastType::String => "String",
            CastType::Numeric => "Numeric",
            CastType::Integer => "Integer",
            CastType::Float => "Float",
            CastType::Boolean => "Boolean",
            CastType::Date => "Date",
            CastType::Time => "Time",
            CastType::Blob => "Blob",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, CastType::String)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CastType::Numeric | CastType::Integer | CastType::Float)
    }
}

impl fmt::Display for CastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
