//! Predicate lowering
//!
//! One rule per operator class. Every rule that builds a compound
//! expression returns a single parenthesized group, so fragments compose
//! without a precedence table.

use crate::ast::{CaseExpr, CastType, Expr, Literal, Operator, OperatorClass};

use super::errors::{CompileError, CompileResult};
use super::fragment::Fragment;
use super::render::Compiler;

impl Compiler<'_> {
    pub(super) fn complex(&self, op: Operator, args: &[Expr]) -> CompileResult<Fragment> {
        match op.class() {
            OperatorClass::Chained => {
                if args.is_empty() {
                    return Err(arity(op, "at least 1", 0));
                }
                let parts = args
                    .iter()
                    .map(|arg| self.render(arg).map(Fragment::into_string))
                    .collect::<CompileResult<Vec<_>>>()?;
                let separator = format!(" {} ", script_symbol(op));
                Ok(Fragment::group(parts.join(&separator)))
            }
            OperatorClass::Binary => {
                let [lhs, rhs] = two(op, args)?;
                Ok(Fragment::group(format!(
                    "{} {} {}",
                    self.render(lhs)?,
                    script_symbol(op),
                    self.render(rhs)?
                )))
            }
            OperatorClass::Regex => {
                let [subject, pattern] = two(op, args)?;
                let body = escape_literal_body(string_pattern(op, pattern)?);
                self.pattern_match(op, subject, &body)
            }
            OperatorClass::Like => {
                let [subject, pattern] = two(op, args)?;
                let body = like_to_regex(string_pattern(op, pattern)?);
                self.pattern_match(op, subject, &body)
            }
            OperatorClass::Membership => {
                let [needle, haystack] = two(op, args)?;
                let found = if op == Operator::In { "!=" } else { "==" };
                Ok(Fragment::group(format!(
                    "{}.indexOf({}) {} -1",
                    self.render(haystack)?.receiver(),
                    self.render(needle)?,
                    found
                )))
            }
            OperatorClass::Unary => {
                let [operand] = one(op, args)?;
                Ok(Fragment::loose(format!(
                    "{}{}",
                    script_symbol(op),
                    self.render(operand)?
                )))
            }
            OperatorClass::Passthrough => {
                let [operand] = one(op, args)?;
                self.render(operand)
            }
        }
    }

    fn pattern_match(&self, op: Operator, subject: &Expr, body: &str) -> CompileResult<Fragment> {
        let negate = if op.is_negated_match() { "!" } else { "" };
        let flags = if op.is_case_insensitive() { "i" } else { "" };
        Ok(Fragment::group(format!(
            "{}{}.match(/{}/{})",
            negate,
            self.render(subject)?.receiver(),
            body,
            flags
        )))
    }

    /// Nested ternaries, first condition outermost
    pub(super) fn case(&self, case: &CaseExpr) -> CompileResult<Fragment> {
        let subject = case
            .subject
            .as_deref()
            .map(|s| self.render(s))
            .transpose()?;

        let mut otherwise = self.render(&case.default)?;
        for (condition, result) in case.conditions.iter().rev() {
            let test = match &subject {
                Some(subject) => Fragment::group(format!("{} == {}", subject, self.render(condition)?)),
                None => self.render(condition)?,
            };
            otherwise = Fragment::group(format!(
                "{} ? {} : {}",
                test,
                self.render(result)?,
                otherwise
            ));
        }
        Ok(otherwise)
    }

    /// Casts coerce through an identity operation of the target type
    pub(super) fn cast(&self, expr: &Expr, target: CastType) -> CompileResult<Fragment> {
        if target.is_text() {
            Ok(Fragment::group(format!("{} + ''", self.render(expr)?)))
        } else if target.is_numeric() {
            Ok(Fragment::group(format!("{} - 0", self.render(expr)?)))
        } else {
            Err(CompileError::UnsupportedCastType(target))
        }
    }
}

/// Script spelling of an operator
fn script_symbol(op: Operator) -> &'static str {
    match op {
        Operator::And => "&&",
        Operator::Or => "||",
        Operator::Concat => "+",
        Operator::Add => "+",
        Operator::Subtract => "-",
        Operator::Multiply => "*",
        Operator::Divide => "/",
        Operator::Eq => "==",
        Operator::NotEq => "!=",
        Operator::Lt => "<",
        Operator::LtEq => "<=",
        Operator::Gt => ">",
        Operator::GtEq => ">=",
        Operator::Is => "==",
        Operator::IsNot => "!=",
        Operator::BitAnd => "&",
        Operator::BitOr => "|",
        Operator::BitXor => "^",
        Operator::ShiftLeft => "<<",
        Operator::ShiftRight => ">>",
        Operator::Not => "!",
        Operator::BitNot => "~",
        // Lowered by their own rules, never spelled infix
        Operator::Regex
        | Operator::NotRegex
        | Operator::RegexCi
        | Operator::NotRegexCi
        | Operator::Like
        | Operator::NotLike
        | Operator::ILike
        | Operator::NotILike
        | Operator::In
        | Operator::NotIn
        | Operator::Noop => op.sql(),
    }
}

/// Translates a LIKE pattern into an anchored regex body.
///
/// Metacharacters are escaped first, so only `%` and `_` act as wildcards.
pub fn like_to_regex(pattern: &str) -> String {
    let escaped = escape_literal_body(&regex::escape(pattern));
    format!("^{}$", escaped.replace('%', ".*").replace('_', "."))
}

/// Makes a pattern safe inside a `/.../` literal: the delimiter and line
/// terminators cannot appear raw.
fn escape_literal_body(pattern: &str) -> String {
    let mut body = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '/' => body.push_str("\\/"),
            '\n' => body.push_str("\\n"),
            '\r' => body.push_str("\\r"),
            '\u{2028}' => body.push_str("\\u2028"),
            '\u{2029}' => body.push_str("\\u2029"),
            _ => body.push(c),
        }
    }
    body
}

fn string_pattern(op: Operator, expr: &Expr) -> CompileResult<&str> {
    match expr {
        Expr::Literal(Literal::String(pattern)) => Ok(pattern),
        _ => Err(CompileError::UnsupportedPattern(op)),
    }
}

fn one(op: Operator, args: &[Expr]) -> CompileResult<&[Expr; 1]> {
    args.try_into().map_err(|_| arity(op, "1", args.len()))
}

fn two(op: Operator, args: &[Expr]) -> CompileResult<&[Expr; 2]> {
    args.try_into().map_err(|_| arity(op, "2", args.len()))
}

fn arity(op: Operator, expected: &'static str, actual: usize) -> CompileError {
    CompileError::InvalidArity {
        op,
        expected,
        actual,
    }
}
