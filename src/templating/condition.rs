//! Conditions for the `if` directive.
//!
//! The condition language is deliberately tiny and is parsed by splitting on
//! the *first occurrence* of an operator anywhere in the string, trying
//! operators in a fixed order:
//!
//! | Priority | Operator | Node |
//! |----------|----------|------|
//! | 1 | `&&` | [`Condition::And`] |
//! | 2 | `\|\|` | [`Condition::Or`] |
//! | 3 | `!==` | [`Comparison::NotEqual`] |
//! | 4 | `==` | [`Comparison::Equal`] |
//! | 5 | `>=`, then `>` | [`Comparison::GreaterOrEqual`], [`Comparison::Greater`] |
//! | 6 | leading `!` | [`Condition::Not`] |
//! | 7 | anything else | [`Condition::Truthy`] |
//!
//! So `a || b && c` is `(a || b) && c`, and a quoted literal containing an
//! operator is split like any other text. There is no grouping.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::Value;

use super::context::Scope;
use super::resolver::{Expression, to_display_string};
use crate::core::Result;

/// Comparison operators in search order.
const COMPARISONS: [(&str, Comparison); 4] = [
    ("!==", Comparison::NotEqual),
    ("==", Comparison::Equal),
    (">=", Comparison::GreaterOrEqual),
    (">", Comparison::Greater),
];

/// A parsed `if` condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
    Compare {
        op: Comparison,
        left: Expression,
        right: Expression,
    },
    Not(Box<Condition>),
    Truthy(Expression),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    NotEqual,
    Equal,
    GreaterOrEqual,
    Greater,
}

impl Condition {
    /// Parse a condition. Never fails: text with no operator is a truthiness test.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bowser_render::templating::{Comparison, Condition, Expression};
    ///
    /// let condition = Condition::parse("count > 0");
    /// assert_eq!(
    ///     condition,
    ///     Condition::Compare {
    ///         op: Comparison::Greater,
    ///         left: Expression::parse("count"),
    ///         right: Expression::parse("0"),
    ///     }
    /// );
    /// ```
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let source = source.trim();

        if let Some((left, right)) = source.split_once("&&") {
            return Self::And(Box::new(Self::parse(left)), Box::new(Self::parse(right)));
        }
        if let Some((left, right)) = source.split_once("||") {
            return Self::Or(Box::new(Self::parse(left)), Box::new(Self::parse(right)));
        }
        for (operator, op) in COMPARISONS {
            if let Some((left, right)) = source.split_once(operator) {
                return Self::Compare {
                    op,
                    left: Expression::parse(left.trim()),
                    right: Expression::parse(right.trim()),
                };
            }
        }
        if let Some(rest) = source.strip_prefix('!') {
            return Self::Not(Box::new(Self::parse(rest)));
        }
        Self::Truthy(Expression::parse(source))
    }

    /// Evaluate against a scope.
    ///
    /// # Errors
    ///
    /// Propagates resolution failures from any operand.
    pub fn evaluate(&self, scope: &Scope<'_>) -> Result<bool> {
        Ok(match self {
            Self::And(left, right) => left.evaluate(scope)? && right.evaluate(scope)?,
            Self::Or(left, right) => left.evaluate(scope)? || right.evaluate(scope)?,
            Self::Compare {
                op,
                left,
                right,
            } => {
                let left = left.resolve(scope)?;
                let right = right.resolve(scope)?;
                op.apply(left.as_deref(), right.as_deref())
            }
            Self::Not(inner) => !inner.evaluate(scope)?,
            Self::Truthy(expression) => is_truthy(expression.resolve(scope)?.as_deref()),
        })
    }
}

impl Comparison {
    /// Apply to two resolved operands; `None` is null.
    #[must_use]
    pub fn apply(self, left: Option<&Value>, right: Option<&Value>) -> bool {
        match self {
            Self::NotEqual => !strict_equals(left, right),
            Self::Equal => strict_equals(left, right),
            Self::GreaterOrEqual => compare(left, right).is_some_and(Ordering::is_ge),
            Self::Greater => compare(left, right).is_some_and(Ordering::is_gt),
        }
    }
}

/// Parse and evaluate a condition string in one step.
///
/// # Errors
///
/// Propagates resolution failures from any operand.
pub fn evaluate_boolean(source: &str, scope: &Scope<'_>) -> Result<bool> {
    Condition::parse(source).evaluate(scope)
}

/// Truthiness of a resolved value.
///
/// Null is false, arrays are true when non-empty, numbers when non-zero,
/// strings when non-empty, and objects always.
#[must_use]
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(_)) => true,
    }
}

/// Equality without type coercion. Numbers compare by value, so `1 == 1.0`.
fn strict_equals(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(Value::Number(a)), Some(Value::Number(b))) => match (a.as_i64(), b.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => a.as_f64() == b.as_f64(),
        },
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Ordering for `>` and `>=`: strings lexicographically, everything else numerically.
///
/// Arrays first become their comma-joined text, so `[5]` orders as `"5"`
/// against a string and as `5` against a number.
fn compare(left: Option<&Value>, right: Option<&Value>) -> Option<Ordering> {
    let (left, right) = (to_primitive(left), to_primitive(right));
    if let (Some(Value::String(a)), Some(Value::String(b))) = (left.as_deref(), right.as_deref()) {
        return Some(a.cmp(b));
    }
    to_number(left.as_deref()).partial_cmp(&to_number(right.as_deref()))
}

fn to_primitive(value: Option<&Value>) -> Option<Cow<'_, Value>> {
    match value {
        Some(Value::Array(_)) => value.map(|v| Cow::Owned(Value::String(to_display_string(v)))),
        other => other.map(Cow::Borrowed),
    }
}

/// Null and absent values count as zero.
fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) if s.trim().is_empty() => 0.0,
        Some(Value::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
        Some(Value::Array(_) | Value::Object(_)) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BowserError;
    use crate::templating::Context;
    use serde_json::json;

    fn eval(source: &str, context: serde_json::Value) -> bool {
        let context = Context::from_value(context).unwrap();
        evaluate_boolean(source, &Scope::root(&context)).unwrap()
    }

    #[test]
    fn test_parse_uses_first_occurrence_in_priority_order() {
        // `&&` wins over `||` wherever it appears
        assert_eq!(
            Condition::parse("a || b && c"),
            Condition::And(
                Box::new(Condition::Or(
                    Box::new(Condition::Truthy(Expression::parse("a"))),
                    Box::new(Condition::Truthy(Expression::parse("b"))),
                )),
                Box::new(Condition::Truthy(Expression::parse("c"))),
            )
        );

        // `!==` is tried before `==`
        assert!(matches!(
            Condition::parse("a !== b"),
            Condition::Compare {
                op: Comparison::NotEqual,
                ..
            }
        ));

        // `>=` before `>`
        assert!(matches!(
            Condition::parse("a >= 1"),
            Condition::Compare {
                op: Comparison::GreaterOrEqual,
                ..
            }
        ));
    }

    #[test]
    fn test_operands_are_trimmed() {
        assert_eq!(
            Condition::parse("  count   >   0 "),
            Condition::Compare {
                op: Comparison::Greater,
                left: Expression::parse("count"),
                right: Expression::parse("0"),
            }
        );
    }

    #[test]
    fn test_or_with_equality_and_greater() {
        assert!(eval("a == 'x' || b > 1", json!({ "a": "x", "b": 0 })));
        assert!(!eval("a == 'y' || b > 1", json!({ "a": "x", "b": 0 })));
    }

    #[test]
    fn test_and() {
        assert!(eval("a && b", json!({ "a": true, "b": 1 })));
        assert!(!eval("a && b", json!({ "a": true, "b": 0 })));
    }

    #[test]
    fn test_strict_equality() {
        assert!(eval("n == 1", json!({ "n": 1 })));
        assert!(eval("n == 1", json!({ "n": 1.0 })));
        assert!(!eval("n == '1'", json!({ "n": 1 })));
        assert!(eval("n !== '1'", json!({ "n": 1 })));
        assert!(eval("missing == other", json!({})));
        assert!(eval("missing == nothing", json!({ "nothing": null })));
        assert!(!eval("name == missing", json!({ "name": "" })));
    }

    #[test]
    fn test_ordering() {
        assert!(eval("count > 0", json!({ "count": 5 })));
        assert!(!eval("count > 0", json!({ "count": 0 })));
        assert!(eval("count >= 0", json!({ "count": 0 })));
        assert!(eval("word > 'apple'", json!({ "word": "banana" })));
        assert!(eval("text > 2", json!({ "text": "10" })));
        assert!(!eval("obj > 0", json!({ "obj": { "a": 1 } })));
    }

    #[test]
    fn test_ordering_treats_null_and_absent_as_zero() {
        assert!(!eval("missing > 0", json!({})));
        assert!(eval("missing >= 0", json!({})));
        assert!(eval("n >= 0", json!({ "n": null })));
        assert!(eval("1 > missing", json!({})));
    }

    #[test]
    fn test_ordering_converts_arrays_like_text() {
        assert!(eval("xs >= 0", json!({ "xs": [] })));
        assert!(!eval("xs > 0", json!({ "xs": [] })));
        assert!(eval("xs > 4", json!({ "xs": [5] })));
        assert!(!eval("xs > 0", json!({ "xs": [1, 2] })));
        assert!(!eval("xs >= 0", json!({ "xs": [1, 2] })));
        // Both sides become text, so this is lexicographic
        assert!(!eval("xs > ys", json!({ "xs": [10], "ys": [9] })));
    }

    #[test]
    fn test_not_and_truthiness() {
        assert!(eval("!missing", json!({})));
        assert!(!eval("!name", json!({ "name": "Ann" })));
        assert!(!eval("items", json!({ "items": [] })));
        assert!(eval("items", json!({ "items": [0] })));
        assert!(eval("obj", json!({ "obj": {} })));
        assert!(!eval("''", json!({})));
        assert!(eval("'x'", json!({})));
        assert!(!eval("0", json!({})));
    }

    #[test]
    fn test_resolution_failure_propagates() {
        let context = Context::new();
        let err = evaluate_boolean("user.name == 'x'", &Scope::root(&context)).unwrap_err();
        assert!(matches!(err, BowserError::ResolutionFailed { .. }));
    }

    #[test]
    fn test_operator_inside_literal_still_splits() {
        // Known limitation: quotes do not protect operators
        assert!(matches!(Condition::parse("a == 'x&&y'"), Condition::And(..)));
    }
}
