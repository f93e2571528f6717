//! Expression resolution.
//!
//! An expression is one of three things, checked in this order:
//!
//! 1. `'text'` - a string literal; the quotes are stripped, nothing is escaped
//! 2. anything starting with a digit - an integer made of the leading digits (`12px` is 12)
//! 3. a dotted path such as `user.address.city`
//!
//! Paths start at the innermost scope and walk one segment at a time. A
//! missing top-level name is simply null, but walking *into* a null value is a
//! [`BowserError::ResolutionFailed`]: that nearly always means the template and
//! the context disagree, and the author should hear about it.

use std::borrow::Cow;
use std::fmt;

use serde_json::{Number, Value};
use strsim::levenshtein;
use tracing::error;

use super::context::Scope;
use crate::core::{BowserError, Result};

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `'...'`
    Literal(String),
    /// Leading decimal digits
    Integer(Number),
    /// Dot-separated lookup segments
    Path(Vec<String>),
}

impl Expression {
    /// Classify an expression string. Never fails; anything that is not a
    /// literal is a path.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        if source.len() >= 2 && source.starts_with('\'') && source.ends_with('\'') {
            return Self::Literal(source[1..source.len() - 1].to_string());
        }

        if source.starts_with(|c: char| c.is_ascii_digit()) {
            let end = source.find(|c: char| !c.is_ascii_digit()).unwrap_or(source.len());
            return Self::Integer(parse_digits(&source[..end]));
        }

        Self::Path(source.split('.').map(str::to_string).collect())
    }

    /// Resolve against `scope`. `Ok(None)` means null (absent or JSON `null`).
    ///
    /// # Errors
    ///
    /// Returns [`BowserError::ResolutionFailed`] when a path segment is looked up
    /// on a null value. The failure is logged with the expression before it is
    /// returned.
    pub fn resolve<'a>(&self, scope: &Scope<'a>) -> Result<Option<Cow<'a, Value>>> {
        let segments = match self {
            Self::Literal(text) => return Ok(Some(Cow::Owned(Value::String(text.clone())))),
            Self::Integer(number) => return Ok(Some(Cow::Owned(Value::Number(number.clone())))),
            Self::Path(segments) => segments,
        };

        let mut reference: Option<Cow<'a, Value>> = None;
        for (i, segment) in segments.iter().enumerate() {
            if i == 0 {
                reference = scope.lookup(segment).map(Cow::Borrowed);
                continue;
            }

            let current = match reference.take() {
                Some(value) if !value.is_null() => value,
                _ => return Err(self.resolution_failure(&segments[i - 1], i == 1, scope)),
            };
            reference = match current {
                Cow::Borrowed(value) => member(value, segment),
                Cow::Owned(value) => member(&value, segment).map(|v| Cow::Owned(v.into_owned())),
            };
        }

        Ok(reference.filter(|value| !value.is_null()))
    }

    /// Resolve and stringify; null becomes the empty string.
    ///
    /// # Errors
    ///
    /// Propagates [`BowserError::ResolutionFailed`] from [`Expression::resolve`].
    pub fn evaluate(&self, scope: &Scope<'_>) -> Result<String> {
        Ok(self.resolve(scope)?.map(|value| to_display_string(&value)).unwrap_or_default())
    }

    fn resolution_failure(&self, segment: &str, top_level: bool, scope: &Scope<'_>) -> BowserError {
        error!(expression = %self, segment, "Problem resolving expression");

        let suggestions = if top_level {
            find_similar_names(segment, &scope.names())
        } else {
            Vec::new()
        };
        BowserError::ResolutionFailed {
            expression: self.to_string(),
            segment: segment.to_string(),
            suggestions,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "'{text}'"),
            Self::Integer(number) => write!(f, "{number}"),
            Self::Path(segments) => write!(f, "{}", segments.join(".")),
        }
    }
}

/// Resolve an expression string against a scope.
///
/// # Errors
///
/// See [`Expression::resolve`].
pub fn resolve<'a>(expression: &str, scope: &Scope<'a>) -> Result<Option<Cow<'a, Value>>> {
    Expression::parse(expression).resolve(scope)
}

/// Resolve an expression string and render it as text, with null as `""`.
///
/// # Errors
///
/// See [`Expression::resolve`].
pub fn evaluate(expression: &str, scope: &Scope<'_>) -> Result<String> {
    Expression::parse(expression).evaluate(scope)
}

/// Text form of a value as it appears in rendered output.
///
/// Strings are written raw, integral numbers without a fractional part,
/// arrays as their comma-joined elements, and objects as compact JSON.
#[must_use]
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(number) => format_number(number),
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(to_display_string).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn format_number(number: &Number) -> String {
    match number.as_f64() {
        Some(f) if number.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => number.to_string(),
    }
}

fn parse_digits(digits: &str) -> Number {
    if let Ok(n) = digits.parse::<i64>() {
        return Number::from(n);
    }
    // Too long for i64; keep the magnitude like a float would
    digits
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .unwrap_or_else(|| Number::from(i64::MAX))
}

/// Look up one path segment on a non-null value.
fn member<'v>(value: &'v Value, segment: &str) -> Option<Cow<'v, Value>> {
    match value {
        Value::Object(map) => map.get(segment).map(Cow::Borrowed),
        Value::Array(items) if segment == "length" => Some(Cow::Owned(Value::from(items.len()))),
        Value::Array(items) => {
            segment.parse::<usize>().ok().and_then(|i| items.get(i)).map(Cow::Borrowed)
        }
        Value::String(text) if segment == "length" => {
            Some(Cow::Owned(Value::from(text.chars().count())))
        }
        _ => None,
    }
}

/// Find similar names using Levenshtein distance
fn find_similar_names(target: &str, available: &[&str]) -> Vec<String> {
    let mut scored: Vec<_> = available.iter().map(|name| (*name, levenshtein(target, name))).collect();

    scored.sort_by_key(|(_, dist)| *dist);

    scored
        .into_iter()
        .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .take(3)
        .map(|(name, _)| name.to_string())
        .collect()
}
