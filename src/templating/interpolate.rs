//! `$$( … )` interpolation in text and attribute values.
//!
//! The scanner tracks parenthesis depth inside a marker, so
//! `$$(f(1,2))` closes at the final `)` and the expression is `f(1,2)`. An
//! unterminated marker swallows the rest of the input without error.
//! Whitespace around the marker body is trimmed, so `$$( name )` reads `name`.

use super::context::Scope;
use super::resolver::Expression;
use crate::core::Result;

const MARKER_START: &str = "$$(";

/// One piece of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(String),
    Expression(Expression),
}

/// A string split into literal text and embedded expressions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpolation {
    segments: Vec<Segment>,
}

impl Interpolation {
    /// Scan `text` for markers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bowser_render::templating::{Expression, Interpolation, Segment};
    ///
    /// let interpolation = Interpolation::parse("Hi $$(user.name)!");
    /// assert_eq!(
    ///     interpolation.segments(),
    ///     &[
    ///         Segment::Literal("Hi ".to_string()),
    ///         Segment::Expression(Expression::parse("user.name")),
    ///         Segment::Literal("!".to_string()),
    ///     ]
    /// );
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = text;

        while let Some(start) = rest.find(MARKER_START) {
            literal.push_str(&rest[..start]);
            let body = &rest[start + MARKER_START.len()..];

            let mut depth = 1;
            let close = body.char_indices().find_map(|(i, c)| {
                match c {
                    '(' => depth += 1,
                    ')' => depth -= 1,
                    _ => return None,
                }
                (depth == 0).then_some(i)
            });

            let Some(close) = close else {
                // Unterminated marker: the tail is dropped
                rest = "";
                break;
            };

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Expression(Expression::parse(body[..close].trim())));
            rest = &body[close + 1..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            segments,
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of embedded expressions.
    #[must_use]
    pub fn expression_count(&self) -> usize {
        self.segments.iter().filter(|s| matches!(s, Segment::Expression(_))).count()
    }

    /// Render against a scope, replacing each expression with its text (null as `""`).
    ///
    /// # Errors
    ///
    /// Propagates resolution failures.
    pub fn apply(&self, scope: &Scope<'_>) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Expression(expression) => out.push_str(&expression.evaluate(scope)?),
            }
        }
        Ok(out)
    }
}

/// Interpolate `text` in one step.
///
/// # Errors
///
/// Propagates resolution failures.
pub fn apply(text: &str, scope: &Scope<'_>) -> Result<String> {
    if text.is_empty() {
        return Ok(String::new());
    }
    Interpolation::parse(text).apply(scope)
}
