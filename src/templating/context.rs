//! Render context and variable scopes.
//!
//! A [`Context`] is the caller-supplied mapping of variable names to JSON
//! values. It is never mutated by a render. Loop variables live in [`Scope`]
//! frames layered over the context: each iteration gets a child scope that
//! binds one name, and dropping that scope is all it takes to "restore" the
//! outer binding.

use serde_json::{Map, Value};

use super::utils::deep_merge_json;
use crate::core::{BowserError, Result};

/// Variables available to a template.
///
/// # Examples
///
/// ```rust
/// use bowser_render::templating::Context;
/// use serde_json::json;
///
/// let mut context = Context::new();
/// context.insert("name", "Ann");
/// context.insert("items", json!([10, 20, 30]));
///
/// assert_eq!(context.get("name"), Some(&json!("Ann")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    variables: Map<String, Value>,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`BowserError::InvalidContext`] for any non-object value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(variables) => Ok(Self {
                variables,
            }),
            other => Err(BowserError::InvalidContext {
                reason: format!("expected a JSON object, found {}", json_type_name(&other)),
            }),
        }
    }

    /// Parse a context from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`BowserError::JsonError`] for malformed JSON and
    /// [`BowserError::InvalidContext`] when the document is not an object.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.variables.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.variables.remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Deep-merge `overrides` (a JSON object) into this context.
    ///
    /// # Errors
    ///
    /// Returns [`BowserError::InvalidContext`] if `overrides` is not an object.
    pub fn merge(&mut self, overrides: &Value) -> Result<()> {
        if !overrides.is_object() {
            return Err(BowserError::InvalidContext {
                reason: format!("cannot merge {} into a context", json_type_name(overrides)),
            });
        }
        let base = Value::Object(std::mem::take(&mut self.variables));
        if let Value::Object(merged) = deep_merge_json(base, overrides) {
            self.variables = merged;
        }
        Ok(())
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.variables)
    }
}

impl From<Map<String, Value>> for Context {
    fn from(variables: Map<String, Value>) -> Self {
        Self {
            variables,
        }
    }
}

impl TryFrom<Value> for Context {
    type Error = BowserError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

/// A lookup frame: the root context, or one binding layered over a parent scope.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    frame: Frame<'a>,
}

#[derive(Debug, Clone, Copy)]
enum Frame<'a> {
    Root(&'a Context),
    Binding {
        name: &'a str,
        value: &'a Value,
        parent: &'a Scope<'a>,
    },
}

impl<'a> Scope<'a> {
    #[must_use]
    pub const fn root(context: &'a Context) -> Self {
        Self {
            frame: Frame::Root(context),
        }
    }

    /// A child scope where `name` resolves to `value`, shadowing any outer binding.
    #[must_use]
    pub fn bind<'b>(&'b self, name: &'b str, value: &'b Value) -> Scope<'b> {
        Scope {
            frame: Frame::Binding {
                name,
                value,
                parent: self,
            },
        }
    }

    /// Look up a top-level name, innermost binding first.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&'a Value> {
        let mut scope = self;
        loop {
            match scope.frame {
                Frame::Root(context) => return context.get(name),
                Frame::Binding {
                    name: bound,
                    value,
                    parent,
                } => {
                    if bound == name {
                        return Some(value);
                    }
                    scope = parent;
                }
            }
        }
    }

    /// Every name visible from this scope, innermost bindings first, without duplicates.
    #[must_use]
    pub fn names(&self) -> Vec<&'a str> {
        let mut names: Vec<&'a str> = Vec::new();
        let mut scope = self;
        loop {
            match scope.frame {
                Frame::Root(context) => {
                    for name in context.names() {
                        if !names.contains(&name) {
                            names.push(name);
                        }
                    }
                    return names;
                }
                Frame::Binding {
                    name,
                    parent,
                    ..
                } => {
                    if !names.contains(&name) {
                        names.push(name);
                    }
                    scope = parent;
                }
            }
        }
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
