//! Utility functions for the templating system.

use serde_json::Value;

/// Perform a deep merge of two JSON values.
///
/// Recursively merges `overrides` into `base`. For objects, fields from `overrides`
/// are added or replace fields in `base`. For arrays and primitives, `overrides`
/// completely replaces `base`.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use bowser_render::templating::deep_merge_json;
///
/// let base = json!({ "user": { "name": "Ann", "role": "admin" } });
/// let overrides = json!({ "user": { "role": "editor" }, "title": "Home" });
///
/// let result = deep_merge_json(base, &overrides);
/// assert_eq!(result, json!({ "user": { "name": "Ann", "role": "editor" }, "title": "Home" }));
/// ```
pub fn deep_merge_json(mut base: Value, overrides: &Value) -> Value {
    match (base.as_object_mut(), overrides.as_object()) {
        (Some(base_obj), Some(override_obj)) => {
            for (key, override_value) in override_obj {
                match base_obj.get_mut(key) {
                    Some(base_value) if base_value.is_object() && override_value.is_object() => {
                        let merged = deep_merge_json(base_value.take(), override_value);
                        *base_value = merged;
                    }
                    _ => {
                        base_obj.insert(key.clone(), override_value.clone());
                    }
                }
            }
            base
        }
        // A non-object on either side: the override wins outright
        _ => overrides.clone(),
    }
}

/// Parse a command-line `name=value` assignment.
///
/// The value is read as JSON when it parses (`count=3`, `tags=["a","b"]`,
/// `flag=true`) and kept as a plain string otherwise (`name=Ann`).
///
/// Returns `None` when there is no `=` or the name is empty.
pub fn parse_assignment(assignment: &str) -> Option<(String, Value)> {
    let (name, raw) = assignment.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value =
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Some((name.to_string(), value))
}
