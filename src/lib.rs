//! bowser-render - attribute-directive HTML templating
//!
//! Templates are plain HTML fragments annotated with two attribute directives
//! and an interpolation marker:
//!
//! ```html
//! <ul if="items.length > 0">
//!   <li loop="item in items" class="$$(item.kind)">$$(item.name)</li>
//! </ul>
//! ```
//!
//! Rendering a template against a JSON [`templating::Context`] produces a new
//! node tree; neither the template nor the context is modified.
//!
//! # Modules
//!
//! - [`dom`] - markup nodes, the fragment parser and the HTML serializer
//! - [`templating`] - expressions, conditions, interpolation, preprocessing and rendering
//! - [`core`] - error types and user-facing error formatting
//! - [`config`] - `bowser.toml` settings
//! - [`cli`] - the `bowser-render` command-line front end
//! - [`utils`] - async file helpers used by the CLI
//!
//! # Example
//!
//! ```rust
//! use bowser_render::dom::{parse_fragment, to_html};
//! use bowser_render::templating::Context;
//! use serde_json::json;
//!
//! let template = parse_fragment(r#"<p if="user">Hello, $$(user.name)!</p>"#)?;
//! let context = Context::from_value(json!({ "user": { "name": "Ann" } }))?;
//!
//! let output = bowser_render::render(&template, &context)?;
//! assert_eq!(to_html(&output, false), "<p>Hello, Ann!</p>");
//! # Ok::<(), bowser_render::core::BowserError>(())
//! ```
//!
//! # Expressions
//!
//! | Form | Meaning |
//! |------|---------|
//! | `'text'` | string literal |
//! | `42` | integer literal (leading digits only) |
//! | `a.b.c` | path lookup; arrays support indices and `length` |
//!
//! A missing top-level name renders as the empty string, but looking up a
//! member of a null value is an error.
//!
//! # Conditions
//!
//! `&&`, `||`, `!==`, `==`, `>=`, `>` and a leading `!`, without parentheses.
//! See [`templating::Condition`] for how operators are split.

pub mod cli;
pub mod config;
pub mod core;
pub mod dom;
pub mod templating;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use templating::render;
