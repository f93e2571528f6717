//! Attribute-directive templating over parsed markup.
//!
//! Templates are ordinary markup fragments. Three constructs are recognized:
//!
//! - `$$(expr)` markers in text and attribute values are replaced with the
//!   value of `expr`
//! - an `if="condition"` attribute keeps its element only when the condition
//!   holds
//! - a `loop="item in collection"` attribute repeats its element once per
//!   element of `collection`, with `item` bound in each copy
//!
//! # Pipeline
//!
//! 1. [`Template::compile`] preprocesses a parsed tree into [`TemplateNode`]s,
//!    consuming directive attributes and parsing every condition, loop and
//!    interpolation. A malformed loop is kept as written and only fails
//!    when rendering reaches it; [`Template::validate`] finds it up front.
//! 2. [`Renderer`] walks the compiled tree against a [`Context`], binding loop
//!    variables in child [`Scope`]s.
//!
//! Both stages only read their inputs, so a template can be rendered any number
//! of times, including after a failed render.
//!
//! # Examples
//!
//! ```rust
//! use bowser_render::dom::{parse_fragment, to_html};
//! use bowser_render::templating::{Context, render};
//! use serde_json::json;
//!
//! let template = parse_fragment(
//!     r#"<ul if="items.length > 0"><li loop="item in items">$$(item.name)</li></ul>"#,
//! )?;
//! let context = Context::from_value(json!({
//!     "items": [{ "name": "tea" }, { "name": "milk" }],
//! }))?;
//!
//! let output = render(&template, &context)?;
//! assert_eq!(to_html(&output, false), "<ul><li>tea</li><li>milk</li></ul>");
//! # Ok::<(), bowser_render::core::BowserError>(())
//! ```

mod condition;
mod context;
mod interpolate;
mod renderer;
mod resolver;
mod template;
mod utils;

pub use condition::{Comparison, Condition, evaluate_boolean, is_truthy};
pub use context::{Context, Scope};
pub use interpolate::{Interpolation, Segment, apply as interpolate};
pub use renderer::Renderer;
pub use resolver::{Expression, evaluate, resolve, to_display_string};
pub use template::{
    Directives, LoopDirective, Template, TemplateAttribute, TemplateElement, TemplateNode,
    TemplateStats,
};
pub use utils::{deep_merge_json, parse_assignment};

use crate::core::Result;
use crate::dom::Node;

/// Render `template` against `context` with the default directive names.
///
/// # Errors
///
/// Returns [`crate::core::BowserError::InvalidLoopDirective`] for a malformed
/// loop and [`crate::core::BowserError::ResolutionFailed`] when an expression
/// walks into a null value.
pub fn render(template: &[Node], context: &Context) -> Result<Vec<Node>> {
    Renderer::new().render(template, context)
}
