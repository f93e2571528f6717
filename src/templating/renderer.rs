//! The tree-walking renderer.
//!
//! [`Renderer`] turns a [`Template`] plus a [`Context`] into output nodes.
//! It keeps no state between calls, so one renderer can be shared freely.

use serde_json::Value;
use tracing::{debug, trace};

use super::condition::is_truthy;
use super::context::{Context, Scope};
use super::template::{Directives, LoopDirective, Template, TemplateElement, TemplateNode};
use crate::core::{BowserError, Result};
use crate::dom::{Attribute, Element, Node};

/// Template renderer.
///
/// # Examples
///
/// ```rust
/// use bowser_render::dom::{parse_fragment, to_html};
/// use bowser_render::templating::{Context, Renderer};
/// use serde_json::json;
///
/// let template = parse_fragment(r#"<li loop="n in numbers">$$(n)</li>"#)?;
/// let context = Context::from_value(json!({ "numbers": [1, 2] }))?;
///
/// let output = Renderer::new().render(&template, &context)?;
/// assert_eq!(to_html(&output, false), "<li>1</li><li>2</li>");
/// # Ok::<(), bowser_render::core::BowserError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    directives: Directives,
}

impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A renderer that recognizes custom directive attribute names.
    #[must_use]
    pub const fn with_directives(directives: Directives) -> Self {
        Self {
            directives,
        }
    }

    #[must_use]
    pub const fn directives(&self) -> &Directives {
        &self.directives
    }

    /// Preprocess and render a parsed markup fragment.
    ///
    /// # Errors
    ///
    /// Returns the first [`crate::core::BowserError`] raised anywhere in the
    /// tree; no partial output is returned.
    pub fn render(&self, template: &[Node], context: &Context) -> Result<Vec<Node>> {
        let template = Template::compile_with(template, &self.directives);
        self.render_template(&template, context)
    }

    /// Render an already preprocessed template.
    ///
    /// # Errors
    ///
    /// Returns the first resolution failure or malformed loop reached while
    /// rendering. Loops inside excluded branches or empty iterations are
    /// never reached.
    pub fn render_template(&self, template: &Template, context: &Context) -> Result<Vec<Node>> {
        let scope = Scope::root(context);
        let mut output = Vec::new();
        for node in template.nodes() {
            self.render_node(node, &mut output, &scope)?;
        }
        Ok(output)
    }

    /// Render one node, appending zero or more nodes to `output`.
    ///
    /// # Errors
    ///
    /// Propagates resolution failures from the node or its descendants.
    pub fn render_node(
        &self,
        node: &TemplateNode,
        output: &mut Vec<Node>,
        scope: &Scope<'_>,
    ) -> Result<()> {
        match node {
            TemplateNode::Comment => {}
            TemplateNode::Text(text) => output.push(Node::Text(text.apply(scope)?)),
            TemplateNode::Loop {
                source,
                directive,
                body,
            } => {
                let directive = directive.as_ref().ok_or_else(|| BowserError::InvalidLoopDirective {
                    directive: source.clone(),
                })?;
                self.expand_loop(directive, body, output, scope)?;
            }
            TemplateNode::Conditional {
                condition,
                element,
            } => {
                let included = condition.evaluate(scope)?;
                trace!(tag = %element.tag, ?condition, included, "Evaluated condition");
                if included {
                    self.render_element(element, output, scope)?;
                }
            }
            TemplateNode::Plain(element) => self.render_element(element, output, scope)?,
        }
        Ok(())
    }

    fn render_element(
        &self,
        element: &TemplateElement,
        output: &mut Vec<Node>,
        scope: &Scope<'_>,
    ) -> Result<()> {
        let mut rendered = Element::new(element.tag.clone());

        for attribute in &element.attributes {
            rendered.attributes.push(Attribute {
                name: attribute.name.clone(),
                value: attribute.value.as_ref().map(|v| v.apply(scope)).transpose()?,
            });
        }

        for child in &element.children {
            self.render_node(child, &mut rendered.children, scope)?;
        }

        output.push(Node::Element(rendered));
        Ok(())
    }

    /// Render `body` once per element of the loop's collection.
    ///
    /// Each iteration renders in a child scope binding the loop variable, so
    /// the enclosing scope is unchanged afterwards on every exit path.
    ///
    /// A null collection renders nothing. A non-array value renders once with
    /// the value itself bound, unless it is `false`, `0` or `""`.
    ///
    /// # Errors
    ///
    /// Propagates resolution failures from the collection or the body.
    pub fn expand_loop(
        &self,
        directive: &LoopDirective,
        body: &TemplateNode,
        output: &mut Vec<Node>,
        scope: &Scope<'_>,
    ) -> Result<()> {
        let Some(collection) = directive.collection.resolve(scope)? else {
            debug!(collection = %directive.collection, "Loop collection is null, skipping");
            return Ok(());
        };

        match collection.as_ref() {
            Value::Array(items) => {
                debug!(
                    variable = %directive.variable,
                    collection = %directive.collection,
                    count = items.len(),
                    "Expanding loop"
                );
                for item in items {
                    let inner = scope.bind(&directive.variable, item);
                    self.render_node(body, output, &inner)?;
                }
            }
            value if is_truthy(Some(value)) => {
                let inner = scope.bind(&directive.variable, value);
                self.render_node(body, output, &inner)?;
            }
            _ => {}
        }
        Ok(())
    }
}
