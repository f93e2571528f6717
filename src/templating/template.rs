//! Template preprocessing.
//!
//! [`Template::compile`] walks a parsed markup tree once and turns it into
//! tagged [`TemplateNode`] variants. Directive attributes are consumed here,
//! conditions and interpolations are parsed here, and the caller's tree is
//! only ever read. The renderer then dispatches with a plain `match`.
//!
//! A malformed loop directive does not fail compilation. The node keeps the
//! directive text and the renderer raises the error only if the node is
//! actually reached. [`Template::validate`] reports such loops up front.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::condition::Condition;
use super::interpolate::Interpolation;
use super::resolver::Expression;
use crate::core::{BowserError, Result};
use crate::dom::{Element, Node};

/// Attribute names that act as directives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Directives {
    /// Conditional directive, `if` by default
    pub condition: String,
    /// Loop directive, `loop` by default
    pub repeat: String,
}

impl Default for Directives {
    fn default() -> Self {
        Self {
            condition: "if".to_string(),
            repeat: "loop".to_string(),
        }
    }
}

/// A `loop="<variable> in <collection>"` directive.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopDirective {
    pub variable: String,
    pub collection: Expression,
}

impl LoopDirective {
    /// Parse the directive text.
    ///
    /// The text is split on single spaces and must be exactly
    /// `<variable> in <collection>`.
    ///
    /// # Errors
    ///
    /// Returns [`BowserError::InvalidLoopDirective`] for any other shape.
    pub fn parse(directive: &str) -> Result<Self> {
        let tokens: Vec<&str> = directive.split(' ').collect();
        match tokens.as_slice() {
            [variable, "in", collection] => Ok(Self {
                variable: (*variable).to_string(),
                collection: Expression::parse(collection),
            }),
            _ => Err(BowserError::InvalidLoopDirective {
                directive: directive.to_string(),
            }),
        }
    }
}

/// A preprocessed template node.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    Comment,
    Text(Interpolation),
    /// An element that bore the conditional directive
    Conditional {
        condition: Condition,
        element: TemplateElement,
    },
    /// An element that bore the loop directive; `body` is the same element without it
    Loop {
        /// The directive text as written
        source: String,
        /// `None` when `source` is malformed
        directive: Option<LoopDirective>,
        body: Box<TemplateNode>,
    },
    Plain(TemplateElement),
}

/// An element with directives removed and attribute values pre-scanned.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateElement {
    pub tag: String,
    pub attributes: Vec<TemplateAttribute>,
    pub children: Vec<TemplateNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateAttribute {
    pub name: String,
    /// `None` for bare attributes
    pub value: Option<Interpolation>,
}

/// Directive and expression counts, reported by `bowser-render check`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemplateStats {
    pub elements: usize,
    pub loops: usize,
    pub conditionals: usize,
    pub interpolations: usize,
}

/// A preprocessed template, ready to render any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<TemplateNode>,
}

impl Template {
    /// Preprocess with the default `if` / `loop` directive names.
    #[must_use]
    pub fn compile(nodes: &[Node]) -> Self {
        Self::compile_with(nodes, &Directives::default())
    }

    /// Preprocess with custom directive names.
    #[must_use]
    pub fn compile_with(nodes: &[Node], directives: &Directives) -> Self {
        Self {
            nodes: nodes.iter().map(|node| compile_node(node, directives)).collect(),
        }
    }

    /// Check every loop directive in the tree, rendered or not.
    ///
    /// # Errors
    ///
    /// Returns [`BowserError::InvalidLoopDirective`] for the first malformed
    /// loop in document order.
    pub fn validate(&self) -> Result<()> {
        self.nodes.iter().try_for_each(validate_node)
    }

    #[must_use]
    pub fn nodes(&self) -> &[TemplateNode] {
        &self.nodes
    }

    #[must_use]
    pub fn stats(&self) -> TemplateStats {
        let mut stats = TemplateStats::default();
        for node in &self.nodes {
            collect_stats(node, &mut stats);
        }
        stats
    }
}

fn compile_node(node: &Node, directives: &Directives) -> TemplateNode {
    match node {
        Node::Comment(_) => TemplateNode::Comment,
        Node::Text(text) => TemplateNode::Text(Interpolation::parse(text)),
        Node::Element(element) => match element.attribute(&directives.repeat) {
            Some(source) => {
                let directive = LoopDirective::parse(source).ok();
                if directive.is_none() {
                    debug!(tag = %element.tag, source, "Deferring malformed loop");
                } else {
                    debug!(tag = %element.tag, source, "Compiling loop");
                }
                TemplateNode::Loop {
                    source: source.to_string(),
                    directive,
                    body: Box::new(compile_element(element, directives)),
                }
            }
            None => compile_element(element, directives),
        },
    }
}

/// Compile an element whose loop directive, if any, has already been handled.
fn compile_element(element: &Element, directives: &Directives) -> TemplateNode {
    let attributes = element
        .attributes
        .iter()
        .filter(|a| a.name != directives.condition && a.name != directives.repeat)
        .map(|a| TemplateAttribute {
            name: a.name.clone(),
            value: a.value.as_deref().map(Interpolation::parse),
        })
        .collect();

    let children = element
        .children
        .iter()
        .map(|child| compile_node(child, directives))
        .collect();

    let compiled = TemplateElement {
        tag: element.tag.clone(),
        attributes,
        children,
    };

    match element.attribute(&directives.condition) {
        Some(condition) => TemplateNode::Conditional {
            condition: Condition::parse(condition),
            element: compiled,
        },
        None => TemplateNode::Plain(compiled),
    }
}

fn validate_node(node: &TemplateNode) -> Result<()> {
    match node {
        TemplateNode::Comment | TemplateNode::Text(_) => Ok(()),
        TemplateNode::Loop {
            source,
            directive,
            body,
        } => {
            if directive.is_none() {
                return Err(BowserError::InvalidLoopDirective {
                    directive: source.clone(),
                });
            }
            validate_node(body)
        }
        TemplateNode::Conditional {
            element,
            ..
        }
        | TemplateNode::Plain(element) => element.children.iter().try_for_each(validate_node),
    }
}

fn collect_stats(node: &TemplateNode, stats: &mut TemplateStats) {
    match node {
        TemplateNode::Comment => {}
        TemplateNode::Text(text) => stats.interpolations += text.expression_count(),
        TemplateNode::Loop {
            body,
            ..
        } => {
            stats.loops += 1;
            collect_stats(body, stats);
        }
        TemplateNode::Conditional {
            element,
            ..
        } => {
            stats.conditionals += 1;
            collect_element_stats(element, stats);
        }
        TemplateNode::Plain(element) => collect_element_stats(element, stats),
    }
}

fn collect_element_stats(element: &TemplateElement, stats: &mut TemplateStats) {
    stats.elements += 1;
    stats.interpolations += element
        .attributes
        .iter()
        .filter_map(|a| a.value.as_ref())
        .map(Interpolation::expression_count)
        .sum::<usize>();
    for child in &element.children {
        collect_stats(child, stats);
    }
}
