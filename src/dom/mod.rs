//! Markup tree model shared by templates and rendered output.
//!
//! A template is parsed into a `Vec<Node>` by [`parse_fragment`], rendered by
//! [`crate::templating::render`] into another `Vec<Node>`, and written back out
//! with [`to_html`]. The same types describe both trees.
//!
//! # Examples
//!
//! ```rust
//! use bowser_render::dom::{Node, to_html};
//!
//! let node = Node::element("a")
//!     .with_attribute("href", "/home")
//!     .with_child(Node::text("Home"))
//!     .build();
//!
//! assert_eq!(to_html(&[node], false), r#"<a href="/home">Home</a>"#);
//! ```

mod html;
mod parser;

pub use html::{VOID_TAGS, to_html};
pub use parser::parse_fragment;

/// A node in a markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// `<!-- ... -->`; the payload excludes the delimiters
    Comment(String),
    Text(String),
    Element(Element),
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

/// A single `name="value"` pair. A `None` value is a bare attribute like `disabled`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Self::Comment(content.into())
    }

    /// Start building an element node.
    pub fn element(tag: impl Into<String>) -> ElementBuilder {
        ElementBuilder {
            element: Element::new(tag),
        }
    }

    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Concatenated text content of this node and its descendants.
    ///
    /// Comments contribute nothing.
    #[must_use]
    pub fn text_content(&self) -> String {
        match self {
            Self::Comment(_) => String::new(),
            Self::Text(text) => text.clone(),
            Self::Element(element) => element.text_content(),
        }
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Value of the first attribute called `name`.
    ///
    /// A bare attribute yields `Some("")`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_deref().unwrap_or(""))
    }

    #[must_use]
    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    /// Child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }
}

/// Fluent builder returned by [`Node::element`].
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    element: Element,
}

impl ElementBuilder {
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.element.attributes.push(Attribute::new(name, value));
        self
    }

    #[must_use]
    pub fn with_bare_attribute(mut self, name: impl Into<String>) -> Self {
        self.element.attributes.push(Attribute::bare(name));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.element.children.push(child.into());
        self
    }

    #[must_use]
    pub fn build(self) -> Node {
        Node::Element(self.element)
    }
}

impl From<ElementBuilder> for Node {
    fn from(builder: ElementBuilder) -> Self {
        builder.build()
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}
