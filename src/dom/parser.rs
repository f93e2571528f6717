//! Template fragment parsing on top of the `html5gum` tokenizer.
//!
//! The tokenizer handles quoting, character references and raw-text bodies.
//! Tree building here is deliberately strict: templates are authored by hand,
//! so an element left open or an end tag that closes the wrong element is an
//! error instead of being repaired the way a browser would.
//!
//! Tag and attribute names come back lowercased. Attributes are ordered by
//! name, and an attribute with an empty value is treated as bare.

use html5gum::{Error as TokenizerError, State, Token, Tokenizer};
use tracing::trace;

use super::{Attribute, Element, Node, VOID_TAGS};
use crate::core::{BowserError, Result};

/// Parse a markup fragment into a list of top-level nodes.
///
/// # Errors
///
/// Returns [`BowserError::MarkupParse`] for unterminated comments or tags,
/// stray or mismatched end tags, and elements without an end tag.
///
/// # Examples
///
/// ```rust
/// use bowser_render::dom::{Node, parse_fragment};
///
/// let nodes = parse_fragment(r#"<p class='greeting'>Hi &amp; <b>$$(name)</b></p>"#)?;
/// assert_eq!(nodes.len(), 1);
/// assert_eq!(nodes[0].text_content(), "Hi & $$(name)");
/// # Ok::<(), bowser_render::core::BowserError>(())
/// ```
pub fn parse_fragment(source: &str) -> Result<Vec<Node>> {
    let mut tokenizer = Tokenizer::new(source);
    let mut stack: Vec<Element> = Vec::new();
    let mut roots: Vec<Node> = Vec::new();

    while let Some(token) = tokenizer.next() {
        let token = token.map_err(|_| error("tokenizer failed to read input".to_string()))?;

        match token {
            Token::StartTag(tag) => {
                let mut element = Element::new(String::from_utf8_lossy(&tag.name));
                element.attributes = tag
                    .attributes
                    .iter()
                    .map(|(name, value)| {
                        let name = String::from_utf8_lossy(name);
                        if value.is_empty() {
                            Attribute::bare(name)
                        } else {
                            Attribute::new(name, String::from_utf8_lossy(value))
                        }
                    })
                    .collect();

                if tag.self_closing || VOID_TAGS.contains(&element.tag.as_str()) {
                    trace!(tag = %element.tag, "Parsed empty element");
                    attach(&mut stack, &mut roots, Node::Element(element));
                    continue;
                }

                match element.tag.as_str() {
                    "script" | "style" => tokenizer.set_state(State::ScriptData),
                    "textarea" | "title" => tokenizer.set_state(State::RcData),
                    _ => {}
                }
                stack.push(element);
            }
            Token::EndTag(tag) => {
                let name = String::from_utf8_lossy(&tag.name);
                if VOID_TAGS.contains(&&*name) {
                    continue;
                }
                match stack.pop() {
                    Some(element) if element.tag == name => {
                        trace!(tag = %element.tag, children = element.children.len(), "Parsed element");
                        attach(&mut stack, &mut roots, Node::Element(element));
                    }
                    Some(element) => {
                        return Err(error(format!("expected </{}>, found </{name}>", element.tag)));
                    }
                    None => return Err(error(format!("unexpected end tag </{name}>"))),
                }
            }
            Token::String(text) => push_text(&mut stack, &mut roots, &String::from_utf8_lossy(&text)),
            Token::Comment(comment) => {
                attach(&mut stack, &mut roots, Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
            }
            Token::Doctype(_) => trace!("Skipping doctype"),
            Token::Error(html5gum::Spanned { value: TokenizerError::EofInComment, .. }) => {
                return Err(error("unterminated comment".to_string()));
            }
            Token::Error(html5gum::Spanned { value: TokenizerError::EofInTag, .. }) => {
                return Err(error("unterminated tag".to_string()));
            }
            Token::Error(e) => trace!("Recoverable markup error: {e:?}"),
        }
    }

    if let Some(open) = stack.last() {
        return Err(error(format!("missing </{}>", open.tag)));
    }
    Ok(roots)
}

fn attach(stack: &mut [Element], roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// Append text, merging with a preceding text node.
fn push_text(stack: &mut [Element], roots: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    let siblings = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => roots,
    };
    if let Some(Node::Text(existing)) = siblings.last_mut() {
        existing.push_str(text);
    } else {
        siblings.push(Node::Text(text.to_string()));
    }
}

fn error(reason: String) -> BowserError {
    BowserError::MarkupParse {
        reason,
    }
}
