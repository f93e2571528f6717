//! HTML serialization of markup trees.

use super::{Element, Node};

/// Tags that never carry content and are written without an end tag.
pub const VOID_TAGS: &[&str] = &["meta", "br", "img", "link", "import", "input", "hr"];

/// Tags whose text children are written without escaping.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Serialize nodes to HTML.
///
/// With `pretty` set, elements that contain child elements put each child on
/// its own line indented two spaces per level.
///
/// Text escapes `&`, `<` and `>`; attribute values additionally escape `"`.
/// Text inside `script` and `style` is written verbatim.
#[must_use]
pub fn to_html(nodes: &[Node], pretty: bool) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node, 0, pretty, false);
    }
    out
}

fn write_node(out: &mut String, node: &Node, depth: usize, pretty: bool, raw: bool) {
    match node {
        Node::Comment(content) => {
            indent(out, depth, pretty);
            out.push_str("<!--");
            out.push_str(content);
            out.push_str("-->");
            if pretty {
                out.push('\n');
            }
        }
        Node::Text(content) => {
            if pretty && content.trim().is_empty() {
                return;
            }
            if raw {
                out.push_str(content);
            } else {
                write_text_escaped(out, content);
            }
        }
        Node::Element(element) => write_element(out, element, depth, pretty),
    }
}

fn write_element(out: &mut String, element: &Element, depth: usize, pretty: bool) {
    let block = pretty && element.child_elements().next().is_some();

    indent(out, depth, pretty);
    out.push('<');
    out.push_str(&element.tag);
    for attribute in &element.attributes {
        out.push(' ');
        out.push_str(&attribute.name);
        if let Some(value) = &attribute.value {
            out.push_str("=\"");
            write_attr_escaped(out, value);
            out.push('"');
        }
    }
    out.push('>');
    if block {
        out.push('\n');
    }

    let raw = RAW_TEXT_TAGS.contains(&element.tag.as_str());
    for child in &element.children {
        write_node(out, child, depth + 1, pretty, raw);
    }

    if !element.children.is_empty() || !VOID_TAGS.contains(&element.tag.as_str()) {
        if block {
            indent(out, depth, pretty);
        }
        out.push_str("</");
        out.push_str(&element.tag);
        out.push('>');
    }
    if pretty {
        out.push('\n');
    }
}

fn write_text_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn write_attr_escaped(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

fn indent(out: &mut String, depth: usize, pretty: bool) {
    if pretty {
        out.push_str(&"  ".repeat(depth));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_output() {
        let nodes = vec![
            Node::element("ul")
                .with_attribute("class", "list")
                .with_child(Node::element("li").with_child(Node::text("one")))
                .with_child(Node::element("li").with_child(Node::text("two")))
                .build(),
        ];
        assert_eq!(to_html(&nodes, false), r#"<ul class="list"><li>one</li><li>two</li></ul>"#);
    }

    #[test]
    fn test_void_and_bare_attributes() {
        let nodes = vec![
            Node::element("input").with_attribute("type", "text").with_bare_attribute("disabled").build(),
            Node::element("br").build(),
            Node::element("div").build(),
        ];
        assert_eq!(to_html(&nodes, false), r#"<input type="text" disabled><br><div></div>"#);
    }

    #[test]
    fn test_comments_are_written() {
        let nodes = vec![Node::comment(" note "), Node::text("x")];
        assert_eq!(to_html(&nodes, false), "<!-- note -->x");
    }

    #[test]
    fn test_text_and_attribute_values_are_escaped() {
        let nodes = vec![
            Node::element("p")
                .with_attribute("title", r#"a" onclick="evil()"#)
                .with_child(Node::text("<b>hi</b> & more"))
                .build(),
        ];
        assert_eq!(
            to_html(&nodes, false),
            r#"<p title="a&quot; onclick=&quot;evil()">&lt;b&gt;hi&lt;/b&gt; &amp; more</p>"#
        );
    }

    #[test]
    fn test_script_text_is_not_escaped() {
        let nodes = vec![Node::element("script").with_child(Node::text("if (a < b && c) go();")).build()];
        assert_eq!(to_html(&nodes, false), "<script>if (a < b && c) go();</script>");
    }

    #[test]
    fn test_pretty_output_indents_nested_elements() {
        let nodes = vec![
            Node::element("ul")
                .with_child(Node::text("\n  "))
                .with_child(Node::element("li").with_child(Node::text("one")))
                .build(),
        ];
        assert_eq!(to_html(&nodes, true), "<ul>\n  <li>one</li>\n</ul>\n");
    }
}
