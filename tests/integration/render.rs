use bowser_render::core::BowserError;
use bowser_render::dom::{Node, parse_fragment, to_html};
use bowser_render::templating::{Context, Directives, Renderer, Template};
use bowser_render::test_utils::{TemplateFixture, init_test_logging};
use serde_json::json;

fn render(template: &str, context: serde_json::Value) -> Result<String, BowserError> {
    init_test_logging(None);
    let nodes = parse_fragment(template)?;
    let context = Context::from_value(context)?;
    let output = bowser_render::render(&nodes, &context)?;
    Ok(to_html(&output, false))
}

fn loop_attributes(nodes: &[Node]) -> Vec<String> {
    let mut found = Vec::new();
    for node in nodes {
        if let Node::Element(element) = node {
            if let Some(directive) = element.attribute("loop") {
                found.push(directive.to_string());
            }
            found.extend(loop_attributes(&element.children));
        }
    }
    found
}

#[test]
fn test_comment_only_template_renders_nothing() {
    let html = render("<!-- header --><!-- footer -->", json!({ "unused": 1 })).unwrap();
    assert_eq!(html, "");
}

#[test]
fn test_product_list_fixture() {
    let fixture = TemplateFixture::product_list();
    let nodes = parse_fragment(&fixture.template).unwrap();
    let Some(Node::Element(template)) = nodes.first() else {
        panic!("fixture should start with <template>");
    };

    let context = Context::from_value(fixture.context.clone()).unwrap();
    let output = bowser_render::render(&template.children, &context).unwrap();
    assert_eq!(to_html(&output, false), fixture.expected);
}

#[test]
fn test_nested_table_fixture() {
    let fixture = TemplateFixture::nested_table();
    assert_eq!(render(&fixture.template, fixture.context.clone()).unwrap(), fixture.expected);
}

#[test]
fn test_missing_values_render_empty_but_null_members_fail() {
    assert_eq!(render("<p>[$$(missing)]</p>", json!({})).unwrap(), "<p>[]</p>");

    let fixture = TemplateFixture::broken_path();
    let err = render(&fixture.template, fixture.context).unwrap_err();
    match err {
        BowserError::ResolutionFailed {
            expression,
            segment,
            suggestions,
        } => {
            assert_eq!(expression, "usr.name");
            assert_eq!(segment, "usr");
            assert_eq!(suggestions, vec!["user".to_string()]);
        }
        other => panic!("Expected ResolutionFailed, got {other:?}"),
    }
}

#[test]
fn test_loop_leaves_context_unchanged() {
    let nodes = parse_fragment(r#"<i loop="item in items">$$(item)</i>"#).unwrap();
    let mut context = Context::from_value(json!({ "items": [10, 20, 30] })).unwrap();
    let output = bowser_render::render(&nodes, &context).unwrap();
    assert_eq!(to_html(&output, false), "<i>10</i><i>20</i><i>30</i>");
    assert!(!context.contains("item"));

    context.insert("item", json!(null));
    bowser_render::render(&nodes, &context).unwrap();
    assert_eq!(context.get("item"), Some(&json!(null)));

    context.insert("item", "kept");
    bowser_render::render(&nodes, &context).unwrap();
    assert_eq!(context.get("item"), Some(&json!("kept")));
}

#[test]
fn test_condition_mixing_or_equality_and_ordering() {
    let template = r#"<b if="a == 'x' || b > 1">shown</b>"#;
    assert_eq!(render(template, json!({ "a": "x", "b": 0 })).unwrap(), "<b>shown</b>");
    assert_eq!(render(template, json!({ "a": "y", "b": 0 })).unwrap(), "");
    assert_eq!(render(template, json!({ "a": "y", "b": 2 })).unwrap(), "<b>shown</b>");
}

#[test]
fn test_interpolation_with_nested_parentheses() {
    assert_eq!(
        render(r#"<a title="$$(f(1,2))">$$(f(1,2))</a>"#, json!({ "f(1,2)": "v" })).unwrap(),
        r#"<a title="v">v</a>"#
    );
}

#[test]
fn test_rendering_is_repeatable_and_non_destructive() {
    let nodes =
        parse_fragment(r#"<ul><li loop="x in xs" if="x > 1">$$(x)</li><li loop="y in ys">$$(y.z)</li></ul>"#)
            .unwrap();
    let good = Context::from_value(json!({ "xs": [1, 2, 3] })).unwrap();

    let first = bowser_render::render(&nodes, &good).unwrap();
    let second = bowser_render::render(&nodes, &good).unwrap();
    assert_eq!(first, second);
    assert_eq!(loop_attributes(&nodes), vec!["x in xs", "y in ys"]);

    let bad = Context::from_value(json!({ "xs": [], "ys": [null] })).unwrap();
    assert!(bowser_render::render(&nodes, &bad).is_err());
    assert_eq!(loop_attributes(&nodes), vec!["x in xs", "y in ys"]);

    // A compiled template renders the same as the raw tree
    let template = Template::compile(&nodes);
    assert_eq!(Renderer::new().render_template(&template, &good).unwrap(), first);
}

#[test]
fn test_malformed_loop_in_unrendered_branch_renders_nothing() {
    assert_eq!(render(r#"<div if="never"><p loop="a of b"></p></div>"#, json!({})).unwrap(), "");
    assert_eq!(
        render(r#"<ul loop="x in xs"><li loop="bad"></li></ul>"#, json!({ "xs": [] })).unwrap(),
        ""
    );
}

#[test]
fn test_malformed_loop_fails_when_reached() {
    let err = render(r#"<div if="always"><p loop="a in b c"></p></div>"#, json!({ "always": true }))
        .unwrap_err();
    assert!(matches!(err, BowserError::InvalidLoopDirective { ref directive } if directive == "a in b c"));

    // Validation still sees it without rendering
    let nodes = parse_fragment(r#"<div if="never"><p loop="a in b c"></p></div>"#).unwrap();
    assert!(Template::compile(&nodes).validate().is_err());
}

#[test]
fn test_interpolated_markup_is_escaped() {
    let html = render(
        r#"<p title="$$(t)">$$(x) &amp; more</p>"#,
        json!({ "x": "<b>hi</b>", "t": r#"a" onclick="evil()"# }),
    )
    .unwrap();
    assert_eq!(html, r#"<p title="a&quot; onclick=&quot;evil()">&lt;b&gt;hi&lt;/b&gt; &amp; more</p>"#);
    assert!(!html.contains("<b>"));
}

#[test]
fn test_renderer_shared_across_threads() {
    let renderer = Renderer::with_directives(Directives {
        condition: "x-if".to_string(),
        repeat: "x-for".to_string(),
    });
    let nodes = parse_fragment(r#"<i x-for="n in ns" x-if="n">$$(n)</i>"#).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let renderer = &renderer;
                let nodes = &nodes;
                s.spawn(move || {
                    let context = Context::from_value(json!({ "ns": [0, i, i + 10] })).unwrap();
                    to_html(&renderer.render(nodes, &context).unwrap(), false)
                })
            })
            .collect();

        let outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(outputs[0], "<i>10</i>");
        assert_eq!(outputs[3], "<i>3</i><i>13</i>");
    });
}
