use markup_node_engine::{Element, MarkupNode, NodeError, OptionsOverride, Value};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn compact() -> OptionsOverride {
    OptionsOverride::new().indent("").new_line("")
}

fn pretty() -> OptionsOverride {
    OptionsOverride::new().indent(2usize).new_line("\n")
}

#[test]
fn empty_root_renders_and_extracts() {
    let node = MarkupNode::new("test");
    assert_eq!(node.render(), "<test/>");
    assert_eq!(node.extract(), json!({"test": {}}));
}

#[rstest]
#[case(true, "<test/>")]
#[case(false, "<test></test>")]
fn empty_node_is_stable_across_renders(#[case] self_close: bool, #[case] expected: &str) {
    let node = MarkupNode::with_options("test", json!({}), &OptionsOverride::new().self_close(self_close));
    for _ in 0..3 {
        assert_eq!(node.render(), expected);
    }
}

#[test]
fn null_empty_and_undefined_children() {
    let node = MarkupNode::with_options(
        "test",
        Value::object([
            ("a", Value::Null),
            ("b", Value::from("")),
            ("c", Value::Undefined),
        ]),
        &OptionsOverride::new().def_val("?"),
    );
    assert_eq!(node.render(), "<test>\r\n\t<a/>\r\n\t<b>?</b>\r\n</test>");
}

#[test]
fn chained_writes_build_the_tree() {
    let mut root = MarkupNode::with_elements("test", json!({}));
    root.set_options(&OptionsOverride::new().attr_sel("_"));
    root.set("_a", 1);
    root.set("de", json!({"_f": "gh"}));

    assert_eq!(root.render_with(&compact()), r#"<test a="1"><de f="gh"/></test>"#);
}

#[test]
fn deep_path_writes_materialize_intermediates() {
    let mut root = MarkupNode::new("config");
    root.child("server").unwrap().child("http").unwrap().set("port", 8080);
    root.set_path("server.http._secure", true);
    root.set_path("server.name", "main");

    insta::assert_snapshot!(root.render_with(&pretty()), @r#"
    <config>
      <server>
        <http secure="true">
          <port>8080</port>
        </http>
        <name>main</name>
      </server>
    </config>
    "#);
}

#[test]
fn array_assignment_renders_repeated_tags() {
    let mut root = MarkupNode::new("test");
    root.set("a", json!(["b", "c", {"d": "ef"}]));

    assert_eq!(
        root.render_with(&compact()),
        "<test><a>b</a><a>c</a><a><d>ef</d></a></test>"
    );
}

#[test]
fn array_of_records_pretty_prints() {
    let root = MarkupNode::from_root(json!({
        "library": {
            "_name": "city",
            "book": [
                {"_id": 1, "title": "Dune"},
                {"_id": 2, "title": "Emma", "tags": ["classic", "romance"]}
            ]
        }
    }))
    .unwrap();

    assert_eq!(
        root.render_with(&pretty()),
        [
            r#"<library name="city">"#,
            r#"  <book id="1">"#,
            "    <title>Dune</title>",
            "  </book>",
            r#"<book id="2">"#,
            "    <title>Emma</title>",
            "    <tags>classic</tags>",
            "<tags>romance</tags>",
            "  </book>",
            "</library>",
        ]
        .join("\n")
    );
}

#[test]
fn array_group_siblings_take_bare_newline_under_tab_indent() {
    let mut root = MarkupNode::new("test");
    root.set("a", json!([1, 2]));

    assert_eq!(
        root.render_with(&OptionsOverride::new().new_line("\n")),
        "<test>\n\t<a>1</a>\n<a>2</a>\n</test>"
    );
}

#[test]
fn zero_is_rendered_not_defaulted() {
    let mut root = MarkupNode::with_options("test", json!({}), &OptionsOverride::new().def_val("?"));
    root.set("a", 0);
    assert_eq!(root.render_with(&compact()), "<test><a>0</a></test>");
}

#[test]
fn escaping_applies_to_text_and_attributes() {
    let root = MarkupNode::with_elements("test", json!({"_x": "<>&'\"", "y": "<>&'\""}));
    let xml = root.render_with(&compact());

    assert_eq!(
        xml,
        r#"<test x="&lt;&gt;&amp;&apos;&quot;"><y>&lt;&gt;&amp;&apos;&quot;</y></test>"#
    );
}

#[rstest]
#[case(json!({"0": 1, "1": 2, "2": 3}), true)]
#[case(json!({"0": 1, "a": 2}), false)]
#[case(json!({"_0": 1}), false)]
fn array_like_detection(#[case] elements: serde_json::Value, #[case] expected: bool) {
    let node = MarkupNode::with_elements("n", elements);
    assert_eq!(node.is_array_like(), expected);
}

#[test]
fn multi_key_root_fails_validation() {
    let err = MarkupNode::from_root(json!({"a": {}, "b": {}})).unwrap_err();
    assert!(matches!(err, NodeError::Validation(_)));
    assert_eq!(
        err.to_string(),
        "Validation error: object root must have a single element"
    );
}

#[test]
fn extract_then_rebuild_preserves_values() {
    let original = MarkupNode::from_root(json!({
        "test": {
            "_id": "7",
            "flag": true,
            "count": 3,
            "empty": null,
            "items": ["x", "y"],
            "child": {"_k": "v", "_value": "text"}
        }
    }))
    .unwrap();

    let extracted = original.extract();
    let rebuilt = MarkupNode::from_root(extracted.clone()).unwrap();

    assert_eq!(rebuilt.extract(), extracted);
    assert_eq!(rebuilt.render(), original.render());
}

#[test]
fn rebuilt_scalars_match_original() {
    let root = MarkupNode::from_root(json!({"test": {"_a": 1.5, "b": "text"}})).unwrap();
    let rebuilt = MarkupNode::from_root(root.extract()).unwrap();

    let a = rebuilt.get("_a").and_then(Element::as_scalar).unwrap();
    assert_eq!(a.to_text(), "1.5");
    let b = rebuilt.get("b").and_then(Element::as_scalar).unwrap();
    assert_eq!(b.to_text(), "text");
}

#[test]
fn declaration_precedes_root_only() {
    let root = MarkupNode::from_root(json!({"doc": {"a": {"b": {"c": 1}}}})).unwrap();
    let xml = root.render_with(&pretty().declaration(true));

    insta::assert_snapshot!(xml, @r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <doc>
      <a>
        <b>
          <c>1</c>
        </b>
      </a>
    </doc>
    "#);
}
