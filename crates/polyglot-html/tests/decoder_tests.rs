//! Integration tests for decoding markup into trees.

use polyglot_common::warning::recorded_warnings;
use polyglot_dom::{
    Attribute, Element, Name, Node, XHTML_NAMESPACE, XML_NAMESPACE, XMLNS_NAMESPACE,
};
use polyglot_html::{
    DecodeError, DecodeOptions, EntityPolicy, EncodingError, decode_with_options, of_string,
};

fn decode(input: &str) -> Vec<Node> {
    of_string(None, input).unwrap()
}

fn root_element(input: &str) -> Element {
    let nodes = decode(input);
    assert_eq!(nodes.len(), 1, "expected a single root in {nodes:?}");
    nodes[0].as_element().cloned().unwrap()
}

#[test]
fn test_entity_resolution() {
    assert_eq!(decode("&amp;"), vec![Node::text("&")]);
    assert_eq!(decode("&eacute;"), vec![Node::text("\u{E9}")]);
    assert_eq!(decode("&#65;"), vec![Node::text("A")]);
    assert_eq!(decode("&#x41;"), vec![Node::text("A")]);
    assert_eq!(decode("&NotEqualTilde;"), vec![Node::text("\u{2242}\u{338}")]);
}

#[test]
fn test_unknown_entity_fails_without_tree() {
    match of_string(None, "<p>&bogus;</p>") {
        Err(DecodeError::UnknownEntity { name, position }) => {
            assert_eq!(name, "bogus");
            assert_eq!(position.offset, 3);
        }
        other => panic!("Expected UnknownEntity, got {other:?}"),
    }
}

#[test]
fn test_unknown_entity_pass_through() {
    let options = DecodeOptions::new().with_entities(EntityPolicy::PassThrough);
    let nodes = decode_with_options(b"<p>&bogus; &amp;</p>", &options).unwrap();
    assert_eq!(nodes[0].text_content(), "&bogus; &");
}

#[test]
fn test_pass_through_warnings_do_not_grow_with_input() {
    let options = DecodeOptions::new().with_entities(EntityPolicy::PassThrough);
    for i in 0..500 {
        let markup = format!("<p>&unknown{i};</p>");
        let nodes = decode_with_options(markup.as_bytes(), &options).unwrap();
        assert_eq!(nodes[0].text_content(), format!("&unknown{i};"));
    }
    let decoder_warnings = recorded_warnings()
        .into_iter()
        .filter(|warning| warning.starts_with("[Decoder]"))
        .count();
    assert_eq!(decoder_warnings, 1);
}

#[test]
fn test_nested_elements() {
    let root = root_element("<ul><li>one</li><li>two <b>2</b></li></ul>");
    assert_eq!(root.name, Name::local("ul"));
    assert_eq!(root.children.len(), 2);
    let second = root.children[1].as_element().unwrap();
    assert_eq!(second.children[0], Node::text("two "));
    assert_eq!(
        second.children[1],
        Node::from(Element::new("b").with_child("2"))
    );
}

#[test]
fn test_attributes_keep_source_order_and_duplicates() {
    let root = root_element(r#"<img src="a.png" alt="A &amp; B" src="b.png"/>"#);
    let attrs: Vec<(&str, &str)> = root
        .attrs
        .iter()
        .map(|a| (a.name.local.as_str(), a.value.as_str()))
        .collect();
    assert_eq!(attrs, [("src", "a.png"), ("alt", "A & B"), ("src", "b.png")]);
    assert!(root.children.is_empty());
}

#[test]
fn test_comments_pis_and_doctype_are_dropped() {
    let nodes = decode(
        "<?xml version=\"1.0\"?>\n<!DOCTYPE html>\n<!-- c --><html><?pi x?><body>a<!-- c -->b</body></html>\n",
    );
    assert_eq!(
        nodes,
        vec![Node::from(
            Element::new("html").with_child(Element::new("body").with_child("ab"))
        )]
    );
}

#[test]
fn test_cdata_becomes_text() {
    let root = root_element("<script><![CDATA[if (a < b && c) {}]]></script>");
    assert_eq!(root.children, vec![Node::text("if (a < b && c) {}")]);
}

#[test]
fn test_whitespace_only_text_is_dropped_by_default() {
    let root = root_element("<ul>\n  <li> a </li>\n  <li>\n</li>\n</ul>");
    assert_eq!(root.children.len(), 2);
    assert_eq!(root.children[0].text_content(), " a ");
    assert!(root.children[1].as_element().unwrap().children.is_empty());
}

#[test]
fn test_preserve_whitespace_option() {
    let options = DecodeOptions::new().with_preserve_whitespace(true);
    let nodes = decode_with_options(b"<ul>\n  <li/>\n</ul>", &options).unwrap();
    let root = nodes[0].as_element().unwrap();
    assert_eq!(root.children.len(), 3);
    assert!(root.children[0].is_whitespace_text());
}

#[test]
fn test_fragment_with_several_roots() {
    let nodes = decode("text <b>bold</b> tail<br/>");
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[0], Node::text("text "));
    assert_eq!(nodes[2], Node::text(" tail"));
}

#[test]
fn test_empty_input() {
    assert!(decode("").is_empty());
    assert!(decode("  \n").is_empty());
}

#[test]
fn test_default_namespace() {
    let root = root_element(r#"<html xmlns="http://www.w3.org/1999/xhtml"><body/></html>"#);
    assert_eq!(root.name, Name::qualified(XHTML_NAMESPACE, "html"));
    assert!(root.attrs.is_empty());
    let body = root.children[0].as_element().unwrap();
    assert_eq!(body.name, Name::qualified(XHTML_NAMESPACE, "body"));
}

#[test]
fn test_prefixed_names() {
    let root = root_element(
        r##"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" xmlns:xl="http://www.w3.org/1999/xlink" xml:lang="en"><svg:a xl:href="#x"/></svg:svg>"##,
    );
    assert_eq!(root.name, Name::qualified("http://www.w3.org/2000/svg", "svg"));
    assert_eq!(root.attrs.len(), 1);
    assert_eq!(root.attrs[0].name, Name::qualified(XML_NAMESPACE, "lang"));
    let link = root.children[0].as_element().unwrap();
    assert_eq!(link.attrs[0].name, Name::qualified("http://www.w3.org/1999/xlink", "href"));
}

#[test]
fn test_namespace_scope_ends_with_element() {
    let nodes = decode(r#"<a xmlns="urn:x"/><b/>"#);
    assert_eq!(nodes[0].as_element().unwrap().name.namespace, "urn:x");
    assert_eq!(nodes[1].as_element().unwrap().name.namespace, "");
}

#[test]
fn test_unprefixed_attributes_have_no_namespace() {
    let root = root_element(r#"<a xmlns="urn:x" id="1"/>"#);
    assert_eq!(root.attrs, [Attribute::new("id", "1")]);
}

#[test]
fn test_namespace_declarations_are_not_attributes() {
    let root = root_element(
        r#"<p xmlns="urn:d" xmlns:x="urn:x" x:a="1" b="2"><x:q xmlns:x="urn:y"/></p>"#,
    );
    assert_eq!(root.name, Name::qualified("urn:d", "p"));
    assert_eq!(
        root.attrs,
        [
            Attribute::new(Name::qualified("urn:x", "a"), "1"),
            Attribute::new("b", "2"),
        ]
    );
    let inner = root.children[0].as_element().unwrap();
    assert_eq!(inner.name, Name::qualified("urn:y", "q"));
    assert!(inner.attrs.is_empty());
    assert!(
        root.attrs
            .iter()
            .all(|attr| attr.name.namespace != XMLNS_NAMESPACE)
    );
}

#[test]
fn test_malformed_markup() {
    for input in [
        "<a><b></a></b>",
        "<a>",
        "</a>",
        "<a></b>",
        "<p:a/>",
        "<a p:b=\"1\"/>",
        "<a xmlns:p=\"\"/>",
        "<a xmlns:=\"urn:x\"/>",
        "<a xmlns:xmlns=\"urn:x\"/>",
        "<a xmlns:xml=\"urn:x\"/>",
        "<a:b:c/>",
        "<a/><!DOCTYPE a>",
    ] {
        assert!(
            matches!(of_string(None, input), Err(DecodeError::MalformedMarkup { .. })),
            "expected malformed markup for {input:?}"
        );
    }
}

#[test]
fn test_error_positions() {
    let err = of_string(None, "<a>\n  <b></c></a>").unwrap_err();
    let position = err.position().unwrap();
    assert_eq!((position.line, position.column), (2, 6));
    assert!(err.to_string().starts_with("malformed markup at 2:6:"));
}

#[test]
fn test_truncated_input() {
    let err = of_string(None, "<html><body>").unwrap_err();
    assert!(err.to_string().contains("not closed"), "{err}");
}

#[test]
fn test_encoding_override() {
    let nodes = of_string(Some("latin1"), b"<p>caf\xE9</p>").unwrap();
    assert_eq!(nodes[0].text_content(), "café");
}

#[test]
fn test_encoding_declaration() {
    let nodes = of_string(
        None,
        b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><p>\xE9</p>".as_slice(),
    )
    .unwrap();
    assert_eq!(nodes[0].text_content(), "é");
}

#[test]
fn test_utf16_with_bom() {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "<p>\u{e9}</p>".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let nodes = of_string(None, &bytes).unwrap();
    assert_eq!(nodes[0].text_content(), "é");
}

#[test]
fn test_invalid_bytes_are_an_encoding_error() {
    let err = of_string(None, b"<p>\xFF</p>".as_slice()).unwrap_err();
    assert!(matches!(err, DecodeError::Encoding(EncodingError { .. })));
    assert!(err.position().is_none());
}

#[test]
fn test_unknown_encoding_label() {
    let options = DecodeOptions::new().with_encoding("klingon");
    assert!(matches!(
        decode_with_options(b"<p/>", &options),
        Err(DecodeError::Encoding(_))
    ));
}
