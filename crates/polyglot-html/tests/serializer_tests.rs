//! Integration tests for polyglot markup serialization.

use std::io;

use polyglot_dom::{Attribute, Element, Name, Node, XHTML_NAMESPACE, XML_NAMESPACE};
use polyglot_html::{
    DOCTYPE, EncodeError, OutputOptions, VOID_ELEMENTS, doctype, is_void, of_string, output,
    output_doc, to_string, to_string_with_options,
};

const SVG: &str = "http://www.w3.org/2000/svg";
const XLINK: &str = "http://www.w3.org/1999/xlink";

fn page() -> Node {
    Node::from(
        Element::new("html").with_children([
            Node::from(Element::new("head").with_child(Element::new("title").with_child("T"))),
            Node::from(
                Element::new("body")
                    .with_child(Element::new("p").with_child("Hello, ").with_child(
                        Element::new("em").with_child("world"),
                    ))
                    .with_child(Element::new("br")),
            ),
        ]),
    )
}

#[test]
fn test_void_element_form() {
    assert_eq!(to_string(&Node::element("br")), "<br />");
    let img = Element::new("img").with_attr("src", "a.png").with_attr("alt", "");
    assert_eq!(to_string(&img), r#"<img src="a.png" alt="" />"#);
}

#[test]
fn test_empty_non_void_element_has_end_tag() {
    assert_eq!(to_string(&Node::element("div")), "<div></div>");
    assert_eq!(to_string(&Node::element("script")), "<script></script>");
}

#[test]
fn test_void_registry() {
    for name in VOID_ELEMENTS {
        assert!(is_void(&Name::local(*name)), "{name} should be void");
        assert!(is_void(&Name::qualified(XHTML_NAMESPACE, *name)));
    }
    assert!(!is_void(&Name::local("div")));
    assert!(!is_void(&Name::local("BR")));
    assert!(!is_void(&Name::qualified(SVG, "image")));
    assert!(!is_void(&Name::qualified(SVG, "br")));
}

#[test]
fn test_void_element_children_are_not_written() {
    let br = Element::new("br").with_child("oops");
    assert_eq!(to_string(&br), "<br />");
}

#[test]
fn test_text_escaping() {
    let p = Element::new("p").with_child("a < b && c > \"d\" 'e'");
    assert_eq!(
        to_string(&p),
        "<p>a &lt; b &amp;&amp; c &gt; \"d\" 'e'</p>"
    );
}

#[test]
fn test_attribute_escaping() {
    let a = Element::new("a").with_attr("title", "\"quoted\" & 'single' <tag>\tx\ny");
    assert_eq!(
        to_string(&a),
        "<a title=\"&quot;quoted&quot; &amp; &#39;single&#39; &lt;tag&gt;&#9;x&#10;y\"></a>"
    );
}

#[test]
fn test_escaped_values_decode_back() {
    let value = "<>&\"' \t\n\r mixed";
    let tree = Node::from(Element::new("p").with_attr("data-v", value).with_child(value));
    let decoded = of_string(None, to_string(&tree)).unwrap();
    assert_eq!(decoded, vec![tree]);
}

#[test]
fn test_non_ascii_is_written_verbatim() {
    let p = Element::new("p").with_child("café \u{1F600}");
    assert_eq!(to_string(&p), "<p>café \u{1F600}</p>");
}

#[test]
fn test_forbidden_characters_are_replaced() {
    let p = Element::new("p").with_child("a\u{0}b");
    assert_eq!(to_string(&p), "<p>a\u{FFFD}b</p>");
}

#[test]
fn test_no_indentation_by_default() {
    assert_eq!(
        to_string(&page()),
        "<html><head><title>T</title></head><body><p>Hello, <em>world</em></p><br /></body></html>"
    );
}

#[test]
fn test_indentation_of_element_only_content() {
    let options = OutputOptions::new().with_indent(2);
    let expected = "\
<html>
  <head>
    <title>T</title>
  </head>
  <body>
    <p>Hello, <em>world</em></p>
    <br />
  </body>
</html>";
    assert_eq!(to_string_with_options(&page(), &options), expected);
}

#[test]
fn test_indented_fragment_puts_roots_on_separate_lines() {
    let fragment = vec![Node::element("a"), Node::element("b")];
    let options = OutputOptions::new().with_indent(4);
    assert_eq!(to_string_with_options(&fragment, &options), "<a></a>\n<b></b>");

    let mixed = vec![Node::element("a"), Node::text("x")];
    assert_eq!(to_string_with_options(&mixed, &options), "<a></a>x");
}

#[test]
fn test_trailing_newline() {
    let options = OutputOptions::new().with_nl(true);
    assert_eq!(to_string_with_options(&Node::element("p"), &options), "<p></p>\n");
    assert_eq!(to_string(&Node::element("p")), "<p></p>");
}

#[test]
fn test_doctype_constant() {
    assert_eq!(DOCTYPE, "<!DOCTYPE html>");
    assert_eq!(doctype(), DOCTYPE);
    assert_eq!(doctype(), doctype());
}

#[test]
fn test_output_doc_starts_with_doctype() {
    for tree in [page(), Node::text("plain"), Node::element("br")] {
        let mut sink = Vec::new();
        output_doc(None, &mut sink, &tree).unwrap();
        let text = String::from_utf8(sink).unwrap();
        assert_eq!(text.lines().next(), Some(DOCTYPE));
        assert_eq!(text, format!("{DOCTYPE}\n{}", to_string(&tree)));
    }
}

#[test]
fn test_output_without_doctype() {
    let mut sink = Vec::new();
    let options = OutputOptions::new().with_nl(true);
    output(Some(&options), &mut sink, &page()).unwrap();
    let text = String::from_utf8(sink).unwrap();
    assert!(text.starts_with("<html>"));
    assert!(text.ends_with("</html>\n"));
}

#[test]
fn test_output_doc_round_trips() {
    let mut sink = Vec::new();
    output_doc(Some(&OutputOptions::new().with_indent(2)), &mut sink, &page()).unwrap();
    assert_eq!(of_string(None, &sink).unwrap(), vec![page()]);
}

struct FailingSink;

impl io::Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_sink_errors_are_reported() {
    let err = output(None, &mut FailingSink, &page()).unwrap_err();
    let EncodeError::Io(io_error) = err;
    assert_eq!(io_error.kind(), io::ErrorKind::BrokenPipe);
}

#[test]
fn test_default_namespace_declaration_is_added() {
    let html = Element::new(Name::qualified(XHTML_NAMESPACE, "html"))
        .with_child(Element::new(Name::qualified(XHTML_NAMESPACE, "body")));
    assert_eq!(
        to_string(&html),
        r#"<html xmlns="http://www.w3.org/1999/xhtml"><body></body></html>"#
    );
}

#[test]
fn test_tree_declarations_are_reused() {
    let svg = Element::new(Name::qualified(SVG, "svg"))
        .with_attr(Name::qualified(polyglot_dom::XMLNS_NAMESPACE, "s"), SVG)
        .with_child(Element::new(Name::qualified(SVG, "rect")));
    assert_eq!(
        to_string(&svg),
        r#"<s:svg xmlns:s="http://www.w3.org/2000/svg"><s:rect></s:rect></s:svg>"#
    );
}

#[test]
fn test_resolver_prefix_is_declared() {
    let options = OutputOptions::new().with_ns_prefix(|uri| match uri {
        SVG => Some("svg".to_string()),
        XLINK => Some("xlink".to_string()),
        _ => None,
    });
    let svg = Element::new(Name::qualified(SVG, "svg")).with_child(
        Element::new(Name::qualified(SVG, "use"))
            .with_attr(Name::qualified(XLINK, "href"), "#icon"),
    );
    assert_eq!(
        to_string_with_options(&svg, &options),
        concat!(
            r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg">"#,
            r##"<svg:use xlink:href="#icon" xmlns:xlink="http://www.w3.org/1999/xlink"></svg:use>"##,
            "</svg:svg>"
        )
    );
}

#[test]
fn test_namespaced_attribute_without_prefix_gets_generated_one() {
    let p = Element::new("p").with_attrs([Attribute::new(Name::qualified("urn:x", "a"), "1")]);
    assert_eq!(to_string(&p), r#"<p ns1:a="1" xmlns:ns1="urn:x"></p>"#);
}

#[test]
fn test_xml_namespace_uses_xml_prefix() {
    let p = Element::new("p").with_attr(Name::qualified(XML_NAMESPACE, "lang"), "en");
    assert_eq!(to_string(&p), r#"<p xml:lang="en"></p>"#);
}

#[test]
fn test_default_namespace_is_undeclared_for_unqualified_child() {
    let root = Element::new(Name::qualified("urn:x", "root")).with_child(Element::new("plain"));
    let markup = to_string(&root);
    assert_eq!(markup, r#"<root xmlns="urn:x"><plain xmlns=""></plain></root>"#);
    let decoded = of_string(None, &markup).unwrap();
    let plain = decoded[0].as_element().unwrap().children[0].as_element().unwrap();
    assert_eq!(plain.name, Name::local("plain"));
}

#[test]
fn test_namespaced_tree_round_trips() {
    let tree = vec![Node::from(
        Element::new(Name::qualified(SVG, "svg"))
            .with_attr("width", "10")
            .with_child(
                Element::new(Name::qualified(SVG, "a"))
                    .with_attr(Name::qualified(XLINK, "href"), "#x")
                    .with_child(Element::new(Name::qualified(SVG, "rect"))),
            ),
    )];
    assert_eq!(of_string(None, to_string(&tree)).unwrap(), tree);
}

#[test]
fn test_generated_declarations_do_not_come_back_as_attributes() {
    let tree = vec![Node::from(
        Element::new("p")
            .with_attrs([Attribute::new(Name::qualified("urn:x", "a"), "1")])
            .with_child(Element::new(Name::qualified("urn:y", "q"))),
    )];
    let markup = to_string(&tree);
    assert_eq!(
        markup,
        r#"<p ns1:a="1" xmlns:ns1="urn:x"><q xmlns="urn:y"></q></p>"#
    );
    assert_eq!(of_string(None, &markup).unwrap(), tree);
}

#[test]
fn test_resolver_prefixes_round_trip() {
    let options = OutputOptions::new().with_ns_prefix(|uri| match uri {
        SVG => Some("svg".to_string()),
        XLINK => Some("xlink".to_string()),
        _ => None,
    });
    let tree = vec![Node::from(
        Element::new(Name::qualified(XHTML_NAMESPACE, "div"))
            .with_attr(Name::qualified(XML_NAMESPACE, "lang"), "en")
            .with_child(
                Element::new(Name::qualified(SVG, "svg")).with_child(
                    Element::new(Name::qualified(SVG, "use"))
                        .with_attr(Name::qualified(XLINK, "href"), "#icon"),
                ),
            ),
    )];
    let markup = to_string_with_options(&tree, &options.with_indent(2));
    assert_eq!(of_string(None, &markup).unwrap(), tree);
}
