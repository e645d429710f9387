//! Integration tests for the owned markup tree.

use polyglot_dom::{
    Attribute, Element, Name, Node, XHTML_NAMESPACE, XMLNS_NAMESPACE, concat,
};

fn sample() -> Node {
    Element::new("ul")
        .with_attr("class", "menu")
        .with_child(Element::new("li").with_child("one"))
        .with_child(Element::new("li").with_child("two"))
        .into()
}

#[test]
fn test_builders_preserve_order() {
    let div = Element::new("div")
        .with_attr("id", "a")
        .with_attr("class", "b")
        .with_attr("id", "c");

    let names: Vec<&str> = div.attrs.iter().map(|a| a.name.local.as_str()).collect();
    assert_eq!(names, ["id", "class", "id"]);
    // Lookup returns the first of the duplicates
    assert_eq!(div.attr("id"), Some("a"));
    assert_eq!(div.attr("missing"), None);
}

#[test]
fn test_attr_lookup_ignores_namespaced_attributes() {
    let svg = Element::new(Name::qualified("http://www.w3.org/2000/svg", "svg"))
        .with_attrs([Attribute::new(Name::qualified(XMLNS_NAMESPACE, "xlink"), "x")]);
    assert_eq!(svg.attr("xlink"), None);
    assert!(svg.attrs[0].name.is_namespace_declaration());
}

#[test]
fn test_text_content_concatenates_in_tree_order() {
    assert_eq!(sample().text_content(), "onetwo");
    assert_eq!(Node::text("plain").text_content(), "plain");
}

#[test]
fn test_descendants_are_preorder() {
    let tree = sample();
    let kinds: Vec<String> = tree
        .descendants()
        .map(|n| match n {
            Node::Element(e) => e.name.local.clone(),
            Node::Text(t) => format!("#{t}"),
        })
        .collect();
    assert_eq!(kinds, ["ul", "li", "#one", "li", "#two"]);
}

#[test]
fn test_element_only_content() {
    let tree = sample();
    let ul = tree.as_element().unwrap();
    assert!(ul.has_element_only_content());
    assert_eq!(ul.element_children().count(), 2);

    let li = ul.element_children().next().unwrap();
    assert!(!li.has_element_only_content());
    assert!(!Element::new("br").has_element_only_content());
}

#[test]
fn test_whitespace_text() {
    assert!(Node::text(" \n\t").is_whitespace_text());
    assert!(Node::text("").is_whitespace_text());
    assert!(!Node::text("\u{00A0}").is_whitespace_text());
    assert!(!Node::element("p").is_whitespace_text());
}

#[test]
fn test_name_display_and_html_check() {
    assert_eq!(Name::local("p").to_string(), "p");
    let xhtml = Name::qualified(XHTML_NAMESPACE, "br");
    assert_eq!(xhtml.to_string(), "{http://www.w3.org/1999/xhtml}br");
    assert!(xhtml.is_html("br"));
    assert!(Name::local("br").is_html("br"));
    assert!(!Name::qualified("urn:other", "br").is_html("br"));
}

#[test]
fn test_concat_leaves_inputs_untouched() {
    let first = vec![Node::text("a")];
    let second = vec![Node::element("b")];
    let joined = concat(&first, &second);
    assert_eq!(joined, vec![Node::text("a"), Node::element("b")]);
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
}
