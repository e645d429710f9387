//! Property tests: decoding the encoder's output gives back the same tree,
//! with and without indentation, for names in and out of namespaces.

use polyglot_dom::{Element, Name, Node, XHTML_NAMESPACE, XML_NAMESPACE};
use polyglot_html::chars::is_xml_char;
use polyglot_html::{OutputOptions, is_void, of_string, to_string, to_string_with_options};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

const SVG: &str = "http://www.w3.org/2000/svg";
const XLINK: &str = "http://www.w3.org/1999/xlink";
const WIDGETS: &str = "urn:example:widgets";

const HTML_NAMES: &[&str] = &[
    "div", "p", "span", "ul", "li", "em", "a", "h1", "td", "br", "img", "hr", "input",
];
const ELEMENT_NAMES: &[(&str, &[&str])] = &[
    ("", HTML_NAMES),
    (XHTML_NAMESPACE, HTML_NAMES),
    (SVG, &["svg", "g", "rect", "text"]),
    (WIDGETS, &["widget", "slot"]),
];
const ATTRIBUTE_NAMES: &[(&str, &str)] = &[
    ("", "id"),
    ("", "class"),
    ("", "title"),
    ("", "href"),
    ("", "data-value"),
    (XML_NAMESPACE, "lang"),
    (XLINK, "href"),
    (WIDGETS, "flag"),
];
const MAX_DEPTH: usize = 3;

/// Declares `w` for the widgets namespace; every other namespace is left to
/// the encoder's defaults.
fn widget_prefix_options() -> OutputOptions {
    OutputOptions::new().with_ns_prefix(|uri| (uri == WIDGETS).then(|| "w".to_string()))
}

/// A fragment with no adjacent or whitespace-only text nodes, which is the
/// shape the decoder produces.
#[derive(Debug, Clone)]
struct Tree(Vec<Node>);

impl Arbitrary for Tree {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(arbitrary_children(g, MAX_DEPTH))
    }
}

/// Any string of XML characters. U+FEFF is left out: at the very start of
/// the output it would be read as a byte order mark.
fn arbitrary_text(g: &mut Gen) -> String {
    String::arbitrary(g)
        .chars()
        .filter(|&c| is_xml_char(c) && c != '\u{FEFF}')
        .collect()
}

fn arbitrary_element(g: &mut Gen, depth: usize) -> Element {
    let (namespace, locals) = g.choose(ELEMENT_NAMES).copied().unwrap_or(("", HTML_NAMES));
    let local = g.choose(locals).copied().unwrap_or("div");
    let mut element = Element::new(Name::qualified(namespace, local));
    for _ in 0..usize::arbitrary(g) % 3 {
        let (namespace, local) = g.choose(ATTRIBUTE_NAMES).copied().unwrap_or(("", "id"));
        element = element.with_attr(Name::qualified(namespace, local), arbitrary_text(g));
    }
    if depth > 0 && !is_void(&element.name) {
        element.children = arbitrary_children(g, depth - 1);
    }
    element
}

fn arbitrary_children(g: &mut Gen, depth: usize) -> Vec<Node> {
    let mut children: Vec<Node> = Vec::new();
    for _ in 0..usize::arbitrary(g) % 4 {
        if depth > 0 && bool::arbitrary(g) {
            children.push(arbitrary_element(g, depth).into());
        } else {
            let text = arbitrary_text(g);
            match children.last_mut() {
                Some(Node::Text(previous)) => previous.push_str(&text),
                _ => children.push(Node::Text(text)),
            }
        }
    }
    children.retain(|node| !node.is_whitespace_text());
    children
}

fn decodes_to(markup: &str, expected: &[Node]) -> bool {
    of_string(None, markup).is_ok_and(|decoded| decoded == expected)
}

#[quickcheck]
fn prop_round_trip_without_indentation(tree: Tree) -> bool {
    decodes_to(&to_string(&tree.0), &tree.0)
}

#[quickcheck]
fn prop_round_trip_with_indentation(tree: Tree) -> bool {
    let options = OutputOptions::new().with_indent(2);
    decodes_to(&to_string_with_options(&tree.0, &options), &tree.0)
}

#[quickcheck]
fn prop_round_trip_with_resolver_prefixes(tree: Tree) -> bool {
    let options = widget_prefix_options();
    decodes_to(&to_string_with_options(&tree.0, &options), &tree.0)
        && decodes_to(
            &to_string_with_options(&tree.0, &options.clone().with_indent(2)),
            &tree.0,
        )
}

#[quickcheck]
fn prop_indentation_is_not_semantic(tree: Tree, width: u8) -> bool {
    let plain = of_string(None, to_string(&tree.0));
    let options = OutputOptions::new().with_indent(usize::from(width % 8));
    let indented = of_string(None, to_string_with_options(&tree.0, &options));
    match (plain, indented) {
        (Ok(plain), Ok(indented)) => plain == indented,
        _ => false,
    }
}

#[quickcheck]
fn prop_escaped_text_and_attributes_round_trip(text: String) -> bool {
    let text: String = text
        .chars()
        .filter(|&c| is_xml_char(c))
        .collect();
    let mut p = Element::new("p").with_attr("title", text.as_str());
    if !text.trim_matches([' ', '\t', '\n', '\r']).is_empty() {
        p = p.with_child(text.as_str());
    }
    let tree = vec![Node::from(p)];
    decodes_to(&to_string(&tree), &tree)
}

#[quickcheck]
fn prop_trailing_newline_is_the_only_difference(tree: Tree) -> bool {
    let options = OutputOptions::new().with_nl(true);
    to_string_with_options(&tree.0, &options) == format!("{}\n", to_string(&tree.0))
}
