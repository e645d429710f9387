//! Markup tree model for the polyglot codec.
//!
//! This crate provides the owned tree that the decoder produces and the
//! encoder consumes, following the element/text subset of the
//! [DOM Living Standard](https://dom.spec.whatwg.org/).
//!
//! # Design
//!
//! Every [`Node`] exclusively owns its children. There are no parent links and
//! no shared nodes, so a tree is always finite and acyclic and can be read from
//! any number of threads at once. Trees are treated as values: the builder
//! methods consume `self` and return a new value instead of mutating in place.

use std::fmt;

use serde::Serialize;

/// [Namespaces in XML § 3](https://www.w3.org/TR/xml-names/#ns-decl)
///
/// "The prefix xml is by definition bound to the namespace name
/// http://www.w3.org/XML/1998/namespace."
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// [Namespaces in XML § 3](https://www.w3.org/TR/xml-names/#ns-decl)
///
/// "The prefix xmlns is used only to declare namespace bindings and is by
/// definition bound to the namespace name http://www.w3.org/2000/xmlns/."
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// [§ 2.1.3 XML compatibility](https://html.spec.whatwg.org/multipage/infrastructure.html#xml)
///
/// "The HTML namespace is: http://www.w3.org/1999/xhtml"
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// An expanded name: a namespace URI plus a local name.
///
/// An empty `namespace` means the name is in no namespace. Prefixes are a
/// property of the serialized text, not of the tree, so they are not stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Name {
    /// Namespace URI, or the empty string for no namespace.
    pub namespace: String,
    /// Local part of the name.
    pub local: String,
}

impl Name {
    /// A name in no namespace.
    #[must_use]
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: String::new(),
            local: local.into(),
        }
    }

    /// A name in the given namespace.
    #[must_use]
    pub fn qualified(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    /// Returns true if the name belongs to some namespace.
    #[must_use]
    pub fn has_namespace(&self) -> bool {
        !self.namespace.is_empty()
    }

    /// Returns true if this attribute name is a namespace declaration
    /// (`xmlns` or `xmlns:prefix`).
    #[must_use]
    pub fn is_namespace_declaration(&self) -> bool {
        self.namespace == XMLNS_NAMESPACE
    }

    /// Returns true if the name has the given local part and either no
    /// namespace or the XHTML namespace.
    #[must_use]
    pub fn is_html(&self, local: &str) -> bool {
        self.local == local && (self.namespace.is_empty() || self.namespace == XHTML_NAMESPACE)
    }
}

/// Names render in Clark notation: `{namespace}local`, or just `local`.
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.local)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local)
        }
    }
}

impl From<&str> for Name {
    fn from(local: &str) -> Self {
        Self::local(local)
    }
}

impl From<String> for Name {
    fn from(local: String) -> Self {
        Self::local(local)
    }
}

/// [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
///
/// "Attr nodes are simply known as attributes. ... Attributes have a namespace
/// (null or a non-empty string), namespace prefix (null or a non-empty string),
/// local name, value".
///
/// Attribute lists are ordered and may contain duplicate names; the decoder
/// keeps source order and the encoder writes them back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Attribute {
    /// The attribute's expanded name.
    pub name: Name,
    /// The attribute's value, unescaped.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute.
    #[must_use]
    pub fn new(name: impl Into<Name>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
///
/// An element: an expanded name, an ordered attribute list and an ordered
/// list of children it owns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Element {
    /// "Elements have an associated namespace ... local name"
    pub name: Name,
    /// "Elements also have an attribute list"
    pub attrs: Vec<Attribute>,
    /// "A node has an associated list of children"
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes and no children.
    #[must_use]
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns a copy of this element with an attribute appended.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<Name>, value: impl Into<String>) -> Self {
        self.attrs.push(Attribute::new(name, value));
        self
    }

    /// Returns a copy of this element with the given attributes appended.
    #[must_use]
    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attribute>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    /// Returns a copy of this element with a child appended.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Returns a copy of this element with the given children appended.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Value of the first attribute in no namespace with the given local name.
    #[must_use]
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| !a.name.has_namespace() && a.name.local == local)
            .map(|a| a.value.as_str())
    }

    /// Iterate over the element children, skipping text.
    pub fn element_children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Returns true if the element has children and all of them are elements.
    #[must_use]
    pub fn has_element_only_content(&self) -> bool {
        !self.children.is_empty() && self.children.iter().all(Node::is_element)
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// The tree unit: either an element or a run of character data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(Element),
    /// [§ 4.11 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    /// "Text nodes are known as text."
    Text(String),
}

impl Node {
    /// A text node.
    #[must_use]
    pub fn text(data: impl Into<String>) -> Self {
        Self::Text(data.into())
    }

    /// An element node with no attributes and no children.
    #[must_use]
    pub fn element(name: impl Into<Name>) -> Self {
        Self::Element(Element::new(name))
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Get the character data if this node is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(data) => Some(data),
            Self::Element(_) => None,
        }
    }

    /// Returns true for element nodes.
    #[must_use]
    pub const fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }

    /// Returns true for text nodes made only of XML whitespace
    /// (space, tab, line feed, carriage return), including empty text.
    #[must_use]
    pub fn is_whitespace_text(&self) -> bool {
        match self {
            Self::Text(data) => data
                .chars()
                .all(|c| matches!(c, ' ' | '\t' | '\n' | '\r')),
            Self::Element(_) => false,
        }
    }

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// "The descendant text content of a node node is the concatenation of the
    /// data of all the Text node descendants of node, in tree order."
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        for node in self.descendants() {
            if let Self::Text(data) = node {
                result.push_str(data);
            }
        }
        result
    }

    /// Iterate over this node and all of its descendants in tree order.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Node {
    fn from(data: &str) -> Self {
        Self::Text(data.to_string())
    }
}

impl From<String> for Node {
    fn from(data: String) -> Self {
        Self::Text(data)
    }
}

/// Pre-order iterator over a node and its descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Node::Element(element) = node {
            self.stack.extend(element.children.iter().rev());
        }
        Some(node)
    }
}

/// A forest of nodes: the unit the decoder returns and the encoder accepts.
pub type Fragment = Vec<Node>;

/// Concatenate two fragments into a new one, leaving the inputs untouched.
#[must_use]
pub fn concat(first: &[Node], second: &[Node]) -> Fragment {
    first.iter().chain(second).cloned().collect()
}
