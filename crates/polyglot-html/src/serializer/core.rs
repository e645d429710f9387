use std::fmt::{self, Write};

use polyglot_common::warning::warn_once;
use polyglot_dom::{Element, Name, Node, XML_NAMESPACE, XMLNS_NAMESPACE};

use super::escape::{write_attribute_value, write_text};
use super::options::OutputOptions;
use super::void_elements::is_void;
use crate::chars::is_xml_name;
use crate::namespace::NamespaceScopes;

/// Something the serializer can write: a node, an element or a fragment.
pub trait ToMarkup {
    /// Write `self` through `serializer`, without the trailing newline.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying writer.
    fn write_markup<W: Write>(&self, serializer: &mut Serializer<'_, W>) -> fmt::Result;
}

impl ToMarkup for Node {
    fn write_markup<W: Write>(&self, serializer: &mut Serializer<'_, W>) -> fmt::Result {
        serializer.serialize_node(self, 0)
    }
}

impl ToMarkup for Element {
    fn write_markup<W: Write>(&self, serializer: &mut Serializer<'_, W>) -> fmt::Result {
        serializer.serialize_element(self, 0)
    }
}

impl ToMarkup for [Node] {
    fn write_markup<W: Write>(&self, serializer: &mut Serializer<'_, W>) -> fmt::Result {
        serializer.serialize_fragment(self)
    }
}

impl ToMarkup for Vec<Node> {
    fn write_markup<W: Write>(&self, serializer: &mut Serializer<'_, W>) -> fmt::Result {
        serializer.serialize_fragment(self)
    }
}

/// Writes trees as polyglot XHTML5 markup.
///
/// Output parses as HTML5 and as namespace-well-formed XML:
/// - void elements are written `<br />` and never get an end tag
/// - every other element gets an explicit end tag, even when empty
/// - attribute values are always double-quoted
/// - namespace declarations are added where a namespaced name needs one
pub struct Serializer<'a, W: Write> {
    out: &'a mut W,
    options: &'a OutputOptions,
    scopes: NamespaceScopes,
    generated_prefixes: usize,
}

/// A namespace declaration the tree does not carry but the output needs.
struct Declaration {
    prefix: String,
    uri: String,
}

impl<'a, W: Write> Serializer<'a, W> {
    /// Create a serializer writing to `out`.
    #[must_use]
    pub fn new(out: &'a mut W, options: &'a OutputOptions) -> Self {
        Self {
            out,
            options,
            scopes: NamespaceScopes::new(),
            generated_prefixes: 0,
        }
    }

    /// Write `tree`, followed by a newline if the options ask for one.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying writer.
    pub fn serialize<T: ToMarkup + ?Sized>(&mut self, tree: &T) -> fmt::Result {
        tree.write_markup(self)?;
        if self.options.nl {
            self.out.write_char('\n')?;
        }
        Ok(())
    }

    /// Write a sequence of top-level nodes.
    ///
    /// With indentation on, a fragment made only of elements puts each
    /// element on its own line.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying writer.
    pub fn serialize_fragment(&mut self, nodes: &[Node]) -> fmt::Result {
        let one_per_line = self.options.indent.is_some() && nodes.iter().all(Node::is_element);
        for (i, node) in nodes.iter().enumerate() {
            if one_per_line && i > 0 {
                self.out.write_char('\n')?;
            }
            self.serialize_node(node, 0)?;
        }
        Ok(())
    }

    /// Write one node nested `depth` levels deep.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying writer.
    pub fn serialize_node(&mut self, node: &Node, depth: usize) -> fmt::Result {
        match node {
            Node::Element(element) => self.serialize_element(element, depth),
            Node::Text(data) => write_text(self.out, data),
        }
    }

    /// Write an element and its subtree nested `depth` levels deep.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying writer.
    pub fn serialize_element(&mut self, element: &Element, depth: usize) -> fmt::Result {
        self.scopes.push_scope();
        let result = self.write_element(element, depth);
        self.scopes.pop_scope();
        result
    }

    fn write_element(&mut self, element: &Element, depth: usize) -> fmt::Result {
        // Declarations carried by the tree are in scope for the element's own name.
        for attr in element.attrs.iter().filter(|a| a.name.is_namespace_declaration()) {
            let prefix = if attr.name.local == "xmlns" {
                ""
            } else {
                attr.name.local.as_str()
            };
            self.scopes.bind(prefix, attr.value.clone());
        }

        let mut declarations = Vec::new();
        let tag_name = self.element_qname(&element.name, &mut declarations);
        let attr_names: Vec<String> = element
            .attrs
            .iter()
            .map(|attr| self.attribute_qname(&attr.name, &mut declarations))
            .collect();

        self.out.write_char('<')?;
        self.out.write_str(&tag_name)?;
        for (attr, name) in element.attrs.iter().zip(&attr_names) {
            self.write_attribute(name, &attr.value)?;
        }
        for declaration in &declarations {
            let name = if declaration.prefix.is_empty() {
                "xmlns".to_string()
            } else {
                format!("xmlns:{}", declaration.prefix)
            };
            self.write_attribute(&name, &declaration.uri)?;
        }

        if is_void(&element.name) {
            if !element.children.is_empty() {
                warn_once(
                    "Encoder",
                    "void elements were given children; the children were not written",
                );
            }
            return self.out.write_str(" />");
        }

        self.out.write_char('>')?;
        match self.options.indent {
            Some(width) if element.has_element_only_content() => {
                for child in &element.children {
                    self.write_newline_and_indent(width * (depth + 1))?;
                    self.serialize_node(child, depth + 1)?;
                }
                self.write_newline_and_indent(width * depth)?;
            }
            _ => {
                for child in &element.children {
                    self.serialize_node(child, depth + 1)?;
                }
            }
        }
        write!(self.out, "</{tag_name}>")
    }

    fn write_attribute(&mut self, name: &str, value: &str) -> fmt::Result {
        write!(self.out, " {name}=\"")?;
        write_attribute_value(self.out, value)?;
        self.out.write_char('"')
    }

    fn write_newline_and_indent(&mut self, columns: usize) -> fmt::Result {
        write!(self.out, "\n{:columns$}", "")
    }

    /// [Namespaces in XML 1.0 § 6.2](https://www.w3.org/TR/xml-names/#defaulting)
    ///
    /// "A default namespace declaration applies to all unprefixed element
    /// names within its scope."
    fn element_qname(&mut self, name: &Name, declarations: &mut Vec<Declaration>) -> String {
        let namespace = name.namespace.as_str();
        let local = name.local.as_str();

        if namespace == self.scopes.default_namespace() {
            return local.to_string();
        }
        if namespace.is_empty() {
            // The default namespace has to be undeclared for this element.
            if !self.declare("", "", declarations) {
                warn_once(
                    "Encoder",
                    "an element in no namespace declares a default namespace on itself",
                );
            }
            return local.to_string();
        }
        if let Some(prefix) = self.bound_prefix(namespace) {
            return format!("{prefix}:{local}");
        }
        if let Some(prefix) = self.resolver_prefix(namespace, declarations) {
            return format!("{prefix}:{local}");
        }
        if self.declare("", namespace, declarations) {
            return local.to_string();
        }
        let prefix = self.generate_prefix(namespace, declarations);
        format!("{prefix}:{local}")
    }

    /// [Namespaces in XML 1.0 § 6.2](https://www.w3.org/TR/xml-names/#defaulting)
    ///
    /// "Default namespace declarations do not apply directly to attribute
    /// names", so a namespaced attribute always needs a prefix.
    fn attribute_qname(&mut self, name: &Name, declarations: &mut Vec<Declaration>) -> String {
        let namespace = name.namespace.as_str();
        let local = name.local.as_str();

        if namespace.is_empty() {
            return local.to_string();
        }
        if namespace == XMLNS_NAMESPACE {
            return if local == "xmlns" {
                local.to_string()
            } else {
                format!("xmlns:{local}")
            };
        }
        if let Some(prefix) = self.bound_prefix(namespace) {
            return format!("{prefix}:{local}");
        }
        if let Some(prefix) = self.resolver_prefix(namespace, declarations) {
            return format!("{prefix}:{local}");
        }
        let prefix = self.generate_prefix(namespace, declarations);
        format!("{prefix}:{local}")
    }

    fn bound_prefix(&self, namespace: &str) -> Option<String> {
        if namespace == XML_NAMESPACE {
            return Some("xml".to_string());
        }
        self.scopes.prefix_for(namespace).map(str::to_string)
    }

    /// Ask the caller's resolver and declare its answer if it can be used here.
    fn resolver_prefix(
        &mut self,
        namespace: &str,
        declarations: &mut Vec<Declaration>,
    ) -> Option<String> {
        let prefix = self.options.preferred_prefix(namespace)?;
        let usable = is_xml_name(&prefix)
            && !prefix.contains(':')
            && !prefix.eq_ignore_ascii_case("xml")
            && !prefix.eq_ignore_ascii_case("xmlns");
        if !usable {
            warn_once(
                "Encoder",
                "namespace prefixes that are not valid NCNames were ignored",
            );
            return None;
        }
        self.declare(&prefix, namespace, declarations)
            .then_some(prefix)
    }

    fn generate_prefix(&mut self, namespace: &str, declarations: &mut Vec<Declaration>) -> String {
        loop {
            self.generated_prefixes += 1;
            let prefix = format!("ns{}", self.generated_prefixes);
            if self.scopes.resolve(&prefix).is_none() && self.declare(&prefix, namespace, declarations)
            {
                return prefix;
            }
        }
    }

    /// Bind `prefix` for this element and remember to write the declaration.
    /// Fails if this element already declares `prefix`.
    fn declare(&mut self, prefix: &str, uri: &str, declarations: &mut Vec<Declaration>) -> bool {
        if self.scopes.is_bound_in_current_scope(prefix) {
            return false;
        }
        self.scopes.bind(prefix, uri);
        declarations.push(Declaration {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
        });
        true
    }
}
