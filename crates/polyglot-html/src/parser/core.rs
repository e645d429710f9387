use std::mem;

use polyglot_common::SourcePosition;
use polyglot_dom::{Attribute, Element, Fragment, Name, Node, XML_NAMESPACE, XMLNS_NAMESPACE};

use crate::chars::is_xml_name;
use crate::error::DecodeError;
use crate::namespace::NamespaceScopes;
use crate::tokenizer::{self, Token};

/// An element whose end tag has not been seen yet.
#[derive(Debug)]
struct OpenElement {
    /// The tag name as written, matched against the end tag.
    tag_name: String,
    element: Element,
    position: SourcePosition,
}

/// [Namespaces in XML 1.0](https://www.w3.org/TR/xml-names/) tree construction.
///
/// Builds a [`Fragment`] from the token stream with an explicit stack of open
/// elements. Each start tag opens a namespace scope; prefixes are resolved
/// against the declarations in scope when the tag is read.
///
/// Comments, processing instructions and the DOCTYPE carry no tree content
/// and are skipped.
pub struct TreeBuilder {
    tokens: Vec<Token>,
    stack_of_open_elements: Vec<OpenElement>,
    /// Nodes completed at the top level.
    roots: Fragment,
    scopes: NamespaceScopes,
    seen_element: bool,
    preserve_whitespace: bool,
}

impl TreeBuilder {
    /// Create a tree builder over a complete token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            stack_of_open_elements: Vec::new(),
            roots: Vec::new(),
            scopes: NamespaceScopes::new(),
            seen_element: false,
            preserve_whitespace: false,
        }
    }

    /// Keep text nodes made only of whitespace instead of dropping them.
    #[must_use]
    pub const fn with_preserve_whitespace(mut self, preserve: bool) -> Self {
        self.preserve_whitespace = preserve;
        self
    }

    /// Process every token and return the finished fragment.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MalformedMarkup`] for a mismatched or stray end
    /// tag, an element left open at end of input, an unbound namespace prefix,
    /// an invalid namespace declaration, or a DOCTYPE after the first element.
    pub fn run(mut self) -> Result<Fragment, DecodeError> {
        let tokens = mem::take(&mut self.tokens);
        for token in tokens {
            match token {
                Token::StartTag {
                    name,
                    self_closing,
                    attributes,
                    position,
                } => self.handle_start_tag(name, self_closing, attributes, position)?,
                Token::EndTag { name, position } => self.handle_end_tag(&name, position)?,
                Token::Text { data, .. } => self.insert_text(data),
                Token::Doctype { position, .. } => {
                    if self.seen_element {
                        return Err(DecodeError::malformed(
                            position,
                            "DOCTYPE must come before the first element",
                        ));
                    }
                }
                Token::Comment { .. } | Token::ProcessingInstruction { .. } => {}
                Token::EndOfFile { position } => {
                    if let Some(open) = self.stack_of_open_elements.last() {
                        return Err(DecodeError::malformed(
                            position,
                            format!(
                                "unexpected end of input: <{}> opened at {} is not closed",
                                open.tag_name, open.position
                            ),
                        ));
                    }
                    break;
                }
            }
        }
        let roots = mem::take(&mut self.roots);
        Ok(self.finish_children(roots))
    }

    fn handle_start_tag(
        &mut self,
        tag_name: String,
        self_closing: bool,
        attributes: Vec<tokenizer::Attribute>,
        position: SourcePosition,
    ) -> Result<(), DecodeError> {
        self.seen_element = true;
        self.scopes.push_scope();

        // Declarations on this tag are in scope for its own name and attributes.
        // They only bind prefixes; the resolved names carry the namespaces.
        let mut others = Vec::with_capacity(attributes.len());
        for attr in attributes {
            if attr.name == "xmlns" {
                self.declare("", &attr.value, attr.position)?;
            } else if let Some(prefix) = attr.name.strip_prefix("xmlns:") {
                if prefix.is_empty() {
                    return Err(DecodeError::malformed(
                        attr.position,
                        "'xmlns:' declares an empty prefix",
                    ));
                }
                self.declare(prefix, &attr.value, attr.position)?;
            } else {
                others.push(attr);
            }
        }

        let name = self.resolve_element_name(&tag_name, position)?;
        let mut attrs = Vec::with_capacity(others.len());
        for attr in others {
            let attr_name = self.resolve_attribute_name(&attr.name, attr.position)?;
            attrs.push(Attribute::new(attr_name, attr.value));
        }
        let element = Element::new(name).with_attrs(attrs);

        if self_closing {
            self.scopes.pop_scope();
            self.insert_node(Node::Element(element));
        } else {
            self.stack_of_open_elements.push(OpenElement {
                tag_name,
                element,
                position,
            });
        }
        Ok(())
    }

    /// [XML 1.0 § 3](https://www.w3.org/TR/xml/#sec-logical-struct)
    ///
    /// "The Name in an element's end-tag MUST match the element type in the start-tag."
    fn handle_end_tag(&mut self, name: &str, position: SourcePosition) -> Result<(), DecodeError> {
        let Some(open) = self.stack_of_open_elements.pop() else {
            return Err(DecodeError::malformed(
                position,
                format!("end tag </{name}> has no matching start tag"),
            ));
        };
        if open.tag_name != name {
            return Err(DecodeError::malformed(
                position,
                format!(
                    "mismatched end tag: expected </{}> (opened at {}), found </{name}>",
                    open.tag_name, open.position
                ),
            ));
        }

        self.scopes.pop_scope();
        let mut element = open.element;
        element.children = self.finish_children(element.children);
        self.insert_node(Node::Element(element));
        Ok(())
    }

    /// Append character data to the current node, merging with a preceding text node.
    fn insert_text(&mut self, data: String) {
        let children = self.current_children();
        if let Some(Node::Text(existing)) = children.last_mut() {
            existing.push_str(&data);
        } else {
            children.push(Node::Text(data));
        }
    }

    fn insert_node(&mut self, node: Node) {
        self.current_children().push(node);
    }

    /// Children of the innermost open element, or the top-level fragment.
    fn current_children(&mut self) -> &mut Vec<Node> {
        match self.stack_of_open_elements.last_mut() {
            Some(open) => &mut open.element.children,
            None => &mut self.roots,
        }
    }

    fn finish_children(&self, children: Vec<Node>) -> Vec<Node> {
        if self.preserve_whitespace {
            children
        } else {
            children
                .into_iter()
                .filter(|node| !node.is_whitespace_text())
                .collect()
        }
    }

    /// [Namespaces in XML 1.0 § 3](https://www.w3.org/TR/xml-names/#ns-decl)
    ///
    /// "The prefix xml is by definition bound to the namespace name
    /// http://www.w3.org/XML/1998/namespace. ... The prefix xmlns is used only
    /// to declare namespace bindings and is by definition bound to the
    /// namespace name http://www.w3.org/2000/xmlns/. It MUST NOT be declared."
    fn declare(
        &mut self,
        prefix: &str,
        uri: &str,
        position: SourcePosition,
    ) -> Result<(), DecodeError> {
        let problem = match prefix {
            "xmlns" => Some("the xmlns prefix cannot be declared".to_string()),
            "xml" if uri != XML_NAMESPACE => {
                Some("the xml prefix cannot be bound to another namespace".to_string())
            }
            _ if uri == XMLNS_NAMESPACE => {
                Some(format!("{XMLNS_NAMESPACE} cannot be bound to a prefix"))
            }
            _ if uri == XML_NAMESPACE && prefix != "xml" => {
                Some(format!("{XML_NAMESPACE} can only be bound to the xml prefix"))
            }
            p if !p.is_empty() && uri.is_empty() => {
                Some(format!("prefix '{p}' cannot be bound to an empty namespace"))
            }
            p if !p.is_empty() && !is_ncname(p) => {
                Some(format!("'{p}' is not a valid namespace prefix"))
            }
            _ => None,
        };
        if let Some(detail) = problem {
            return Err(DecodeError::malformed(position, detail));
        }
        self.scopes.bind(prefix, uri);
        Ok(())
    }

    fn resolve_element_name(
        &self,
        qname: &str,
        position: SourcePosition,
    ) -> Result<Name, DecodeError> {
        match split_qname(qname, position)? {
            (None, local) => Ok(Name::qualified(self.scopes.default_namespace(), local)),
            (Some(prefix), local) => Ok(Name::qualified(self.bound_uri(prefix, position)?, local)),
        }
    }

    /// Unprefixed attributes are in no namespace.
    fn resolve_attribute_name(
        &self,
        qname: &str,
        position: SourcePosition,
    ) -> Result<Name, DecodeError> {
        match split_qname(qname, position)? {
            (None, local) => Ok(Name::local(local)),
            (Some(prefix), local) => Ok(Name::qualified(self.bound_uri(prefix, position)?, local)),
        }
    }

    fn bound_uri(&self, prefix: &str, position: SourcePosition) -> Result<&str, DecodeError> {
        self.scopes
            .resolve(prefix)
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| {
                DecodeError::malformed(position, format!("namespace prefix '{prefix}' is not bound"))
            })
    }
}

/// "QName ::= PrefixedName | UnprefixedName"
fn split_qname(qname: &str, position: SourcePosition) -> Result<(Option<&str>, &str), DecodeError> {
    match qname.split_once(':') {
        None => Ok((None, qname)),
        Some((prefix, local)) if is_ncname(prefix) && is_ncname(local) => {
            Ok((Some(prefix), local))
        }
        Some(_) => Err(DecodeError::malformed(
            position,
            format!("'{qname}' is not a valid qualified name"),
        )),
    }
}

/// "NCName ::= Name - (Char* ':' Char*)"
fn is_ncname(s: &str) -> bool {
    is_xml_name(s) && !s.contains(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_qname() {
        let pos = SourcePosition::START;
        assert_eq!(split_qname("p", pos).unwrap(), (None, "p"));
        assert_eq!(split_qname("svg:rect", pos).unwrap(), (Some("svg"), "rect"));
        assert!(split_qname("a:b:c", pos).is_err());
        assert!(split_qname(":a", pos).is_err());
        assert!(split_qname("a:", pos).is_err());
    }
}
