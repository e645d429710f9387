//! In-scope namespace bindings.
//!
//! [Namespaces in XML 1.0 § 6.1 Namespace Scoping](https://www.w3.org/TR/xml-names/#scoping)
//!
//! "The scope of a namespace declaration declaring a prefix extends from the
//! beginning of the start-tag in which it appears to the end of the
//! corresponding end-tag". The tree builder uses this to resolve prefixes while
//! reading; the serializer uses it to decide which declarations it must write.

use polyglot_dom::{XML_NAMESPACE, XMLNS_NAMESPACE};

/// A stack of namespace declarations, one frame per open element.
///
/// The empty prefix stands for the default namespace; binding it to the empty
/// URI undeclares the default. The `xml` and `xmlns` prefixes are always bound.
#[derive(Debug, Clone)]
pub struct NamespaceScopes {
    bindings: Vec<(String, String)>,
    frames: Vec<usize>,
}

impl Default for NamespaceScopes {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceScopes {
    /// Bindings with only the predeclared `xml` and `xmlns` prefixes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: vec![
                ("xml".to_string(), XML_NAMESPACE.to_string()),
                ("xmlns".to_string(), XMLNS_NAMESPACE.to_string()),
            ],
            frames: Vec::new(),
        }
    }

    /// Open a frame for an element's declarations.
    pub fn push_scope(&mut self) {
        self.frames.push(self.bindings.len());
    }

    /// Discard every binding made since the matching [`push_scope`](Self::push_scope).
    pub fn pop_scope(&mut self) {
        if let Some(mark) = self.frames.pop() {
            self.bindings.truncate(mark);
        }
    }

    /// Bind `prefix` (empty for the default namespace) to `uri` in the current frame.
    pub fn bind(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.bindings.push((prefix.into(), uri.into()));
    }

    /// The namespace URI `prefix` is bound to, innermost binding first.
    ///
    /// For the empty prefix this is the default namespace, which may be the
    /// empty string when it has been undeclared.
    #[must_use]
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// The current default namespace; empty when none is declared.
    #[must_use]
    pub fn default_namespace(&self) -> &str {
        self.resolve("").unwrap_or_default()
    }

    /// A non-empty prefix currently bound to `uri` that is not shadowed by an
    /// inner binding of the same prefix.
    #[must_use]
    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .filter(|(p, u)| !p.is_empty() && u == uri)
            .map(|(p, _)| p.as_str())
            .find(|p| self.resolve(p) == Some(uri))
    }

    /// Whether `prefix` is bound in the innermost frame.
    #[must_use]
    pub fn is_bound_in_current_scope(&self, prefix: &str) -> bool {
        let start = self.frames.last().copied().unwrap_or(0);
        self.bindings[start..].iter().any(|(p, _)| p == prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predeclared_prefixes() {
        let scopes = NamespaceScopes::new();
        assert_eq!(scopes.resolve("xml"), Some(XML_NAMESPACE));
        assert_eq!(scopes.resolve("xmlns"), Some(XMLNS_NAMESPACE));
        assert_eq!(scopes.resolve("svg"), None);
        assert_eq!(scopes.default_namespace(), "");
    }

    #[test]
    fn test_scoping_and_shadowing() {
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope();
        scopes.bind("a", "urn:one");
        scopes.bind("", "urn:default");
        assert_eq!(scopes.prefix_for("urn:one"), Some("a"));

        scopes.push_scope();
        scopes.bind("a", "urn:two");
        assert_eq!(scopes.resolve("a"), Some("urn:two"));
        assert_eq!(scopes.prefix_for("urn:one"), None);
        assert_eq!(scopes.default_namespace(), "urn:default");
        assert!(scopes.is_bound_in_current_scope("a"));
        assert!(!scopes.is_bound_in_current_scope(""));

        scopes.pop_scope();
        assert_eq!(scopes.resolve("a"), Some("urn:one"));
        scopes.pop_scope();
        assert_eq!(scopes.resolve("a"), None);
    }

    #[test]
    fn test_undeclared_default() {
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope();
        scopes.bind("", "urn:x");
        scopes.push_scope();
        scopes.bind("", "");
        assert_eq!(scopes.default_namespace(), "");
    }
}
