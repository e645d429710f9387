//! [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
//!
//! "Void elements only have a start tag; end tags must not be specified for
//! void elements." In polyglot markup the start tag is written in the XML
//! empty-element form, `<br />`.

use polyglot_dom::{Name, XHTML_NAMESPACE};

/// The void element names, sorted. `keygen` and `param` are obsolete in
/// current HTML but still parse as void, so they are kept.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta",
    "param", "source", "track", "wbr",
];

/// Returns true if `local` is the local name of a void element.
///
/// Matching is exact: `BR` is not void.
#[must_use]
pub fn is_void_local_name(local: &str) -> bool {
    VOID_ELEMENTS.binary_search(&local).is_ok()
}

/// Returns true if an element named `name` must be written as `<name />`.
///
/// Only names in no namespace or the XHTML namespace can be void; an SVG
/// `<image>` or a custom-namespace `<br>` is an ordinary element.
#[must_use]
pub fn is_void(name: &Name) -> bool {
    (name.namespace.is_empty() || name.namespace == XHTML_NAMESPACE) && is_void_local_name(&name.local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_sorted() {
        assert!(VOID_ELEMENTS.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(VOID_ELEMENTS.len(), 15);
    }
}
