use std::fmt;
use std::sync::Arc;

/// Maps a namespace URI to the prefix the caller wants for it.
pub type NamespacePrefixResolver = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Encoder configuration.
///
/// The default writes everything on one line with no trailing newline and no
/// custom namespace prefixes.
#[derive(Clone, Default)]
pub struct OutputOptions {
    /// End the output with a single newline.
    pub nl: bool,
    /// Indentation width per nesting level; `None` disables pretty-printing.
    pub indent: Option<usize>,
    /// Preferred prefixes for namespaces that have no binding in scope.
    pub ns_prefix: Option<NamespacePrefixResolver>,
}

impl OutputOptions {
    /// Default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the trailing newline.
    #[must_use]
    pub const fn with_nl(mut self, nl: bool) -> Self {
        self.nl = nl;
        self
    }

    /// Indent element-only content by `width` spaces per level.
    #[must_use]
    pub const fn with_indent(mut self, width: usize) -> Self {
        self.indent = Some(width);
        self
    }

    /// Use `resolver` to choose prefixes for namespaced names.
    ///
    /// Returning `None`, an empty string or an invalid prefix falls back to a
    /// default-namespace declaration for elements and a generated prefix for
    /// attributes.
    #[must_use]
    pub fn with_ns_prefix<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.ns_prefix = Some(Arc::new(resolver));
        self
    }

    /// Ask the resolver, if any, for the preferred prefix of `namespace`.
    #[must_use]
    pub fn preferred_prefix(&self, namespace: &str) -> Option<String> {
        self.ns_prefix.as_ref().and_then(|resolver| resolver(namespace))
    }
}

impl fmt::Debug for OutputOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputOptions")
            .field("nl", &self.nl)
            .field("indent", &self.indent)
            .field("ns_prefix", &self.ns_prefix.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
