use strum_macros::Display;

/// What the decoder does with `&name;` when `name` is not a standard HTML5
/// named character reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum EntityPolicy {
    /// Fail with [`DecodeError::UnknownEntity`](crate::error::DecodeError::UnknownEntity).
    #[default]
    Strict,
    /// Keep the reference verbatim as text and report a warning.
    PassThrough,
}

/// Decoder configuration.
///
/// The default sniffs the encoding, rejects unknown entities and drops
/// whitespace-only text nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Encoding label that overrides sniffing (`"utf-8"`, `"latin1"`, ...).
    pub encoding: Option<String>,
    /// Treatment of unknown named references.
    pub entities: EntityPolicy,
    /// Keep text nodes made only of whitespace.
    pub preserve_whitespace: bool,
}

impl DecodeOptions {
    /// Default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode with the given encoding instead of sniffing one.
    #[must_use]
    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Set the unknown-entity policy.
    #[must_use]
    pub const fn with_entities(mut self, policy: EntityPolicy) -> Self {
        self.entities = policy;
        self
    }

    /// Keep or drop whitespace-only text nodes.
    #[must_use]
    pub const fn with_preserve_whitespace(mut self, preserve: bool) -> Self {
        self.preserve_whitespace = preserve;
        self
    }
}
