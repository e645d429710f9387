use polyglot_common::SourcePosition;

/// An attribute on a start tag token, before namespace resolution.
///
/// [XML 1.0 § 3.1](https://www.w3.org/TR/xml/#sec-starttags):
/// "Attribute ::= Name Eq AttValue"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The qualified name exactly as written (`class`, `xml:lang`, `xmlns:svg`).
    pub name: String,
    /// The value with character references resolved and whitespace normalised.
    pub value: String,
    /// Where the attribute name starts.
    pub position: SourcePosition,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String, position: SourcePosition) -> Self {
        Self {
            name,
            value,
            position,
        }
    }
}

/// The tokens produced by [`XmlTokenizer`](super::XmlTokenizer).
///
/// Every token records the position of its first character (`<` for markup,
/// the first character for text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<!DOCTYPE name ...>`. Public/system identifiers and any internal subset
    /// are skipped.
    Doctype {
        /// The root element name given by the declaration.
        name: String,
        /// Position of the `<`.
        position: SourcePosition,
    },

    /// [XML 1.0 § 3.1](https://www.w3.org/TR/xml/#sec-starttags):
    /// "STag ::= '<' Name (S Attribute)* S? '>'"
    /// "EmptyElemTag ::= '<' Name (S Attribute)* S? '/>'"
    StartTag {
        /// The qualified tag name as written.
        name: String,
        /// Set for the `<name/>` form.
        self_closing: bool,
        /// Attributes in source order.
        attributes: Vec<Attribute>,
        /// Position of the `<`.
        position: SourcePosition,
    },

    /// [XML 1.0 § 3.1](https://www.w3.org/TR/xml/#sec-starttags):
    /// "ETag ::= '</' Name S? '>'"
    EndTag {
        /// The qualified tag name as written.
        name: String,
        /// Position of the `<`.
        position: SourcePosition,
    },

    /// Character data: text, resolved references and CDATA sections, merged.
    Text {
        /// The decoded characters.
        data: String,
        /// Position of the first character.
        position: SourcePosition,
    },

    /// `<!-- data -->`
    Comment {
        /// The comment body.
        data: String,
        /// Position of the `<`.
        position: SourcePosition,
    },

    /// `<?target data?>`, including the `<?xml ...?>` declaration.
    ProcessingInstruction {
        /// The PI target.
        target: String,
        /// Everything after the target, leading whitespace removed.
        data: String,
        /// Position of the `<`.
        position: SourcePosition,
    },

    /// End-of-file token signals the end of input.
    EndOfFile {
        /// Position just past the last character.
        position: SourcePosition,
    },
}

impl Token {
    /// Create a start tag token with an empty name.
    #[must_use]
    pub const fn new_start_tag(position: SourcePosition) -> Self {
        Self::StartTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
            position,
        }
    }

    /// Create an end tag token with an empty name.
    #[must_use]
    pub const fn new_end_tag(position: SourcePosition) -> Self {
        Self::EndTag {
            name: String::new(),
            position,
        }
    }

    /// Returns the position of the token's first character.
    #[must_use]
    pub const fn position(&self) -> SourcePosition {
        match self {
            Self::Doctype { position, .. }
            | Self::StartTag { position, .. }
            | Self::EndTag { position, .. }
            | Self::Text { position, .. }
            | Self::Comment { position, .. }
            | Self::ProcessingInstruction { position, .. }
            | Self::EndOfFile { position } => *position,
        }
    }

    /// Returns true if this is an end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile { .. })
    }

    /// Append a character to the tag name of a start or end tag token.
    /// Other tokens are left unchanged.
    pub fn append_to_tag_name(&mut self, c: char) {
        if let Self::StartTag { name, .. } | Self::EndTag { name, .. } = self {
            name.push(c);
        }
    }

    /// The tag name of a start or end tag token.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Set the self-closing flag of a start tag token.
    pub const fn set_self_closing(&mut self) {
        if let Self::StartTag { self_closing, .. } = self {
            *self_closing = true;
        }
    }

    /// Start a new attribute with an empty name and value on a start tag token.
    pub fn start_new_attribute(&mut self, position: SourcePosition) {
        if let Self::StartTag { attributes, .. } = self {
            attributes.push(Attribute::new(String::new(), String::new(), position));
        }
    }

    /// Append a character to the name of the attribute being built.
    pub fn append_to_current_attribute_name(&mut self, c: char) {
        if let Some(attr) = self.current_attribute_mut() {
            attr.name.push(c);
        }
    }

    /// Append text to the value of the attribute being built.
    pub fn append_to_current_attribute_value(&mut self, s: &str) {
        if let Some(attr) = self.current_attribute_mut() {
            attr.value.push_str(s);
        }
    }

    /// Name of the attribute being built.
    #[must_use]
    pub fn current_attribute_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { attributes, .. } => attributes.last().map(|a| a.name.as_str()),
            _ => None,
        }
    }

    fn current_attribute_mut(&mut self) -> Option<&mut Attribute> {
        match self {
            Self::StartTag { attributes, .. } => attributes.last_mut(),
            _ => None,
        }
    }
}
