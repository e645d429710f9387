//! Polyglot XHTML5 encoder and entity-resolving markup decoder.
//!
//! # Scope
//!
//! This crate implements:
//! - **Decoder**: bytes to a [`Fragment`]
//!   - Encoding detection and transcoding (BOM, `<?xml encoding?>`, override)
//!   - An XML tokenizer ([XML 1.0 § 2](https://www.w3.org/TR/xml/#sec-documents))
//!     that resolves the full HTML5 named character reference table
//!   - Tree construction with namespace resolution
//!     ([Namespaces in XML 1.0](https://www.w3.org/TR/xml-names/))
//!
//! - **Encoder**: a tree to polyglot markup, valid as HTML5 and as XML
//!   - Void elements in `<br />` form, explicit end tags everywhere else
//!   - Optional indentation of element-only content and trailing newline
//!   - Namespace prefix selection through a caller-supplied resolver
//!
//! # Example
//!
//! ```
//! use polyglot_dom::{Element, Node};
//!
//! let tree = Node::from(
//!     Element::new("p")
//!         .with_attr("class", "intro")
//!         .with_child("caf&eacute;")
//!         .with_child(Element::new("br")),
//! );
//! let markup = polyglot_html::to_string(&tree);
//! assert_eq!(markup, r#"<p class="intro">caf&amp;eacute;<br /></p>"#);
//!
//! let decoded = polyglot_html::of_string(None, "<p>caf&eacute;</p>").unwrap();
//! assert_eq!(decoded[0].text_content(), "café");
//! ```
//!
//! # Not Implemented
//!
//! - HTML5 error recovery: input must be well-formed
//! - DTD processing: entities declared in a DOCTYPE are not expanded
//! - Comments and processing instructions are not kept in the tree

/// XML character classes.
pub mod chars;
/// Byte-level encoding detection and transcoding.
pub mod encoding;
/// Decode and encode error types.
pub mod error;
/// Namespace binding scopes shared by the decoder and encoder.
pub mod namespace;
/// Tree construction.
pub mod parser;
/// Polyglot markup serialization.
pub mod serializer;
/// Markup tokenizer.
pub mod tokenizer;

use std::io;

use polyglot_dom::Fragment;

pub use encoding::EncodingError;
pub use error::{DecodeError, EncodeError};
pub use parser::{DecodeOptions, EntityPolicy, TreeBuilder, parse_fragment};
pub use serializer::{
    DOCTYPE, OutputOptions, Serializer, ToMarkup, VOID_ELEMENTS, is_void, to_string_with_options,
};
pub use tokenizer::named_character_references::{lookup_code_point, lookup_entity};
pub use tokenizer::{Token, XmlTokenizer};

/// The canonical HTML5 DOCTYPE, [`DOCTYPE`].
#[must_use]
pub const fn doctype() -> &'static str {
    DOCTYPE
}

/// Serialize `tree` with default options: no indentation, no trailing newline.
#[must_use]
pub fn to_string<T: ToMarkup + ?Sized>(tree: &T) -> String {
    to_string_with_options(tree, &OutputOptions::default())
}

/// Decode markup bytes into a fragment.
///
/// `input` is taken as raw bytes, so a `&str`, a `&[u8]` or a `Vec<u8>` all
/// work. With `encoding` set it overrides sniffing; otherwise the encoding
/// comes from a byte order mark or an `<?xml encoding="..."?>` declaration,
/// falling back to UTF-8.
///
/// # Errors
///
/// Returns [`DecodeError::Encoding`] if the bytes cannot be decoded,
/// [`DecodeError::MalformedMarkup`] if the markup is not well-formed and
/// [`DecodeError::UnknownEntity`] for a named reference outside the HTML5 table.
pub fn of_string(encoding: Option<&str>, input: impl AsRef<[u8]>) -> Result<Fragment, DecodeError> {
    let options = DecodeOptions {
        encoding: encoding.map(str::to_string),
        ..DecodeOptions::default()
    };
    decode_with_options(input.as_ref(), &options)
}

/// Decode markup bytes with explicit options.
///
/// # Errors
///
/// See [`of_string`]. With [`EntityPolicy::PassThrough`] unknown entities are
/// kept as text instead of failing.
pub fn decode_with_options(bytes: &[u8], options: &DecodeOptions) -> Result<Fragment, DecodeError> {
    let text = encoding::decode_bytes(bytes, options.encoding.as_deref())?;
    parse_fragment(&text, options)
}

/// Write polyglot markup for `tree` to `sink`.
///
/// # Errors
///
/// Returns [`EncodeError::Io`] if the sink fails.
pub fn output<W, T>(
    options: Option<&OutputOptions>,
    sink: &mut W,
    tree: &T,
) -> Result<(), EncodeError>
where
    W: io::Write + ?Sized,
    T: ToMarkup + ?Sized,
{
    serializer::write_markup(sink, tree, options.unwrap_or(&OutputOptions::default()), false)
}

/// Like [`output`], with [`DOCTYPE`] written first on a line of its own.
///
/// # Errors
///
/// Returns [`EncodeError::Io`] if the sink fails.
pub fn output_doc<W, T>(
    options: Option<&OutputOptions>,
    sink: &mut W,
    tree: &T,
) -> Result<(), EncodeError>
where
    W: io::Write + ?Sized,
    T: ToMarkup + ?Sized,
{
    serializer::write_markup(sink, tree, options.unwrap_or(&OutputOptions::default()), true)
}
