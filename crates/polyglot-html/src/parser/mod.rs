//! Tree construction from markup text.

/// Tree builder implementation.
pub mod core;
/// Decoder configuration.
pub mod options;

use polyglot_dom::Fragment;

pub use self::core::TreeBuilder;
pub use options::{DecodeOptions, EntityPolicy};

use crate::error::DecodeError;
use crate::tokenizer::XmlTokenizer;

/// Decode already-transcoded markup text into a fragment.
///
/// `options.encoding` is ignored here; see [`crate::decode_with_options`] for
/// byte input.
///
/// # Errors
///
/// Returns the first [`DecodeError`] found by the tokenizer or tree builder.
pub fn parse_fragment(text: &str, options: &DecodeOptions) -> Result<Fragment, DecodeError> {
    let mut tokenizer = XmlTokenizer::new(text).with_entity_policy(options.entities);
    tokenizer.run()?;
    TreeBuilder::new(tokenizer.into_tokens())
        .with_preserve_whitespace(options.preserve_whitespace)
        .run()
}
