//! Markup tokenizer module.
//!
//! Implements the lexical layer of [XML 1.0 (Fifth Edition)](https://www.w3.org/TR/xml/)
//! with HTML5 named character references in place of DTD-declared entities.

/// Character reference resolution per XML 1.0 § 4.1.
pub mod character_reference;
/// Tokenizer state machine implementation.
pub mod core;
mod entity_data;
/// Helper methods for tokenizer state transitions and scanning.
pub mod helpers;
/// Named character reference lookup table per HTML § 13.5.
pub mod named_character_references;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::{TokenizerState, XmlTokenizer};
pub use token::{Attribute, Token};
