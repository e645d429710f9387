//! Character reference resolution for the markup tokenizer.
//!
//! [XML 1.0 § 4.1 Character and Entity References](https://www.w3.org/TR/xml/#sec-references)
//!
//! "CharRef ::= '&#' [0-9]+ ';' | '&#x' [0-9a-fA-F]+ ';'"
//! "EntityRef ::= '&' Name ';'"
//!
//! Named references resolve against the HTML5 table instead of declared
//! entities. Every reference must end with `;`.

use polyglot_common::warning::warn_once;

use super::core::XmlTokenizer;
use super::named_character_references::lookup_entity;
use crate::chars::is_xml_char;
use crate::error::DecodeError;
use crate::parser::EntityPolicy;

impl XmlTokenizer {
    /// Resolve the reference whose `&` was just consumed and return its
    /// replacement text.
    ///
    /// Errors are reported at the position of the `&`.
    pub(super) fn consume_character_reference(&mut self) -> Result<String, DecodeError> {
        let start = self.current_char_position;

        if self.peek_codepoint(0) == Some('#') {
            self.bump('#');
            return self.consume_numeric_character_reference().map(String::from);
        }

        let mut name = String::new();
        while let Some(c) = self.peek_codepoint(0).filter(char::is_ascii_alphanumeric) {
            self.bump(c);
            name.push(c);
        }
        if name.is_empty() {
            return Err(DecodeError::malformed(
                start,
                "'&' must start a character reference; write &amp; for a literal '&'",
            ));
        }
        if self.peek_codepoint(0) != Some(';') {
            return Err(DecodeError::malformed(
                start,
                format!("character reference &{name} is missing its terminating ';'"),
            ));
        }
        self.bump(';');

        if let Some(replacement) = lookup_entity(&name) {
            return Ok(replacement.to_string());
        }
        match self.entity_policy {
            EntityPolicy::Strict => Err(DecodeError::UnknownEntity {
                name,
                position: start,
            }),
            EntityPolicy::PassThrough => {
                warn_once("Decoder", "unknown named entities were kept as literal text");
                Ok(format!("&{name};"))
            }
        }
    }

    /// Numeric reference after `&#`. A lowercase `x` selects hexadecimal.
    fn consume_numeric_character_reference(&mut self) -> Result<char, DecodeError> {
        let start = self.current_char_position;
        let radix = match self.peek_codepoint(0) {
            Some('x') => {
                self.bump('x');
                16
            }
            Some('X') => {
                return Err(DecodeError::malformed(
                    start,
                    "hexadecimal character references must use a lowercase 'x' (&#x...;)",
                ));
            }
            _ => 10,
        };

        let mut value: u32 = 0;
        let mut digits = 0_usize;
        let mut overflowed = false;
        while let Some(c) = self.peek_codepoint(0) {
            let Some(digit) = c.to_digit(radix) else {
                break;
            };
            self.bump(c);
            digits += 1;
            match value.checked_mul(radix).and_then(|v| v.checked_add(digit)) {
                Some(v) => value = v,
                None => overflowed = true,
            }
        }

        if digits == 0 {
            return Err(DecodeError::malformed(
                start,
                "numeric character reference has no digits",
            ));
        }
        if self.peek_codepoint(0) != Some(';') {
            return Err(DecodeError::malformed(
                start,
                "numeric character reference is missing its terminating ';'",
            ));
        }
        self.bump(';');

        match char::from_u32(value) {
            Some(c) if !overflowed && is_xml_char(c) => Ok(c),
            _ => Err(DecodeError::malformed(
                start,
                "numeric character reference does not name an allowed character",
            )),
        }
    }
}
