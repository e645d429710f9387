//! Helper functions for the markup tokenizer.
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("switch to", "reconsume in")
//! - Input/character handling with position tracking
//! - Token emission and text buffering
//! - Scanners for constructs read in one go (comments, CDATA, PIs, DOCTYPE)
//! - Error construction

use std::mem;

use polyglot_common::SourcePosition;

use super::core::{TokenizerState, XmlTokenizer};
use super::token::Token;
use crate::chars::{is_name_char, is_name_start_char, is_xml_char, is_xml_whitespace};
use crate::error::DecodeError;

// =============================================================================
// State Transition Helpers
// =============================================================================

impl XmlTokenizer {
    /// Transitions to a new state. The next character will be consumed on the
    /// next iteration of the main loop.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// Transitions to a new state without consuming the current character.
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl XmlTokenizer {
    /// Returns the character at the current position and advances past it.
    /// Returns None at the end of input.
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.position.offset..].chars().next()?;
        self.position = self.position.advance(c);
        Some(c)
    }

    /// Advance past `c`, which the caller has just peeked.
    pub(super) const fn bump(&mut self, c: char) {
        self.position = self.position.advance(c);
    }

    /// Peek at a codepoint at the given offset from the current position
    /// without consuming it.
    #[must_use]
    pub fn peek_codepoint(&self, offset: usize) -> Option<char> {
        self.input[self.position.offset..].chars().nth(offset)
    }

    /// Check if the next few characters match the target string exactly.
    #[must_use]
    pub fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.position.offset..].starts_with(target)
    }

    /// Check if the next few characters match the target string using
    /// ASCII case-insensitive comparison.
    #[must_use]
    pub fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        self.input[self.position.offset..]
            .get(..target.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(target))
    }

    /// Consume the given string from the input.
    /// Caller must have already verified the characters are present.
    pub(super) fn consume_string(&mut self, target: &str) {
        for c in target.chars() {
            self.bump(c);
        }
    }

    /// Skip any run of whitespace; returns true if at least one character
    /// was skipped.
    pub(super) fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while let Some(c) = self.peek_codepoint(0).filter(|&c| is_xml_whitespace(c)) {
            self.bump(c);
            skipped = true;
        }
        skipped
    }

    /// Consume a `Name` starting at the current position. Returns an empty
    /// string if the next character cannot start a name.
    pub(super) fn consume_name(&mut self) -> String {
        let mut name = String::new();
        if let Some(first) = self.peek_codepoint(0).filter(|&c| is_name_start_char(c)) {
            self.bump(first);
            name.push(first);
            while let Some(c) = self.peek_codepoint(0).filter(|&c| is_name_char(c)) {
                self.bump(c);
                name.push(c);
            }
        }
        name
    }

    /// Consume characters up to and including `terminator`, returning the
    /// characters before it. Every character must be an XML `Char`.
    pub(super) fn consume_until(
        &mut self,
        terminator: &str,
        construct: &str,
    ) -> Result<String, DecodeError> {
        let mut content = String::new();
        loop {
            if self.next_few_characters_are(terminator) {
                self.consume_string(terminator);
                return Ok(content);
            }
            let at = self.position;
            match self.consume() {
                Some(c) if is_xml_char(c) => content.push(c),
                Some(c) => return Err(Self::invalid_character(at, c)),
                None => {
                    return Err(DecodeError::malformed(
                        at,
                        format!("unexpected end of input inside {construct}"),
                    ));
                }
            }
        }
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl XmlTokenizer {
    /// Add the current tag token to the output stream, after any buffered text.
    pub(super) fn emit_current_token(&mut self) {
        self.flush_text();
        if let Some(token) = self.current_token.take() {
            self.token_stream.push(token);
        }
    }

    /// Add a complete token to the output stream, after any buffered text.
    pub(super) fn emit(&mut self, token: Token) {
        self.flush_text();
        self.token_stream.push(token);
    }

    /// Buffer character data that starts at `position` if the buffer is empty.
    pub(super) fn append_text(&mut self, s: &str, position: SourcePosition) {
        if self.pending_text.is_empty() {
            self.pending_text_position = position;
        }
        self.pending_text.push_str(s);
    }

    /// Emit buffered character data as a single text token.
    pub(super) fn flush_text(&mut self) {
        if !self.pending_text.is_empty() {
            let data = mem::take(&mut self.pending_text);
            self.token_stream.push(Token::Text {
                data,
                position: self.pending_text_position,
            });
        }
    }

    /// Emit the end-of-file token.
    pub(super) fn emit_eof_token(&mut self) {
        self.emit(Token::EndOfFile {
            position: self.position,
        });
        self.at_eof = true;
    }
}

// =============================================================================
// Markup Declarations and Processing Instructions
// =============================================================================

impl XmlTokenizer {
    /// [XML 1.0 § 2.5](https://www.w3.org/TR/xml/#sec-comments)
    ///
    /// "Comment ::= '<!--' ((Char - '-') | ('-' (Char - '-')))* '-->'"
    ///
    /// Called with `<!--` already consumed.
    pub(super) fn scan_comment(&mut self) -> Result<(), DecodeError> {
        let data = self.consume_until("--", "comment")?;
        if self.peek_codepoint(0) == Some('>') {
            self.bump('>');
        } else {
            return Err(DecodeError::malformed(
                self.position,
                "'--' is not allowed inside a comment",
            ));
        }
        self.emit(Token::Comment {
            data,
            position: self.tag_start,
        });
        Ok(())
    }

    /// [XML 1.0 § 2.7](https://www.w3.org/TR/xml/#sec-cdata-sect)
    ///
    /// "CDSect ::= CDStart CData CDEnd"
    ///
    /// Called with `<![CDATA[` already consumed. The content joins the
    /// surrounding character data.
    pub(super) fn scan_cdata_section(&mut self) -> Result<(), DecodeError> {
        let data = self.consume_until("]]>", "CDATA section")?;
        self.append_text(&data, self.tag_start);
        Ok(())
    }

    /// [XML 1.0 § 2.6](https://www.w3.org/TR/xml/#sec-pi)
    ///
    /// "PI ::= '<?' PITarget (S (Char* - (Char* '?>' Char*)))? '?>'"
    ///
    /// Called with `<?` already consumed. The `<?xml ...?>` declaration goes
    /// through here too and is only accepted at the very start of the input.
    pub(super) fn scan_processing_instruction(&mut self) -> Result<(), DecodeError> {
        let target_position = self.position;
        let target = self.consume_name();
        if target.is_empty() {
            return Err(DecodeError::malformed(
                target_position,
                "processing instruction has no target",
            ));
        }
        if target.eq_ignore_ascii_case("xml") {
            if target != "xml" {
                return Err(DecodeError::malformed(
                    target_position,
                    format!("processing instruction target '{target}' is reserved"),
                ));
            }
            if self.tag_start.offset != 0 {
                return Err(DecodeError::malformed(
                    self.tag_start,
                    "XML declaration is only allowed at the start of the input",
                ));
            }
        }

        let data = if self.next_few_characters_are("?>") {
            self.consume_string("?>");
            String::new()
        } else if self.skip_whitespace() {
            self.consume_until("?>", "processing instruction")?
        } else {
            return Err(DecodeError::malformed(
                self.position,
                "expected whitespace after processing instruction target",
            ));
        };

        self.emit(Token::ProcessingInstruction {
            target,
            data,
            position: self.tag_start,
        });
        Ok(())
    }

    /// [XML 1.0 § 2.8](https://www.w3.org/TR/xml/#sec-prolog-dtd)
    ///
    /// "doctypedecl ::= '<!DOCTYPE' S Name (S ExternalID)? S? ('[' intSubset ']' S?)? '>'"
    ///
    /// Called with `<!DOCTYPE` already consumed. Only the name is kept; quoted
    /// identifiers and the internal subset are skipped with quote and bracket
    /// tracking so a `>` inside them does not end the declaration.
    pub(super) fn scan_doctype(&mut self) -> Result<(), DecodeError> {
        if !self.skip_whitespace() {
            return Err(DecodeError::malformed(
                self.position,
                "expected whitespace after <!DOCTYPE",
            ));
        }
        let name_position = self.position;
        let name = self.consume_name();
        if name.is_empty() {
            return Err(DecodeError::malformed(name_position, "DOCTYPE has no name"));
        }

        let mut quote: Option<char> = None;
        let mut in_subset = false;
        loop {
            let at = self.position;
            match (self.consume(), quote) {
                (None, _) => {
                    return Err(DecodeError::malformed(
                        at,
                        "unexpected end of input inside DOCTYPE",
                    ));
                }
                (Some(c), _) if !is_xml_char(c) => return Err(Self::invalid_character(at, c)),
                (Some(c), Some(q)) if c == q => quote = None,
                (Some(_), Some(_)) => {}
                (Some(c @ ('"' | '\'')), None) => quote = Some(c),
                (Some('['), None) if !in_subset => in_subset = true,
                (Some(']'), None) if in_subset => in_subset = false,
                (Some('>'), None) if !in_subset => break,
                (Some(_), None) => {}
            }
        }

        self.emit(Token::Doctype {
            name,
            position: self.tag_start,
        });
        Ok(())
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl XmlTokenizer {
    /// A malformed-markup error at the current input character.
    pub(super) fn parse_error(&self, detail: impl Into<String>) -> DecodeError {
        DecodeError::malformed(self.current_char_position, detail)
    }

    /// A malformed-markup error for input that ended inside `context`.
    pub(super) fn unexpected_eof(&self, context: &str) -> DecodeError {
        DecodeError::malformed(
            self.current_char_position,
            format!("unexpected end of input {context}"),
        )
    }

    /// A character that XML does not allow anywhere in a document.
    pub(super) fn invalid_character(position: SourcePosition, c: char) -> DecodeError {
        DecodeError::malformed(
            position,
            format!("character U+{:04X} is not allowed in markup", u32::from(c)),
        )
    }
}
