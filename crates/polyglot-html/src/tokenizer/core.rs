use polyglot_common::SourcePosition;
use strum_macros::Display;

use super::token::Token;
use crate::chars::{is_name_char, is_name_start_char, is_xml_char, is_xml_whitespace};
use crate::error::DecodeError;
use crate::parser::EntityPolicy;

/// The tokenizer state machine.
///
/// Only the states that work one character at a time live here. Comments,
/// CDATA sections, processing instructions and DOCTYPE declarations are read
/// in one go by the scanners in `helpers.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// Character data between tags.
    Data,
    /// After `<`.
    TagOpen,
    /// After `</`.
    EndTagOpen,
    /// Inside a start tag name.
    TagName,
    /// Inside an end tag name.
    EndTagName,
    /// After an end tag name, before `>`.
    AfterEndTagName,
    /// Between attributes, or after the tag name.
    BeforeAttributeName,
    /// Inside an attribute name.
    AttributeName,
    /// After an attribute name, before `=`.
    AfterAttributeName,
    /// After `=`, before the opening quote.
    BeforeAttributeValue,
    /// Inside a `"`-quoted attribute value.
    AttributeValueDoubleQuoted,
    /// Inside a `'`-quoted attribute value.
    AttributeValueSingleQuoted,
    /// After the closing quote of an attribute value.
    AfterAttributeValueQuoted,
    /// After the `/` of a self-closing tag.
    SelfClosingStartTag,
}

/// [XML 1.0 § 2.1 Well-Formed XML Documents](https://www.w3.org/TR/xml/#sec-well-formed)
///
/// Converts markup text into a stream of [`Token`]s. Unlike an HTML5
/// tokenizer there is no error recovery: the first well-formedness violation
/// stops tokenization with a [`DecodeError`].
///
/// Line endings are normalised before tokenization ("the XML processor must
/// behave as if it normalized all line breaks in external parsed entities ...
/// to #xA"), and a leading U+FEFF is dropped.
pub struct XmlTokenizer {
    pub(super) state: TokenizerState,
    pub(super) input: String,
    /// Position of the next character to consume.
    pub(super) position: SourcePosition,
    pub(super) current_input_character: Option<char>,
    pub(super) current_char_position: SourcePosition,
    pub(super) current_token: Option<Token>,
    /// Where the `<` of the markup currently being read sits.
    pub(super) tag_start: SourcePosition,
    pub(super) pending_text: String,
    pub(super) pending_text_position: SourcePosition,
    pub(super) at_eof: bool,
    pub(super) token_stream: Vec<Token>,
    // When true, the next iteration of the main loop will not consume a new character.
    pub(super) reconsume: bool,
    pub(super) entity_policy: EntityPolicy,
}

impl XmlTokenizer {
    /// Create a new tokenizer for the given input, resolving unknown entities
    /// strictly.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        let mut input: String = input.into();
        if input.contains('\r') {
            input = input.replace("\r\n", "\n").replace('\r', "\n");
        }
        if let Some(rest) = input.strip_prefix('\u{FEFF}') {
            input = rest.to_string();
        }

        Self {
            state: TokenizerState::Data,
            input,
            position: SourcePosition::START,
            current_input_character: None,
            current_char_position: SourcePosition::START,
            current_token: None,
            tag_start: SourcePosition::START,
            pending_text: String::new(),
            pending_text_position: SourcePosition::START,
            at_eof: false,
            token_stream: Vec::new(),
            reconsume: false,
            entity_policy: EntityPolicy::default(),
        }
    }

    /// Set how references to names outside the entity table are treated.
    #[must_use]
    pub const fn with_entity_policy(mut self, policy: EntityPolicy) -> Self {
        self.entity_policy = policy;
        self
    }

    /// Consume the tokenizer and return the token stream.
    /// Call this after `run()` to get the tokens for the tree builder.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// Run the state machine to the end of input.
    ///
    /// # Errors
    ///
    /// Returns the first well-formedness violation or unknown entity found.
    pub fn run(&mut self) -> Result<(), DecodeError> {
        while !self.at_eof {
            if self.reconsume {
                self.reconsume = false;
            } else {
                self.current_char_position = self.position;
                self.current_input_character = self.consume();
            }

            match self.state {
                TokenizerState::Data => self.handle_data_state()?,
                TokenizerState::TagOpen => self.handle_tag_open_state()?,
                TokenizerState::EndTagOpen => self.handle_end_tag_open_state()?,
                TokenizerState::TagName => self.handle_tag_name_state()?,
                TokenizerState::EndTagName => self.handle_end_tag_name_state()?,
                TokenizerState::AfterEndTagName => self.handle_after_end_tag_name_state()?,
                TokenizerState::BeforeAttributeName => {
                    self.handle_before_attribute_name_state()?;
                }
                TokenizerState::AttributeName => self.handle_attribute_name_state()?,
                TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state()?,
                TokenizerState::BeforeAttributeValue => {
                    self.handle_before_attribute_value_state()?;
                }
                TokenizerState::AttributeValueDoubleQuoted => {
                    self.handle_attribute_value_quoted_state('"')?;
                }
                TokenizerState::AttributeValueSingleQuoted => {
                    self.handle_attribute_value_quoted_state('\'')?;
                }
                TokenizerState::AfterAttributeValueQuoted => {
                    self.handle_after_attribute_value_quoted_state()?;
                }
                TokenizerState::SelfClosingStartTag => {
                    self.handle_self_closing_start_tag_state()?;
                }
            }
        }
        Ok(())
    }

    /// [XML 1.0 § 2.4](https://www.w3.org/TR/xml/#syntax)
    ///
    /// "The ampersand character (&) and the left angle bracket (<) MUST NOT
    /// appear in their literal form, except when used as markup delimiters"
    fn handle_data_state(&mut self) -> Result<(), DecodeError> {
        match self.current_input_character {
            Some('<') => {
                self.tag_start = self.current_char_position;
                self.switch_to(TokenizerState::TagOpen);
            }
            Some('&') => {
                let start = self.current_char_position;
                let resolved = self.consume_character_reference()?;
                self.append_text(&resolved, start);
            }
            // "the right angle bracket (>) MUST ... be escaped using either
            // '&gt;' or a character reference when it appears in the string
            // ']]>' in content"
            Some(']') if self.next_few_characters_are("]>") => {
                return Err(self.parse_error("']]>' is not allowed in character data"));
            }
            None => self.emit_eof_token(),
            Some(c) if is_xml_char(c) => {
                let mut buf = [0; 4];
                self.append_text(c.encode_utf8(&mut buf), self.current_char_position);
            }
            Some(c) => return Err(Self::invalid_character(self.current_char_position, c)),
        }
        Ok(())
    }

    fn handle_tag_open_state(&mut self) -> Result<(), DecodeError> {
        match self.current_input_character {
            Some('!') => {
                if self.next_few_characters_are("--") {
                    self.consume_string("--");
                    self.scan_comment()?;
                } else if self.next_few_characters_are("[CDATA[") {
                    self.consume_string("[CDATA[");
                    self.scan_cdata_section()?;
                } else if self.next_few_characters_are_case_insensitive("DOCTYPE") {
                    self.consume_string("DOCTYPE");
                    self.scan_doctype()?;
                } else {
                    return Err(self.parse_error("unrecognised markup declaration after '<!'"));
                }
                self.switch_to(TokenizerState::Data);
            }
            Some('?') => {
                self.scan_processing_instruction()?;
                self.switch_to(TokenizerState::Data);
            }
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            Some(c) if is_name_start_char(c) => {
                self.current_token = Some(Token::new_start_tag(self.tag_start));
                self.reconsume_in(TokenizerState::TagName);
            }
            None => return Err(self.unexpected_eof("after '<'")),
            Some(c) => {
                return Err(self.parse_error(format!(
                    "'{}' cannot start a tag name; write &lt; for a literal '<'",
                    c.escape_debug()
                )));
            }
        }
        Ok(())
    }

    fn handle_end_tag_open_state(&mut self) -> Result<(), DecodeError> {
        match self.current_input_character {
            Some(c) if is_name_start_char(c) => {
                self.current_token = Some(Token::new_end_tag(self.tag_start));
                self.reconsume_in(TokenizerState::EndTagName);
                Ok(())
            }
            None => Err(self.unexpected_eof("after '</'")),
            Some(_) => Err(self.parse_error("expected a tag name after '</'")),
        }
    }

    fn handle_tag_name_state(&mut self) -> Result<(), DecodeError> {
        match self.current_input_character {
            Some(c) if is_name_char(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_tag_name(c);
                }
            }
            Some(c) if is_xml_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.emit_current_token();
                self.switch_to(TokenizerState::Data);
            }
            None => return Err(self.unexpected_eof("inside a start tag")),
            Some(c) => {
                return Err(self.parse_error(format!(
                    "'{}' is not allowed in a tag name",
                    c.escape_debug()
                )));
            }
        }
        Ok(())
    }

    fn handle_end_tag_name_state(&mut self) -> Result<(), DecodeError> {
        match self.current_input_character {
            Some(c) if is_name_char(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_tag_name(c);
                }
            }
            Some(c) if is_xml_whitespace(c) => {
                self.switch_to(TokenizerState::AfterEndTagName);
            }
            Some('>') => {
                self.emit_current_token();
                self.switch_to(TokenizerState::Data);
            }
            None => return Err(self.unexpected_eof("inside an end tag")),
            Some(c) => {
                return Err(self.parse_error(format!(
                    "'{}' is not allowed in a tag name",
                    c.escape_debug()
                )));
            }
        }
        Ok(())
    }

    fn handle_after_end_tag_name_state(&mut self) -> Result<(), DecodeError> {
        match self.current_input_character {
            Some(c) if is_xml_whitespace(c) => Ok(()),
            Some('>') => {
                self.emit_current_token();
                self.switch_to(TokenizerState::Data);
                Ok(())
            }
            None => Err(self.unexpected_eof("inside an end tag")),
            Some(_) => Err(self.parse_error("end tags cannot carry attributes")),
        }
    }

    fn handle_before_attribute_name_state(&mut self) -> Result<(), DecodeError> {
        match self.current_input_character {
            Some(c) if is_xml_whitespace(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.emit_current_token();
                self.switch_to(TokenizerState::Data);
            }
            Some(c) if is_name_start_char(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.start_new_attribute(self.current_char_position);
                }
                self.reconsume_in(TokenizerState::AttributeName);
            }
            None => return Err(self.unexpected_eof("inside a start tag")),
            Some(c) => {
                return Err(self.parse_error(format!(
                    "'{}' cannot start an attribute name",
                    c.escape_debug()
                )));
            }
        }
        Ok(())
    }

    fn handle_attribute_name_state(&mut self) -> Result<(), DecodeError> {
        match self.current_input_character {
            Some(c) if is_name_char(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_name(c);
                }
                Ok(())
            }
            Some(c) if is_xml_whitespace(c) => {
                self.switch_to(TokenizerState::AfterAttributeName);
                Ok(())
            }
            Some('=') => {
                self.switch_to(TokenizerState::BeforeAttributeValue);
                Ok(())
            }
            None => Err(self.unexpected_eof("inside an attribute name")),
            Some(_) => Err(self.missing_attribute_value()),
        }
    }

    fn handle_after_attribute_name_state(&mut self) -> Result<(), DecodeError> {
        match self.current_input_character {
            Some(c) if is_xml_whitespace(c) => Ok(()),
            Some('=') => {
                self.switch_to(TokenizerState::BeforeAttributeValue);
                Ok(())
            }
            None => Err(self.unexpected_eof("inside a start tag")),
            Some(_) => Err(self.missing_attribute_value()),
        }
    }

    fn handle_before_attribute_value_state(&mut self) -> Result<(), DecodeError> {
        match self.current_input_character {
            Some(c) if is_xml_whitespace(c) => Ok(()),
            Some('"') => {
                self.switch_to(TokenizerState::AttributeValueDoubleQuoted);
                Ok(())
            }
            Some('\'') => {
                self.switch_to(TokenizerState::AttributeValueSingleQuoted);
                Ok(())
            }
            None => Err(self.unexpected_eof("before an attribute value")),
            Some(_) => Err(self.parse_error("attribute values must be quoted")),
        }
    }

    /// [XML 1.0 § 3.3.3 Attribute-Value Normalization](https://www.w3.org/TR/xml/#AVNormalize)
    ///
    /// "For a white space character (#x20, #xD, #xA, #x9), append a space
    /// character (#x20) to the normalized value." Characters produced by a
    /// character reference are appended as they are.
    fn handle_attribute_value_quoted_state(&mut self, quote: char) -> Result<(), DecodeError> {
        match self.current_input_character {
            Some(c) if c == quote => {
                self.switch_to(TokenizerState::AfterAttributeValueQuoted);
            }
            Some('&') => {
                let resolved = self.consume_character_reference()?;
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_value(&resolved);
                }
            }
            Some('<') => return Err(self.parse_error("'<' is not allowed in attribute values")),
            Some(c) if is_xml_whitespace(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_value(" ");
                }
            }
            Some(c) if is_xml_char(c) => {
                let mut buf = [0; 4];
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_value(c.encode_utf8(&mut buf));
                }
            }
            Some(c) => return Err(Self::invalid_character(self.current_char_position, c)),
            None => return Err(self.unexpected_eof("inside an attribute value")),
        }
        Ok(())
    }

    fn handle_after_attribute_value_quoted_state(&mut self) -> Result<(), DecodeError> {
        match self.current_input_character {
            Some(c) if is_xml_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
                Ok(())
            }
            Some('/') => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
                Ok(())
            }
            Some('>') => {
                self.emit_current_token();
                self.switch_to(TokenizerState::Data);
                Ok(())
            }
            None => Err(self.unexpected_eof("inside a start tag")),
            Some(_) => Err(self.parse_error("expected whitespace between attributes")),
        }
    }

    fn handle_self_closing_start_tag_state(&mut self) -> Result<(), DecodeError> {
        match self.current_input_character {
            Some('>') => {
                if let Some(token) = self.current_token.as_mut() {
                    token.set_self_closing();
                }
                self.emit_current_token();
                self.switch_to(TokenizerState::Data);
                Ok(())
            }
            None => Err(self.unexpected_eof("inside a start tag")),
            Some(_) => Err(self.parse_error("expected '>' after '/' in a tag")),
        }
    }

    fn missing_attribute_value(&self) -> DecodeError {
        let name = self
            .current_token
            .as_ref()
            .and_then(Token::current_attribute_name)
            .unwrap_or_default();
        self.parse_error(format!("attribute '{name}' has no value"))
    }
}
