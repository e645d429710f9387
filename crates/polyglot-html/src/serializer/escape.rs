//! Character escaping for text and attribute values.
//!
//! Escaping is the minimum that makes the output parse back to the same
//! characters as both HTML and XML. Non-ASCII characters are written as UTF-8,
//! never as character references.

use std::fmt;

use polyglot_common::warning::warn_once;

use crate::chars::is_xml_char;

/// Written in place of characters that XML cannot carry even as references.
const REPLACEMENT: &str = "\u{FFFD}";

/// Write `text` escaped for element content.
///
/// # Errors
///
/// Propagates errors from the underlying writer.
pub fn write_text<W: fmt::Write + ?Sized>(out: &mut W, text: &str) -> fmt::Result {
    write_escaped(out, text, false)
}

/// Write `value` escaped for a double-quoted attribute value.
///
/// Tab and line feed are written as references because a parser would
/// otherwise normalise them to spaces.
///
/// # Errors
///
/// Propagates errors from the underlying writer.
pub fn write_attribute_value<W: fmt::Write + ?Sized>(out: &mut W, value: &str) -> fmt::Result {
    write_escaped(out, value, true)
}

/// [`write_text`] into a new string.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let _ = write_text(&mut out, text);
    out
}

/// [`write_attribute_value`] into a new string.
#[must_use]
pub fn escape_attribute_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let _ = write_attribute_value(&mut out, value);
    out
}

fn write_escaped<W: fmt::Write + ?Sized>(out: &mut W, s: &str, in_attribute: bool) -> fmt::Result {
    let mut replaced = false;
    let mut last = 0;
    for (i, c) in s.char_indices() {
        let escaped = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '\r' => "&#13;",
            '"' if in_attribute => "&quot;",
            '\'' if in_attribute => "&#39;",
            '\t' if in_attribute => "&#9;",
            '\n' if in_attribute => "&#10;",
            c if !is_xml_char(c) => {
                replaced = true;
                REPLACEMENT
            }
            _ => continue,
        };
        out.write_str(&s[last..i])?;
        out.write_str(escaped)?;
        last = i + c.len_utf8();
    }
    out.write_str(&s[last..])?;

    if replaced {
        warn_once(
            "Encoder",
            "characters not allowed in XML were replaced with U+FFFD",
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_text("\"quoted\" 'single'"), "\"quoted\" 'single'");
        assert_eq!(escape_text("line\r\nbreak\ttab"), "line&#13;\nbreak\ttab");
        assert_eq!(escape_text("café"), "café");
    }

    #[test]
    fn test_escape_attribute_value() {
        assert_eq!(
            escape_attribute_value("say \"hi\" & 'bye' <now>"),
            "say &quot;hi&quot; &amp; &#39;bye&#39; &lt;now&gt;"
        );
        assert_eq!(escape_attribute_value("a\tb\nc"), "a&#9;b&#10;c");
    }

    #[test]
    fn test_forbidden_characters_are_replaced() {
        assert_eq!(escape_text("nul\u{0}here"), "nul\u{FFFD}here");
        assert_eq!(escape_attribute_value("\u{FFFF}"), "\u{FFFD}");
    }
}
