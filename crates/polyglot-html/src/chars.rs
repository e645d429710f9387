//! Character classes shared by the tokenizer and the serializer.
//!
//! [XML 1.0 (Fifth Edition) § 2.2 Characters](https://www.w3.org/TR/xml/#charsets)
//! and [§ 2.3 Common Syntactic Constructs](https://www.w3.org/TR/xml/#sec-common-syn).

/// "Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]"
#[must_use]
pub const fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// "S ::= (#x20 | #x9 | #xD | #xA)+"
#[must_use]
pub const fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// "NameStartChar ::= ":" | [A-Z] | "_" | [a-z] | [#xC0-#xD6] | [#xD8-#xF6] |
/// [#xF8-#x2FF] | [#x370-#x37D] | [#x37F-#x1FFF] | [#x200C-#x200D] |
/// [#x2070-#x218F] | [#x2C00-#x2FEF] | [#x3001-#xD7FF] | [#xF900-#xFDCF] |
/// [#xFDF0-#xFFFD] | [#x10000-#xEFFFF]"
#[must_use]
pub const fn is_name_start_char(c: char) -> bool {
    matches!(
        c,
        ':' | 'A'..='Z'
            | '_'
            | 'a'..='z'
            | '\u{C0}'..='\u{D6}'
            | '\u{D8}'..='\u{F6}'
            | '\u{F8}'..='\u{2FF}'
            | '\u{370}'..='\u{37D}'
            | '\u{37F}'..='\u{1FFF}'
            | '\u{200C}'..='\u{200D}'
            | '\u{2070}'..='\u{218F}'
            | '\u{2C00}'..='\u{2FEF}'
            | '\u{3001}'..='\u{D7FF}'
            | '\u{F900}'..='\u{FDCF}'
            | '\u{FDF0}'..='\u{FFFD}'
            | '\u{10000}'..='\u{EFFFF}'
    )
}

/// "NameChar ::= NameStartChar | "-" | "." | [0-9] | #xB7 | [#x0300-#x036F] |
/// [#x203F-#x2040]"
#[must_use]
pub const fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(
            c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

/// Returns true if `s` is a non-empty XML `Name`.
#[must_use]
pub fn is_xml_name(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_chars() {
        assert!(is_xml_char('a'));
        assert!(is_xml_char('\n'));
        assert!(is_xml_char('\u{10FFFF}'));
        assert!(!is_xml_char('\0'));
        assert!(!is_xml_char('\u{0B}'));
        assert!(!is_xml_char('\u{FFFE}'));
    }

    #[test]
    fn test_names() {
        assert!(is_xml_name("div"));
        assert!(is_xml_name("xml:lang"));
        assert!(is_xml_name("data-x.y"));
        assert!(is_xml_name("é"));
        assert!(!is_xml_name(""));
        assert!(!is_xml_name("1abc"));
        assert!(!is_xml_name("a b"));
        assert!(!is_xml_name("-x"));
    }
}
