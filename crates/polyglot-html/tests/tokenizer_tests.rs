//! Integration tests for the markup tokenizer.

use polyglot_common::SourcePosition;
use polyglot_html::{DecodeError, EntityPolicy, Token, XmlTokenizer};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = XmlTokenizer::new(input);
    tokenizer.run().unwrap();
    tokenizer.into_tokens()
}

fn tokenize_err(input: &str) -> DecodeError {
    XmlTokenizer::new(input).run().unwrap_err()
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 2); // text run + EOF
    assert!(matches!(&tokens[0], Token::Text { data, .. } if data == "Hello"));
    assert!(tokens[1].is_eof());
}

#[test]
fn test_start_and_end_tag() {
    let tokens = tokenize("<div></div>");
    assert_eq!(tokens.len(), 3);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
            ..
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert!(attributes.is_empty());
        }
        _ => panic!("Expected StartTag token"),
    }
    assert_eq!(tokens[1].tag_name(), Some("div"));
    assert!(matches!(tokens[1], Token::EndTag { .. }));
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/><hr />");
    assert!(matches!(&tokens[0], Token::StartTag { name, self_closing: true, .. } if name == "br"));
    assert!(matches!(&tokens[1], Token::StartTag { name, self_closing: true, .. } if name == "hr"));
}

#[test]
fn test_attributes() {
    let tokens = tokenize(r#"<a href="/x?a=1&amp;b=2" title='it&apos;s' class = "c">"#);
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    assert_eq!(attributes.len(), 3);
    assert_eq!(attributes[0].name, "href");
    assert_eq!(attributes[0].value, "/x?a=1&b=2");
    assert_eq!(attributes[1].value, "it's");
    assert_eq!(attributes[2].name, "class");
    assert_eq!(attributes[2].value, "c");
}

#[test]
fn test_duplicate_attributes_are_kept() {
    let tokens = tokenize(r#"<p a="1" a="2">"#);
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    let values: Vec<&str> = attributes.iter().map(|a| a.value.as_str()).collect();
    assert_eq!(values, ["1", "2"]);
}

#[test]
fn test_attribute_whitespace_normalisation() {
    let tokens = tokenize("<p title=\"a\tb\nc&#10;d\">");
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    assert_eq!(attributes[0].value, "a b c\nd");
}

#[test]
fn test_character_references_in_text() {
    let tokens = tokenize("&lt;&#65;&#x42;&eacute;&gt;");
    assert!(matches!(&tokens[0], Token::Text { data, .. } if data == "<AB\u{e9}>"));
}

#[test]
fn test_comment_pi_and_doctype_tokens() {
    let tokens = tokenize(
        "<?xml version=\"1.0\"?><!DOCTYPE html [<!ENTITY x \"<>\">]><!-- note --><?php echo 1; ?>",
    );
    assert!(matches!(&tokens[0], Token::ProcessingInstruction { target, .. } if target == "xml"));
    assert!(matches!(&tokens[1], Token::Doctype { name, .. } if name == "html"));
    assert!(matches!(&tokens[2], Token::Comment { data, .. } if data == " note "));
    assert!(
        matches!(&tokens[3], Token::ProcessingInstruction { target, data, .. } if target == "php" && data == "echo 1; ")
    );
    assert!(tokens[4].is_eof());
}

#[test]
fn test_cdata_joins_text() {
    let tokens = tokenize("a<![CDATA[<b> & ]]>c");
    assert_eq!(tokens.len(), 2);
    assert!(matches!(&tokens[0], Token::Text { data, .. } if data == "a<b> & c"));
}

#[test]
fn test_line_endings_are_normalised() {
    let tokens = tokenize("a\r\nb\rc");
    assert!(matches!(&tokens[0], Token::Text { data, .. } if data == "a\nb\nc"));
}

#[test]
fn test_positions() {
    let tokens = tokenize("<a>\n  <b/></a>");
    assert_eq!(tokens[0].position(), SourcePosition::START);
    let b = tokens
        .iter()
        .find(|t| t.tag_name() == Some("b"))
        .unwrap();
    assert_eq!(b.position().line, 2);
    assert_eq!(b.position().column, 3);
    assert_eq!(b.position().offset, 6);
}

#[test]
fn test_unknown_entity_is_an_error() {
    match tokenize_err("x &bogus; y") {
        DecodeError::UnknownEntity { name, position } => {
            assert_eq!(name, "bogus");
            assert_eq!(position.column, 3);
        }
        other => panic!("Expected UnknownEntity, got {other:?}"),
    }
}

#[test]
fn test_unknown_entity_pass_through() {
    let mut tokenizer = XmlTokenizer::new("x &bogus; y").with_entity_policy(EntityPolicy::PassThrough);
    tokenizer.run().unwrap();
    let tokens = tokenizer.into_tokens();
    assert!(matches!(&tokens[0], Token::Text { data, .. } if data == "x &bogus; y"));
}

#[test]
fn test_uppercase_hex_marker_is_explained() {
    match tokenize_err("&#X41;") {
        DecodeError::MalformedMarkup { detail, .. } => {
            assert!(detail.contains("lowercase 'x'"), "unexpected detail: {detail}");
        }
        other => panic!("Expected MalformedMarkup, got {other:?}"),
    }
}

#[test]
fn test_malformed_input() {
    for input in [
        "a & b",
        "&amp",
        "&#;",
        "&#0;",
        "&#xD800;",
        "&#x110000;",
        "&#99999999999;",
        "<p class=x>",
        "<p class>",
        "<p a=\"1\"b=\"2\">",
        "<p a=\"<\">",
        "< p>",
        "</p x=\"1\">",
        "<p/ >",
        "a ]]> b",
        "<!-- a -- b -->",
        "<!-- open",
        "<![CDATA[ open",
        "<!ELEMENT p ANY>",
        "<? x?>",
        "<p><?xml version=\"1.0\"?></p>",
        "<?XML version=\"1.0\"?>",
        "<p",
        "nul\u{1}",
    ] {
        assert!(
            matches!(XmlTokenizer::new(input).run(), Err(DecodeError::MalformedMarkup { .. })),
            "expected malformed markup for {input:?}"
        );
    }
}

#[test]
fn test_xml_declaration_at_start_is_accepted() {
    let tokens = tokenize("<?xml version=\"1.0\" encoding=\"UTF-8\"?><p/>");
    assert!(matches!(&tokens[1], Token::StartTag { name, .. } if name == "p"));
}
