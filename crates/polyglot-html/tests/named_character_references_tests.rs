//! Integration tests for named character reference lookup.

use polyglot_html::tokenizer::named_character_references::{
    entity_count, lookup_code_point, lookup_entity,
};

#[test]
fn test_lookup_common_entities() {
    assert_eq!(lookup_entity("amp"), Some("&"));
    assert_eq!(lookup_entity("lt"), Some("<"));
    assert_eq!(lookup_entity("gt"), Some(">"));
    assert_eq!(lookup_entity("quot"), Some("\""));
    assert_eq!(lookup_entity("apos"), Some("'"));
    assert_eq!(lookup_entity("nbsp"), Some("\u{00A0}"));
    assert_eq!(lookup_entity("eacute"), Some("\u{00E9}"));
}

#[test]
fn test_lookup_is_case_sensitive() {
    assert_eq!(lookup_entity("Eacute"), Some("\u{00C9}"));
    assert_eq!(lookup_entity("EACUTE"), None);
    assert_eq!(lookup_entity("Amp"), None);
}

#[test]
fn test_names_exclude_delimiters() {
    assert_eq!(lookup_entity("amp;"), None);
    assert_eq!(lookup_entity("&amp"), None);
}

#[test]
fn test_lookup_unknown_entity() {
    assert_eq!(lookup_entity("notarealentity"), None);
    assert_eq!(lookup_entity("bogus"), None);
    assert_eq!(lookup_entity(""), None);
}

#[test]
fn test_two_code_point_entities() {
    assert_eq!(lookup_entity("NotEqualTilde"), Some("\u{2242}\u{0338}"));
    assert_eq!(lookup_code_point("NotEqualTilde"), None);
}

#[test]
fn test_lookup_code_point() {
    assert_eq!(lookup_code_point("amp"), Some(0x26));
    assert_eq!(lookup_code_point("eacute"), Some(0xE9));
    assert_eq!(lookup_code_point("hearts"), Some(0x2665));
    // Astral plane
    assert_eq!(lookup_code_point("Afr"), Some(0x1_D504));
    assert_eq!(lookup_code_point("bogus"), None);
}

#[test]
fn test_table_size() {
    assert_eq!(entity_count(), 2125);
}
