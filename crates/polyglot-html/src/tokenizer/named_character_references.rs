//! Named character reference lookup table.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html)
//!
//! The decoder resolves `&name;` against the full HTML5 table. Only the
//! semicolon-terminated forms are present: markup accepted here must also be
//! well-formed XML, which has no legacy semicolon-less references.
//!
//! The table is static data. The hash index over it is built on first use and
//! is read-only afterwards, so lookups need no locking.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::entity_data::NAMED_ENTITY_DATA;

/// Maps entity names (without `&` and `;`) to their replacement strings.
///
/// NOTE: 93 references expand to two code points (e.g. "NotEqualTilde" ->
/// U+2242 U+0338), so values are strings rather than single characters.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| NAMED_ENTITY_DATA.iter().copied().collect());

/// Look up a named character reference.
///
/// Returns the replacement text if found. The `name` must include neither the
/// leading `&` nor the trailing `;`, and is matched case-sensitively.
///
/// # Example
/// ```
/// use polyglot_html::tokenizer::named_character_references::lookup_entity;
///
/// assert_eq!(lookup_entity("amp"), Some("&"));
/// assert_eq!(lookup_entity("eacute"), Some("\u{e9}"));
/// assert_eq!(lookup_entity("AMP"), Some("&"));
/// assert_eq!(lookup_entity("Amp"), None);
/// ```
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// Look up the code point of a named character reference.
///
/// Returns `None` when `name` is not a standard reference, and also for the
/// references that expand to two code points; use [`lookup_entity`] for those.
///
/// # Example
/// ```
/// use polyglot_html::tokenizer::named_character_references::lookup_code_point;
///
/// assert_eq!(lookup_code_point("eacute"), Some(0xE9));
/// assert_eq!(lookup_code_point("bogus"), None);
/// ```
#[must_use]
pub fn lookup_code_point(name: &str) -> Option<u32> {
    let replacement = lookup_entity(name)?;
    let mut chars = replacement.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(u32::from(c)),
        _ => None,
    }
}

/// Number of named references in the table.
#[must_use]
pub const fn entity_count() -> usize {
    NAMED_ENTITY_DATA.len()
}
