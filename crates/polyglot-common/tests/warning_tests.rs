//! Integration tests for the de-duplicated warning channel.

use polyglot_common::warning::{clear_warnings, recorded_warnings, warn_once};

#[test]
fn test_warnings_are_deduplicated_and_cleared() {
    clear_warnings();
    warn_once("Test", "first");
    warn_once("Test", "first");
    warn_once("Test", "second");
    assert_eq!(recorded_warnings(), ["[Test] first", "[Test] second"]);

    clear_warnings();
    assert!(recorded_warnings().is_empty());
}
