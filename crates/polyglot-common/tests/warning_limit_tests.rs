//! The warning registry stays bounded however many distinct messages arrive.

use polyglot_common::warning::{MAX_RECORDED_WARNINGS, recorded_warnings, warn_once};

#[test]
fn test_recorded_warnings_are_capped() {
    for i in 0..MAX_RECORDED_WARNINGS * 4 {
        warn_once("Test", &format!("message {i}"));
    }
    assert_eq!(recorded_warnings().len(), MAX_RECORDED_WARNINGS);

    // Messages already recorded are still known once the registry is full.
    warn_once("Test", "message 0");
    assert_eq!(recorded_warnings().len(), MAX_RECORDED_WARNINGS);
}
