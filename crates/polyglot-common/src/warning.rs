//! Codec warnings with colored terminal output.
//!
//! The decoder and encoder never fail on conditions they can repair (a void
//! element handed children, a character XML cannot carry, an unknown entity
//! kept verbatim). They report them here instead. Each distinct message is
//! printed once per process until [`clear_warnings`] is called.
//!
//! Messages are keys: callers pass a fixed text per condition, never text
//! taken from the document. At most [`MAX_RECORDED_WARNINGS`] distinct
//! messages are kept; later ones are dropped.
//!
//! Setting the `POLYGLOT_QUIET` environment variable suppresses the output;
//! warnings are still recorded and visible through [`recorded_warnings`].

use std::collections::BTreeSet;
use std::env;
use std::sync::{Mutex, PoisonError};

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Environment variable that silences warning output.
pub const QUIET_ENV_VAR: &str = "POLYGLOT_QUIET";

/// Upper bound on the number of distinct warnings kept.
pub const MAX_RECORDED_WARNINGS: usize = 64;

/// Set of warnings already reported (to deduplicate)
static WARNED: Mutex<BTreeSet<String>> = Mutex::new(BTreeSet::new());

/// Report a recoverable condition (printed once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("Encoder", "void elements were given children; the children were not written");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let is_new = {
        let mut warned = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
        warned.len() < MAX_RECORDED_WARNINGS && warned.insert(key)
    };

    if is_new && env::var_os(QUIET_ENV_VAR).is_none() {
        eprintln!("{YELLOW}[Polyglot {component}] ⚠ {message}{RESET}");
    }
}

/// Snapshot of every warning reported since the last [`clear_warnings`],
/// formatted as `[component] message`, in sorted order.
#[must_use]
pub fn recorded_warnings() -> Vec<String> {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .cloned()
        .collect()
}

/// Forget all recorded warnings (call before processing a new document).
pub fn clear_warnings() {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}
