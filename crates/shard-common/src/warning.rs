//! Deduplicated warnings routed through the `log` facade.
//!
//! Scraped documents tend to repeat the same oddity hundreds of times (the
//! same stray `</font>` on every row of a table). Only the first occurrence of
//! each distinct message is forwarded.

use std::collections::HashSet;
use std::sync::Mutex;

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recoverable oddity (logged once per unique message).
///
/// Returns `true` if this call emitted the warning.
///
/// # Example
/// ```ignore
/// warn_once("Tree Builder", "stray close tag </font>");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_log = match WARNED.lock() {
        Ok(mut guard) => guard.get_or_insert_with(HashSet::new).insert(key),
        // A poisoned set only loses deduplication, never the warning itself.
        Err(_) => true,
    };

    if should_log {
        log::warn!(target: "shard", "[{component}] {message}");
    }
    should_log
}

/// Clear all recorded warnings (call when starting on a new document)
pub fn clear_warnings() {
    if let Ok(mut guard) = WARNED.lock()
        && let Some(set) = guard.as_mut()
    {
        set.clear();
    }
}
