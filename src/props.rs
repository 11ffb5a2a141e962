//! # Process-local property table with scoped overlays.
//!
//! A single shared string-to-string table that entry-point code can read and
//! write during an invocation. The launcher applies the configured overlay
//! before resolution and restores the prior table after supervision completes.
//!
//! ## Rules
//! - [`overlay`] snapshots the entire table, then applies its entries on top.
//! - Dropping the returned [`OverlayGuard`] replaces the table with the
//!   snapshot wholesale: keys the overlay introduced disappear, overwritten
//!   values revert, and writes made by entry-point code while the guard was
//!   live are discarded with them.
//! - The table is crate-local state, not the OS environment.

use std::collections::BTreeMap;
use std::sync::{Mutex, OnceLock, PoisonError};

static TABLE: OnceLock<Mutex<BTreeMap<String, String>>> = OnceLock::new();

fn table() -> &'static Mutex<BTreeMap<String, String>> {
    TABLE.get_or_init(|| Mutex::new(BTreeMap::new()))
}

/// Returns the value stored under `key`, if any.
pub fn get(key: &str) -> Option<String> {
    table()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(key)
        .cloned()
}

/// Stores `value` under `key`, replacing any previous value.
pub fn set(key: impl Into<String>, value: impl Into<String>) {
    table()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key.into(), value.into());
}

/// Removes `key` from the table, returning the stored value if present.
pub fn remove(key: &str) -> Option<String> {
    table()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(key)
}

/// Returns a copy of the entire table.
pub fn snapshot() -> BTreeMap<String, String> {
    table()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Applies `entries` on top of the current table and returns a guard that
/// restores the pre-overlay table when dropped.
///
/// ## Example
/// ```rust
/// use std::collections::BTreeMap;
///
/// let mut entries = BTreeMap::new();
/// entries.insert("app.mode".to_string(), "fast".to_string());
///
/// {
///     let _guard = runvisor::props::overlay(&entries);
///     assert_eq!(runvisor::props::get("app.mode").as_deref(), Some("fast"));
/// }
/// assert_eq!(runvisor::props::get("app.mode"), None);
/// ```
pub fn overlay(entries: &BTreeMap<String, String>) -> OverlayGuard {
    let mut guard = table().lock().unwrap_or_else(PoisonError::into_inner);
    let prior = guard.clone();
    for (key, value) in entries {
        guard.insert(key.clone(), value.clone());
    }
    OverlayGuard { prior }
}

/// Restores the property table captured at [`overlay`] time when dropped.
#[must_use = "dropping the guard immediately undoes the overlay"]
pub struct OverlayGuard {
    prior: BTreeMap<String, String>,
}

impl Drop for OverlayGuard {
    fn drop(&mut self) {
        let mut guard = table().lock().unwrap_or_else(PoisonError::into_inner);
        *guard = std::mem::take(&mut self.prior);
    }
}

/// Serializes tests that touch the shared table.
#[cfg(test)]
pub(crate) fn test_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_reverts_overwrites_and_removes_introduced_keys() {
        let _serial = test_lock();

        set("props.base", "original");
        let mut entries = BTreeMap::new();
        entries.insert("props.base".to_string(), "changed".to_string());
        entries.insert("props.fresh".to_string(), "new".to_string());

        {
            let _guard = overlay(&entries);
            assert_eq!(get("props.base").as_deref(), Some("changed"), "overlay must overwrite");
            assert_eq!(get("props.fresh").as_deref(), Some("new"), "overlay must introduce");
        }

        assert_eq!(get("props.base").as_deref(), Some("original"), "overwrite must revert");
        assert_eq!(get("props.fresh"), None, "introduced key must be removed");

        remove("props.base");
    }

    #[test]
    fn test_restore_discards_writes_made_while_overlaid() {
        let _serial = test_lock();

        set("props.kept", "before");
        {
            let _guard = overlay(&BTreeMap::new());
            set("props.transient", "during");
            remove("props.kept");
            assert_eq!(get("props.kept"), None);
        }

        assert_eq!(get("props.transient"), None, "writes during overlay must be discarded");
        assert_eq!(get("props.kept").as_deref(), Some("before"), "removals during overlay must revert");

        remove("props.kept");
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let _serial = test_lock();

        set("props.snap", "v1");
        let copy = snapshot();
        set("props.snap", "v2");

        assert_eq!(copy.get("props.snap").map(String::as_str), Some("v1"));
        assert_eq!(get("props.snap").as_deref(), Some("v2"));

        remove("props.snap");
    }
}
