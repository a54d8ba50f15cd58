//! Buffer storage
//!
//! The memo is persisted as a single text value under a fixed key. Storage
//! is consulted once at startup to seed the buffer and written after every
//! edit. Failures are reported to the caller, which logs them and keeps
//! editing; the last successful save stays on disk.
//!
//! - `file.rs` - `FileStorage`, one file per key under the data directory
//! - `MemoryStorage` - in-process map, used when no data directory exists

mod file;

pub use file::FileStorage;

use std::collections::HashMap;

use crate::error::Result;

/// Key under which the memo text is stored.
pub const STORAGE_KEY: &str = "markdown-memo-content";

/// A key/value store for the memo text.
pub trait Storage {
    /// Read the value stored under `key`, or `None` if nothing was saved yet.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `text` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, text: &str) -> Result<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// In-Memory Storage
// ─────────────────────────────────────────────────────────────────────────────

/// Volatile storage that lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one entry.
    #[cfg(test)]
    pub fn with_entry(key: &str, text: &str) -> Self {
        let mut storage = Self::new();
        storage.entries.insert(key.to_string(), text.to_string());
        storage
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, text: &str) -> Result<()> {
        self.entries.insert(key.to_string(), text.to_string());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_empty() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_memory_storage_set_and_get() {
        let mut storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, "# Memo").unwrap();
        storage.set(STORAGE_KEY, "# Memo\n\n- updated").unwrap();
        assert_eq!(
            storage.get(STORAGE_KEY).unwrap().as_deref(),
            Some("# Memo\n\n- updated")
        );
        assert_eq!(storage.get("other").unwrap(), None);
    }

    #[test]
    fn test_memory_storage_keeps_empty_text() {
        // A cleared memo is a saved value, not a missing one
        let storage = MemoryStorage::with_entry(STORAGE_KEY, "");
        assert_eq!(storage.get(STORAGE_KEY).unwrap(), Some(String::new()));
    }
}
