//! Backing history store contract.

use std::sync::Mutex;

use crate::error::{HistoryError, Result};

/// An abstract store of previously submitted input lines.
///
/// This trait defines the contract for persisting and recalling history
/// entries, decoupling the filtering logic from the specific storage
/// mechanism (plain file, in-memory buffer, remote service).
///
/// # Implementation Notes
///
/// Implementations should:
/// - Store entries verbatim, including line breaks
/// - Preserve insertion order when yielding entries back
/// - Surface I/O failures as `Err` values rather than panicking
pub trait HistoryStore: Send + Sync {
    /// Appends one entry to the store.
    ///
    /// # Errors
    ///
    /// Propagates failures of the underlying medium.
    fn store_string(&self, entry: &str) -> Result<()>;

    /// Lazily yields previously stored entries in the store's own order.
    ///
    /// Nothing is materialized up front: consumers may stop pulling at any
    /// point, and I/O failures during iteration surface as `Err` items.
    fn load_history_strings(&self) -> Box<dyn Iterator<Item = Result<String>> + Send + '_>;
}

/// A `HistoryStore` backed by a plain in-memory vector.
///
/// Useful in tests and as a fallback when no history file is available.
/// Entries do not survive the process.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    entries: Mutex<Vec<String>>,
}

impl InMemoryHistoryStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn store_string(&self, entry: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| HistoryError::store("history mutex poisoned"))?;
        entries.push(entry.to_string());
        Ok(())
    }

    fn load_history_strings(&self) -> Box<dyn Iterator<Item = Result<String>> + Send + '_> {
        match self.entries.lock() {
            Ok(entries) => Box::new(entries.clone().into_iter().map(Ok)),
            Err(_) => Box::new(std::iter::once(Err(HistoryError::store(
                "history mutex poisoned",
            )))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_store_round_trip() {
        let store = InMemoryHistoryStore::new();

        store.store_string("/help").unwrap();
        store.store_string("explain this code").unwrap();

        let entries: Vec<String> = store
            .load_history_strings()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(entries, vec!["/help", "explain this code"]);
    }

    #[test]
    fn test_in_memory_store_keeps_entries_verbatim() {
        let store = InMemoryHistoryStore::new();

        store.store_string("first line\nsecond line").unwrap();

        let entries: Vec<String> = store
            .load_history_strings()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(entries, vec!["first line\nsecond line"]);
    }
}
