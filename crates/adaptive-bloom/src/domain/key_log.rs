//! Append-only record of every key added to the adaptive filter
//!
//! A set bit does not say which key set it, so a larger generation cannot be
//! derived from the bit pattern of a smaller one. Growth replays this log.
//!
//! Entries are reference counted, so a snapshot copies pointers rather than
//! key bytes.

use std::sync::Arc;

use parking_lot::RwLock;

/// Thread-safe, append-only key log
#[derive(Debug, Default)]
pub struct KeyLog {
    entries: RwLock<Vec<Arc<[u8]>>>,
}

impl KeyLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key. Returns its position in the log.
    pub fn append(&self, key: &[u8]) -> usize {
        let mut entries = self.entries.write();
        entries.push(key.into());
        entries.len() - 1
    }

    /// Point-in-time copy of every key appended so far
    pub fn snapshot(&self) -> Vec<Arc<[u8]>> {
        self.entries.read().clone()
    }

    /// Copy of the keys at positions `from..`, plus the log length observed.
    ///
    /// Feeding the returned length back as `from` on the next call yields
    /// exactly the keys appended in between.
    pub fn since(&self, from: usize) -> (Vec<Arc<[u8]>>, usize) {
        let entries = self.entries.read();
        let start = from.min(entries.len());
        (entries[start..].to_vec(), entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
