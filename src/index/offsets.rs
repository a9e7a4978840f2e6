//! Offset Index
//!
//! BTreeMap-based map from key to the start offset of its live record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{HintError, Result};

/// In-memory index: key → log offset of the latest record for that key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OffsetIndex {
    entries: BTreeMap<String, u64>,
}

impl OffsetIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `key` at `offset`, replacing any previous entry
    ///
    /// Returns the offset it replaced.
    pub fn put(&mut self, key: impl Into<String>, offset: u64) -> Option<u64> {
        self.entries.insert(key.into(), offset)
    }

    /// Offset of the live record for `key`
    ///
    /// Returns `Err(KeyNotFound)` if the key was never written.
    pub fn lookup(&self, key: &str) -> Result<u64> {
        self.get(key)
            .ok_or_else(|| HintError::KeyNotFound(key.to_string()))
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries.get(key).copied()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|(k, &v)| (k.as_str(), v))
    }
}
