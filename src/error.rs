//! Error types for hintkv
//!
//! Provides a unified error type for all operations. Every failure is
//! returned to the caller; nothing in the library aborts the process.

use std::io;

use thiserror::Error;

/// Result type alias using HintError
pub type Result<T> = std::result::Result<T, HintError>;

/// Unified error type for hintkv operations
#[derive(Debug, Error)]
pub enum HintError {
    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    /// Malformed record, or a key/value the codec cannot represent
    #[error("Format error: {0}")]
    Format(String),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    /// The key has never been written. Expected and recoverable.
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    // -------------------------------------------------------------------------
    // Write Errors
    // -------------------------------------------------------------------------
    /// Appending to the log failed. The handle is closed afterwards.
    #[error("Log write failed: {0}")]
    Write(#[source] io::Error),

    /// The record for `key` is in the log and the in-memory index, but the
    /// persisted snapshot could not be updated and now lags behind.
    #[error("Write to '{key}' partially applied: snapshot save failed: {source}")]
    PartiallyApplied {
        key: String,
        #[source]
        source: Box<HintError>,
    },

    /// Persisting the index snapshot failed
    #[error("Snapshot write failed: {0}")]
    SnapshotWrite(#[source] io::Error),

    // -------------------------------------------------------------------------
    // Read Errors
    // -------------------------------------------------------------------------
    #[error("Log read failed: {0}")]
    Read(#[source] io::Error),

    // -------------------------------------------------------------------------
    // Open Errors
    // -------------------------------------------------------------------------
    /// The database could not be opened (unusable snapshot or backing files)
    #[error("Open failed: {0}")]
    Open(String),

    /// The handle was poisoned by an earlier log write failure
    #[error("Database is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HintError {
    /// True for the normal "key was never written" outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, HintError::KeyNotFound(_))
    }

    /// True when a write reached the log and index but not the snapshot
    pub fn is_partial_write(&self) -> bool {
        matches!(self, HintError::PartiallyApplied { .. })
    }
}
