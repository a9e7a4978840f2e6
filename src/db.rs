//! Database Module
//!
//! The store facade that ties the append log, the offset index and the
//! snapshot store together.
//!
//! ## Responsibilities
//! - `set`: append → index update → snapshot save
//! - `get`: index lookup → read one record at the offset
//! - Load the snapshot on open; start empty when there is none
//! - Fail closed when the log cannot be written
//!
//! ## Concurrency Model
//! None. A `Database` is a single-threaded handle: every call runs to
//! completion on the caller's thread and `get` needs `&mut self` because
//! it moves the log's read position. There is no atomicity across the
//! append + index update + snapshot save sequence.

use std::fs::{self, File, OpenOptions};

use tracing::{debug, info, warn};

use crate::config::{Config, SnapshotPolicy};
use crate::error::{HintError, Result};
use crate::index::{OffsetIndex, SnapshotStore};
use crate::log::{AppendLog, IndexRecovery, LogScan};
use crate::medium::{LogMedium, SnapshotMedium};
use crate::record::Record;

/// A database backed by a data file and its `.hint` snapshot file
pub type FileDatabase = Database<File, File>;

/// An open key-value database
///
/// Owns one log, one index and one snapshot store for its whole lifetime.
/// After a failed log append the log is released and every further call
/// returns `HintError::Closed`.
pub struct Database<L, M> {
    /// Record log; `None` once poisoned by a write failure
    log: Option<AppendLog<L>>,

    /// Key → offset of the live record
    index: OffsetIndex,

    /// Persisted copy of `index`
    snapshots: SnapshotStore<M>,

    /// When to rewrite the snapshot
    snapshot_policy: SnapshotPolicy,

    /// Sets applied to `index` since the last successful snapshot save
    pending_writes: usize,
}

impl<L: LogMedium, M: SnapshotMedium> Database<L, M> {
    /// Open a database on the given log and snapshot media with default settings
    pub fn open(log: L, snapshot: M) -> Result<Self> {
        Self::open_with(log, snapshot, &Config::default())
    }

    /// Open a database on the given media
    ///
    /// Only `snapshot_policy` and `sync_writes` are taken from `config`;
    /// the media are already open.
    ///
    /// On startup:
    /// 1. Position the log at its end, refusing a log with a torn tail
    /// 2. Load the snapshot if the medium holds one, else start empty
    ///
    /// The log is never scanned here. An unreadable snapshot fails the open.
    pub fn open_with(log: L, snapshot: M, config: &Config) -> Result<Self> {
        let log = AppendLog::open(log, config.sync_writes).map_err(|e| match e {
            HintError::Open(_) => e,
            other => HintError::Open(format!("cannot open log: {}", other)),
        })?;

        let mut snapshots = SnapshotStore::new(snapshot, config.sync_writes);
        let index = match snapshots.load()? {
            Some(index) => index,
            None => {
                info!("no index snapshot found, starting with an empty index");
                OffsetIndex::new()
            }
        };

        debug!(keys = index.len(), log_len = log.len(), "database open");

        Ok(Self {
            log: Some(log),
            index,
            snapshots,
            snapshot_policy: config.snapshot_policy,
            pending_writes: 0,
        })
    }

    /// Store `value` under `key`
    ///
    /// Steps:
    /// 1. Append the record to the log
    /// 2. Point the index at the new record
    /// 3. Save the snapshot (per the snapshot policy)
    ///
    /// A failed append closes the database and leaves the index untouched.
    /// A failed snapshot save returns `PartiallyApplied`: the value is
    /// readable, but the persisted snapshot is stale until
    /// `save_snapshot` succeeds.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let record = Record::new(key, value);
        record.validate()?;

        let log = self.log.as_mut().ok_or(HintError::Closed)?;
        let offset = match log.append(&record) {
            Ok(offset) => offset,
            Err(e) => {
                warn!(key, error = %e, "log append failed, closing database");
                self.log = None;
                return Err(e);
            }
        };

        self.index.put(record.key, offset);
        self.pending_writes += 1;

        if self.pending_writes >= self.snapshot_policy.threshold() {
            self.save_snapshot().map_err(|e| {
                warn!(key, error = %e, "snapshot save failed after append");
                HintError::PartiallyApplied {
                    key: key.to_string(),
                    source: Box::new(e),
                }
            })?;
        }

        Ok(())
    }

    /// Get the value stored under `key`
    ///
    /// Returns `Err(KeyNotFound)` if the key was never written.
    pub fn get(&mut self, key: &str) -> Result<String> {
        let log = self.log.as_mut().ok_or(HintError::Closed)?;
        let offset = self.index.lookup(key)?;

        let record = log.read_at(offset)?;
        if record.key != key {
            return Err(HintError::Format(format!(
                "record at offset {} holds key {:?}, expected {:?}",
                offset, record.key, key
            )));
        }

        Ok(record.value)
    }

    /// Persist the current index, clearing any pending writes
    ///
    /// Use this to retry after a `PartiallyApplied` error.
    pub fn save_snapshot(&mut self) -> Result<()> {
        if self.log.is_none() {
            return Err(HintError::Closed);
        }

        self.snapshots.save(&self.index)?;
        self.pending_writes = 0;
        Ok(())
    }

    /// Replace the index with one rebuilt from the log, then save it
    ///
    /// Never run implicitly; for recovering from a stale or lost snapshot.
    pub fn rebuild_index(&mut self) -> Result<LogScan> {
        let log = self.log.as_mut().ok_or(HintError::Closed)?;
        let (index, scan) = IndexRecovery::rebuild(log)?;

        self.index = index;
        self.save_snapshot()?;

        Ok(scan)
    }

    /// Close the database, handing back the log and snapshot media
    ///
    /// Saves the snapshot if writes are pending and syncs the log.
    /// Dropping a `Database` without closing it skips both.
    pub fn close(mut self) -> Result<(L, M)> {
        let mut log = self.log.take().ok_or(HintError::Closed)?;

        if self.pending_writes > 0 {
            self.snapshots.save(&self.index)?;
        }
        log.sync()?;

        info!(keys = self.index.len(), log_len = log.len(), "database closed");
        Ok((log.into_inner(), self.snapshots.into_inner()))
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Log offset of the live record for `key`
    pub fn offset_of(&self, key: &str) -> Option<u64> {
        self.index.get(key)
    }

    /// Byte length of the log, or `None` once the database is closed
    pub fn log_len(&self) -> Option<u64> {
        self.log.as_ref().map(|log| log.len())
    }

    pub fn is_open(&self) -> bool {
        self.log.is_some()
    }

    /// Sets not yet reflected in the persisted snapshot
    pub fn pending_snapshot_writes(&self) -> usize {
        self.pending_writes
    }
}

impl Database<File, File> {
    /// Open or create a file-backed database
    ///
    /// The data file is opened for reading and appending; the snapshot is
    /// `<data_file>.hint`, created empty if it does not exist yet.
    pub fn open_path(config: Config) -> Result<Self> {
        if let Some(parent) = config.data_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    HintError::Open(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }

        let log = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&config.data_file)
            .map_err(|e| {
                HintError::Open(format!(
                    "cannot open data file {}: {}",
                    config.data_file.display(),
                    e
                ))
            })?;

        let hint_path = config.hint_file();
        let hint = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&hint_path)
            .map_err(|e| {
                HintError::Open(format!(
                    "cannot open hint file {}: {}",
                    hint_path.display(),
                    e
                ))
            })?;

        Self::open_with(log, hint, &config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    type MemDatabase = Database<Cursor<Vec<u8>>, Cursor<Vec<u8>>>;

    fn empty_db() -> MemDatabase {
        Database::open(Cursor::new(Vec::new()), Cursor::new(Vec::new())).unwrap()
    }

    #[test]
    fn test_set_then_get() {
        let mut db = empty_db();
        db.set("a", "1").unwrap();
        assert_eq!(db.get("a").unwrap(), "1");
        assert_eq!(db.pending_snapshot_writes(), 0);
    }

    #[test]
    fn test_rejects_unencodable_key() {
        let mut db = empty_db();
        let err = db.set("a,b", "1").unwrap_err();
        assert!(matches!(err, HintError::Format(_)));
        assert_eq!(db.log_len(), Some(0));
        assert!(db.is_open());
    }

    #[test]
    fn test_get_detects_index_pointing_at_wrong_record() {
        let mut db = empty_db();
        db.set("a", "1").unwrap();
        db.set("b", "2").unwrap();
        db.index.put("a", 4);

        assert!(matches!(db.get("a"), Err(HintError::Format(_))));
    }
}
