//! Configuration for hintkv
//!
//! Centralized configuration with sensible defaults.

use std::ffi::OsString;
use std::path::PathBuf;

/// Main configuration for a hintkv database
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the append-only data log.
    /// The index snapshot lives next to it:
    ///   {data_file}        (record log)
    ///   {data_file}.hint   (index snapshot)
    pub data_file: PathBuf,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// How often the index snapshot is rewritten
    pub snapshot_policy: SnapshotPolicy,

    /// fsync the log after every append and the snapshot after every save
    pub sync_writes: bool,
}

/// Snapshot persistence strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotPolicy {
    /// Rewrite the snapshot after every successful set (persisted index never
    /// lags the in-memory one by more than one write)
    EveryWrite,

    /// Rewrite the snapshot after N sets. Up to N-1 writes can be missing
    /// from the snapshot after a crash.
    EveryNWrites { count: usize },
}

impl SnapshotPolicy {
    /// Number of writes that may accumulate before a save is required
    pub(crate) fn threshold(&self) -> usize {
        match self {
            SnapshotPolicy::EveryWrite => 1,
            SnapshotPolicy::EveryNWrites { count } => (*count).max(1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("./hintkv.log"),
            snapshot_policy: SnapshotPolicy::EveryWrite,
            sync_writes: false,
        }
    }
}

impl Config {
    /// Suffix appended to the data file name for the snapshot
    pub const HINT_SUFFIX: &'static str = ".hint";

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Path of the index snapshot ("hint file")
    pub fn hint_file(&self) -> PathBuf {
        let mut name = OsString::from(self.data_file.as_os_str());
        name.push(Self::HINT_SUFFIX);
        PathBuf::from(name)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data log path
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    /// Set the snapshot policy
    pub fn snapshot_policy(mut self, policy: SnapshotPolicy) -> Self {
        self.config.snapshot_policy = policy;
        self
    }

    /// Enable or disable fsync after writes
    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.config.sync_writes = sync;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
