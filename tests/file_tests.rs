//! Tests for file-backed databases
//!
//! These tests verify:
//! - Data and hint files are created on open
//! - Values survive close/reopen through the hint file
//! - Lost or stale hint files are recovered with an explicit rebuild
//! - A corrupt hint file or a torn data file fails the open

use std::fs;
use std::path::PathBuf;

use hintkv::config::{Config, SnapshotPolicy};
use hintkv::{Database, FileDatabase, HintError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_config() -> (TempDir, Config) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_file(temp_dir.path().join("store.log"))
        .sync_writes(true)
        .build();
    (temp_dir, config)
}

fn open(config: &Config) -> FileDatabase {
    Database::open_path(config.clone()).unwrap()
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_open_creates_files() {
    let temp_dir = TempDir::new().unwrap();
    let data_file: PathBuf = temp_dir.path().join("nested").join("db.log");
    let config = Config::builder().data_file(&data_file).build();

    let db = open(&config);

    assert!(data_file.exists());
    assert!(config.hint_file().exists());
    assert!(db.is_empty());
    db.close().unwrap();
}

#[test]
fn test_values_survive_reopen() {
    let (_temp, config) = setup_temp_config();

    {
        let mut db = open(&config);
        db.set("a", "1").unwrap();
        db.set("b", "2").unwrap();
        db.set("a", "3").unwrap();
        db.close().unwrap();
    }

    let mut db = open(&config);
    assert_eq!(db.get("a").unwrap(), "3");
    assert_eq!(db.get("b").unwrap(), "2");
    assert!(db.get("c").unwrap_err().is_not_found());

    assert_eq!(fs::read(&config.data_file).unwrap(), b"a,1\nb,2\na,3\n".to_vec());
}

#[test]
fn test_appends_continue_after_reopen() {
    let (_temp, config) = setup_temp_config();

    {
        let mut db = open(&config);
        db.set("a", "1").unwrap();
        db.close().unwrap();
    }

    let mut db = open(&config);
    db.set("b", "2").unwrap();

    assert_eq!(db.offset_of("b"), Some(4));
    assert_eq!(db.get("a").unwrap(), "1");
    assert_eq!(db.get("b").unwrap(), "2");
}

#[test]
fn test_hint_written_after_every_set() {
    let (_temp, config) = setup_temp_config();

    let mut db = open(&config);
    db.set("a", "1").unwrap();
    db.set("b", "2").unwrap();

    // Drop without close: the hint file is already current
    drop(db);

    let mut db = open(&config);
    assert_eq!(db.get("b").unwrap(), "2");
}

// =============================================================================
// Recovery Tests
// =============================================================================

#[test]
fn test_batched_hint_lags_until_rebuild() {
    let (_temp, mut config) = setup_temp_config();
    config.snapshot_policy = SnapshotPolicy::EveryNWrites { count: 10 };

    let mut db = open(&config);
    db.set("a", "1").unwrap();
    db.save_snapshot().unwrap();
    db.set("b", "2").unwrap();

    // Crash: the pending write never reaches the hint file
    drop(db);

    let mut db = open(&config);
    assert_eq!(db.get("a").unwrap(), "1");
    assert!(db.get("b").unwrap_err().is_not_found());

    let scan = db.rebuild_index().unwrap();

    assert_eq!(scan.records, 2);
    assert_eq!(db.get("b").unwrap(), "2");
}

#[test]
fn test_rebuild_after_lost_hint_file() {
    let (_temp, config) = setup_temp_config();

    {
        let mut db = open(&config);
        for i in 0..10 {
            db.set(&format!("k{}", i), &format!("v{}", i)).unwrap();
        }
        db.close().unwrap();
    }
    fs::remove_file(config.hint_file()).unwrap();

    let mut db = open(&config);
    assert!(db.is_empty());

    let scan = db.rebuild_index().unwrap();
    assert_eq!(scan.live_keys, 10);
    assert_eq!(db.get("k7").unwrap(), "v7");
    db.close().unwrap();

    // Rebuilt index was persisted
    let mut db = open(&config);
    assert_eq!(db.len(), 10);
    assert_eq!(db.get("k0").unwrap(), "v0");
}

#[test]
fn test_corrupt_hint_file_fails_open() {
    let (_temp, config) = setup_temp_config();

    {
        let mut db = open(&config);
        db.set("a", "1").unwrap();
        db.close().unwrap();
    }
    fs::write(config.hint_file(), b"HKVI not really a snapshot").unwrap();

    let err = Database::open_path(config.clone()).err().unwrap();
    assert!(matches!(err, HintError::Open(_)));
}

#[test]
fn test_torn_data_file_fails_open() {
    let (_temp, config) = setup_temp_config();

    {
        let mut db = open(&config);
        db.set("a", "1").unwrap();
        db.close().unwrap();
    }
    let mut bytes = fs::read(&config.data_file).unwrap();
    bytes.extend_from_slice(b"partial");
    fs::write(&config.data_file, &bytes).unwrap();

    let err = Database::open_path(config.clone()).err().unwrap();
    assert!(matches!(err, HintError::Open(_)));

    // Nothing was spliced onto the torn record
    assert_eq!(fs::read(&config.data_file).unwrap(), bytes);
}
