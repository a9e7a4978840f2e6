//! Tests for the Append Log
//!
//! These tests verify:
//! - Offsets returned by append on a real file
//! - Reading a single record back by offset
//! - Refusing to append after a torn record
//! - Replay order and index rebuild

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use hintkv::log::{AppendLog, IndexRecovery};
use hintkv::{HintError, Record};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn open_append(path: &Path) -> File {
    OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .unwrap()
}

// =============================================================================
// File-backed Log Tests
// =============================================================================

#[test]
fn test_append_and_read_on_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data.log");

    let mut log = AppendLog::open(open_append(&path), true).unwrap();
    let offsets: Vec<u64> = [("alpha", "1"), ("beta", "22"), ("alpha", "333")]
        .iter()
        .map(|(k, v)| log.append(&Record::new(*k, *v)).unwrap())
        .collect();

    assert_eq!(offsets, vec![0, 8, 16]);
    assert_eq!(log.read_at(16).unwrap(), Record::new("alpha", "333"));
    assert_eq!(log.read_at(0).unwrap(), Record::new("alpha", "1"));

    // Reads move the cursor; the next append must still land at the end
    let next = log.append(&Record::new("gamma", "x")).unwrap();
    assert_eq!(next, 26);
    assert_eq!(log.len(), 34);
}

#[test]
fn test_reopen_continues_at_end() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data.log");

    {
        let mut log = AppendLog::open(open_append(&path), false).unwrap();
        log.append(&Record::new("a", "1")).unwrap();
        log.sync().unwrap();
    }

    let mut log = AppendLog::open(open_append(&path), false).unwrap();
    assert_eq!(log.len(), 4);
    assert_eq!(log.append(&Record::new("b", "2")).unwrap(), 4);
}

#[test]
fn test_open_rejects_torn_tail_until_truncated() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data.log");
    fs::write(&path, b"a,1\nb,").unwrap();

    let err = AppendLog::open(open_append(&path), false).err().unwrap();
    assert!(matches!(err, HintError::Open(_)));
    assert_eq!(fs::read(&path).unwrap(), b"a,1\nb,".to_vec());

    open_append(&path).set_len(4).unwrap();

    let mut log = AppendLog::open(open_append(&path), false).unwrap();
    assert_eq!(log.append(&Record::new("c", "3")).unwrap(), 4);

    let (index, scan) = IndexRecovery::rebuild(&mut log).unwrap();
    assert_eq!(scan.records, 2);
    assert_eq!(index.get("a"), Some(0));
    assert_eq!(index.get("c"), Some(4));
    assert_eq!(index.get("b"), None);
}

// =============================================================================
// Replay Tests
// =============================================================================

#[test]
fn test_replay_visits_records_in_order() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data.log");

    let mut log = AppendLog::open(open_append(&path), false).unwrap();
    for (k, v) in [("a", "1"), ("b", "2"), ("a", "3")] {
        log.append(&Record::new(k, v)).unwrap();
    }

    let mut seen = Vec::new();
    let scan = log
        .replay(|offset, record| seen.push((offset, record.key, record.value)))
        .unwrap();

    assert_eq!(
        seen,
        vec![
            (0, "a".to_string(), "1".to_string()),
            (4, "b".to_string(), "2".to_string()),
            (8, "a".to_string(), "3".to_string()),
        ]
    );
    assert_eq!(scan.records, 3);
    assert_eq!(scan.end_offset, log.len());

    let (index, _) = IndexRecovery::rebuild(&mut log).unwrap();
    assert_eq!(index.get("a"), Some(8));
    assert_eq!(index.get("b"), Some(4));
}
