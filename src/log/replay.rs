//! Log Replay
//!
//! Rebuilds the offset index by scanning the log from the start.

use std::io::{BufRead, BufReader, SeekFrom};

use tracing::{info, warn};

use super::AppendLog;
use crate::error::{HintError, Result};
use crate::index::OffsetIndex;
use crate::medium::LogMedium;
use crate::record::{self, Record, TERMINATOR};

/// Result of a full log scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogScan {
    /// Number of complete records read
    pub records: u64,

    /// Number of distinct keys (live records)
    pub live_keys: usize,

    /// Offset just past the last complete record
    pub end_offset: u64,

    /// Bytes of an unterminated record at the tail (left by a failed append)
    pub torn_bytes: u64,
}

impl<S: LogMedium> AppendLog<S> {
    /// Visit every complete record in append order with its start offset
    ///
    /// An unterminated tail is not visited; its length is reported in
    /// `LogScan::torn_bytes`. A complete line that does not decode is an error.
    pub fn replay<F>(&mut self, mut apply: F) -> Result<LogScan>
    where
        F: FnMut(u64, Record),
    {
        self.medium
            .seek(SeekFrom::Start(0))
            .map_err(HintError::Read)?;

        let mut reader = BufReader::new(&mut self.medium);
        let mut scan = LogScan::default();
        let mut line = Vec::new();

        loop {
            line.clear();
            let n = reader
                .read_until(TERMINATOR, &mut line)
                .map_err(HintError::Read)?;
            if n == 0 {
                break;
            }
            if line.last() != Some(&TERMINATOR) {
                scan.torn_bytes = n as u64;
                break;
            }

            let record = record::decode(&line).map_err(|e| {
                HintError::Format(format!("record at offset {}: {}", scan.end_offset, e))
            })?;
            apply(scan.end_offset, record);

            scan.records += 1;
            scan.end_offset += n as u64;
        }

        Ok(scan)
    }
}

/// Rebuilds an offset index from the log
pub struct IndexRecovery;

impl IndexRecovery {
    /// Replay the log, keeping for each key the offset of its last record
    pub fn rebuild<S: LogMedium>(log: &mut AppendLog<S>) -> Result<(OffsetIndex, LogScan)> {
        let mut index = OffsetIndex::new();
        let mut scan = log.replay(|offset, record| {
            index.put(record.key, offset);
        })?;
        scan.live_keys = index.len();

        if scan.torn_bytes > 0 {
            warn!(
                torn_bytes = scan.torn_bytes,
                end_offset = scan.end_offset,
                "log ends with an incomplete record"
            );
        }
        info!(
            records = scan.records,
            live_keys = scan.live_keys,
            "rebuilt offset index from log"
        );

        Ok((index, scan))
    }
}
