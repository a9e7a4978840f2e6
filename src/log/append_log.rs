//! Append Log
//!
//! Appends encoded records to a log medium and reads them back by offset.

use std::io::{BufRead, BufReader, SeekFrom};

use tracing::debug;

use crate::error::{HintError, Result};
use crate::medium::LogMedium;
use crate::record::{self, Record, TERMINATOR};

/// Append-only record log over a seekable medium
pub struct AppendLog<S> {
    /// Backing storage
    pub(super) medium: S,
    /// Byte length of the log as last observed
    end_offset: u64,
    /// fsync after every append
    sync_writes: bool,
}

impl<S: LogMedium> AppendLog<S> {
    /// Wrap a medium, picking up whatever records it already holds
    ///
    /// Fails with `Open` if the medium ends in an unterminated record (left
    /// by an append that did not complete): appending after it would splice
    /// the new record onto the partial one.
    pub fn open(mut medium: S, sync_writes: bool) -> Result<Self> {
        let end_offset = medium.seek(SeekFrom::End(0)).map_err(HintError::Read)?;

        if end_offset > 0 {
            medium.seek(SeekFrom::End(-1)).map_err(HintError::Read)?;
            let mut last = [0u8; 1];
            medium.read_exact(&mut last).map_err(HintError::Read)?;
            if last[0] != TERMINATOR {
                return Err(HintError::Open(format!(
                    "log ends with an incomplete record ({} bytes); truncate it to the last newline before reopening",
                    end_offset
                )));
            }
        }

        Ok(Self {
            medium,
            end_offset,
            sync_writes,
        })
    }

    /// Append a record, returning the offset its first byte was written at
    ///
    /// The offset is taken from the end of the log *before* writing. On
    /// error the log length is unknown and the log must not be appended to
    /// again without checking it.
    pub fn append(&mut self, record: &Record) -> Result<u64> {
        let offset = self
            .medium
            .seek(SeekFrom::End(0))
            .map_err(HintError::Write)?;

        let bytes = record::encode(record);
        self.medium.write_all(&bytes).map_err(HintError::Write)?;
        self.medium.flush().map_err(HintError::Write)?;

        if self.sync_writes {
            self.medium.sync().map_err(HintError::Write)?;
        }

        self.end_offset = offset + bytes.len() as u64;
        debug!(key = %record.key, offset, len = bytes.len(), "appended record");

        Ok(offset)
    }

    /// Read the single record starting at `offset`
    pub fn read_at(&mut self, offset: u64) -> Result<Record> {
        if offset >= self.end_offset {
            return Err(HintError::Format(format!(
                "offset {} is past the end of the log ({})",
                offset, self.end_offset
            )));
        }

        self.medium
            .seek(SeekFrom::Start(offset))
            .map_err(HintError::Read)?;

        let mut reader = BufReader::new(&mut self.medium);
        let mut line = Vec::new();
        reader
            .read_until(TERMINATOR, &mut line)
            .map_err(HintError::Read)?;

        if line.last() != Some(&TERMINATOR) {
            return Err(HintError::Format(format!(
                "truncated record at offset {}",
                offset
            )));
        }

        let record = record::decode(&line)?;
        debug!(key = %record.key, offset, "read record");

        Ok(record)
    }

    /// Force appended records to durable storage
    pub fn sync(&mut self) -> Result<()> {
        self.medium.flush().map_err(HintError::Write)?;
        self.medium.sync().map_err(HintError::Write)
    }

    /// Current byte length of the log
    pub fn len(&self) -> u64 {
        self.end_offset
    }

    pub fn is_empty(&self) -> bool {
        self.end_offset == 0
    }

    /// Release the log, handing the medium back
    pub fn into_inner(self) -> S {
        self.medium
    }
}
