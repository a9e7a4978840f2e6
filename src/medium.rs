//! Backing media
//!
//! The log and the snapshot live on resources supplied by the caller.
//! Opening or creating them is the caller's business; the engine only
//! needs the operations below.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

/// Seekable, appendable, readable storage for the record log
pub trait LogMedium: Read + Write + Seek {
    /// Force written bytes to durable storage
    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogMedium for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }
}

impl LogMedium for Cursor<Vec<u8>> {}

/// Storage for the index snapshot: whole-content read and overwrite
pub trait SnapshotMedium {
    /// Read the complete current content (empty if nothing was saved yet)
    fn read_all(&mut self) -> io::Result<Vec<u8>>;

    /// Replace the complete content with `bytes`
    fn overwrite(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Force written bytes to durable storage
    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SnapshotMedium for File {
    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        self.seek(SeekFrom::Start(0))?;
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn overwrite(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.set_len(0)?;
        self.seek(SeekFrom::Start(0))?;
        self.write_all(bytes)?;
        self.flush()
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }
}

impl SnapshotMedium for Cursor<Vec<u8>> {
    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        Ok(self.get_ref().clone())
    }

    fn overwrite(&mut self, bytes: &[u8]) -> io::Result<()> {
        let buf = self.get_mut();
        buf.clear();
        buf.extend_from_slice(bytes);
        self.set_position(bytes.len() as u64);
        Ok(())
    }
}
