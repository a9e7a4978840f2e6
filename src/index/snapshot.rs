//! Index Snapshot Store
//!
//! Saves and loads the whole offset index to/from a snapshot medium.

use tracing::info;

use super::OffsetIndex;
use crate::error::{HintError, Result};
use crate::medium::SnapshotMedium;

/// Magic bytes identifying a hintkv index snapshot
const MAGIC: &[u8; 4] = b"HKVI";

/// Current snapshot format version
const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + CRC32 (4) + PayloadLen (8) = 18 bytes
const HEADER_SIZE: usize = 18;

/// Persists the offset index on a snapshot medium
pub struct SnapshotStore<M> {
    medium: M,
    sync_writes: bool,
}

impl<M: SnapshotMedium> SnapshotStore<M> {
    pub fn new(medium: M, sync_writes: bool) -> Self {
        Self {
            medium,
            sync_writes,
        }
    }

    /// Load the saved index
    ///
    /// Returns:
    /// - `Ok(Some(index))` — a snapshot was found and decoded
    /// - `Ok(None)` — the medium is empty (nothing saved yet)
    /// - `Err(Open)` — the snapshot exists but cannot be used
    pub fn load(&mut self) -> Result<Option<OffsetIndex>> {
        let bytes = self
            .medium
            .read_all()
            .map_err(|e| HintError::Open(format!("cannot read index snapshot: {}", e)))?;

        if bytes.is_empty() {
            return Ok(None);
        }

        let index = decode_snapshot(&bytes)?;
        info!(entries = index.len(), bytes = bytes.len(), "loaded index snapshot");

        Ok(Some(index))
    }

    /// Overwrite the snapshot with the full contents of `index`
    pub fn save(&mut self, index: &OffsetIndex) -> Result<()> {
        let bytes = encode_snapshot(index)?;

        self.medium
            .overwrite(&bytes)
            .map_err(HintError::SnapshotWrite)?;
        if self.sync_writes {
            self.medium.sync().map_err(HintError::SnapshotWrite)?;
        }

        info!(entries = index.len(), bytes = bytes.len(), "saved index snapshot");
        Ok(())
    }

    /// Release the store, handing the medium back
    pub fn into_inner(self) -> M {
        self.medium
    }
}

/// Serialize an index: header followed by the bincode payload
fn encode_snapshot(index: &OffsetIndex) -> Result<Vec<u8>> {
    let payload =
        bincode::serialize(index).map_err(|e| HintError::Serialization(e.to_string()))?;

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&payload);
    let crc = hasher.finalize();

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&VERSION.to_le_bytes());
    bytes.extend_from_slice(&crc.to_le_bytes());
    bytes.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&payload);

    Ok(bytes)
}

/// Parse and verify a snapshot produced by `encode_snapshot`
fn decode_snapshot(bytes: &[u8]) -> Result<OffsetIndex> {
    if bytes.len() < HEADER_SIZE {
        return Err(HintError::Open(format!(
            "index snapshot too short: {} bytes",
            bytes.len()
        )));
    }

    if &bytes[0..4] != MAGIC {
        return Err(HintError::Open(format!(
            "invalid snapshot magic: expected HKVI, got {:?}",
            &bytes[0..4]
        )));
    }

    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != VERSION {
        return Err(HintError::Open(format!(
            "unsupported snapshot version: {}",
            version
        )));
    }

    let mut crc_bytes = [0u8; 4];
    crc_bytes.copy_from_slice(&bytes[6..10]);
    let expected_crc = u32::from_le_bytes(crc_bytes);

    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&bytes[10..18]);
    let payload_len = u64::from_le_bytes(len_bytes);

    let payload = &bytes[HEADER_SIZE..];
    if payload.len() as u64 != payload_len {
        return Err(HintError::Open(format!(
            "snapshot payload length mismatch: header says {}, found {}",
            payload_len,
            payload.len()
        )));
    }

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(payload);
    if hasher.finalize() != expected_crc {
        return Err(HintError::Open("snapshot checksum mismatch".to_string()));
    }

    bincode::deserialize(payload)
        .map_err(|e| HintError::Open(format!("cannot decode index snapshot: {}", e)))
}
