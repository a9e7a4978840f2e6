//! Index Module
//!
//! In-memory key → offset index and its persisted snapshot ("hint file").
//!
//! ## Responsibilities
//! - Map each key to the start offset of its latest record
//! - Persist the whole map so startup does not rescan the log
//!
//! ## Snapshot Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (18 bytes)                                       │
//! │   Magic: "HKVI" (4) | Version: u16 (2) | CRC32: u32 (4) │
//! │   PayloadLen: u64 (8)                                   │
//! ├─────────────────────────────────────────────────────────┤
//! │ Payload (variable)                                      │
//! │   bincode(BTreeMap<String, u64>)                        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//! Every save rewrites the whole snapshot; it is not incremental.

mod offsets;
mod snapshot;

pub use offsets::OffsetIndex;
pub use snapshot::SnapshotStore;
