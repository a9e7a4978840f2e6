//! # hintkv
//!
//! A minimal persistent key-value store with:
//! - An append-only, line-oriented record log
//! - An in-memory index from key to record offset
//! - A persisted index snapshot ("hint file") so startup never rescans the log
//! - Fail-closed writes and typed, recoverable errors
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Database                               │
//! │              set(key, value) / get(key)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼─────────────────────┐
//!          │            │                     │
//!          ▼            ▼                     ▼
//!   ┌─────────────┐ ┌─────────────┐   ┌───────────────┐
//!   │ Append Log  │ │ OffsetIndex │──▶│ SnapshotStore │
//!   │ (records)   │ │ key→offset  │   │ (.hint file)  │
//!   └──────┬──────┘ └─────────────┘   └───────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │Record codec │
//!   │ "key,value" │
//!   └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use hintkv::{Config, Database};
//!
//! # fn main() -> hintkv::Result<()> {
//! let config = Config::builder().data_file("/tmp/store.log").build();
//! let mut db = Database::open_path(config)?;
//!
//! db.set("a", "1")?;
//! assert_eq!(db.get("a")?, "1");
//!
//! match db.get("missing") {
//!     Err(e) if e.is_not_found() => {}
//!     other => panic!("unexpected: {:?}", other),
//! }
//!
//! db.close()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod medium;
pub mod log;
pub mod index;
pub mod db;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{HintError, Result};
pub use config::{Config, SnapshotPolicy};
pub use db::{Database, FileDatabase};
pub use record::Record;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of hintkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
