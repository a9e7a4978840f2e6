//! Append Log Module
//!
//! The record log: every `set` appends one line, nothing is ever rewritten.
//!
//! ## Responsibilities
//! - Append records and report the offset each one starts at
//! - Read back exactly one record at a known offset
//! - Replay the whole log to rebuild the offset index on request
//!
//! ## File Layout
//! ```text
//! offset 0        offset 4        offset 8
//! │               │               │
//! ▼               ▼               ▼
//! ┌───────────────┬───────────────┬───────────────┐
//! │ a , 1 \n      │ b , 2 \n      │ a , 3 \n      │ ...
//! └───────────────┴───────────────┴───────────────┘
//! ```
//! A key may appear many times; only the record its index entry points at
//! is live.

mod append_log;
mod replay;

pub use append_log::AppendLog;
pub use replay::{IndexRecovery, LogScan};
