//! Record Module
//!
//! The unit stored in the append log: one key/value pair per line.
//!
//! ## Record Format
//! ```text
//! ┌───────────┬───────┬─────────────┬────────┐
//! │    key    │  ','  │    value    │  '\n'  │
//! └───────────┴───────┴─────────────┴────────┘
//! ```
//!
//! No escaping is performed. A key may not contain `,` or `\n` and a value
//! may not contain `\n`; `Record::validate` rejects anything else before it
//! reaches the log.

mod codec;

pub use codec::{decode, encode, DELIM, TERMINATOR};

use crate::error::{HintError, Result};

/// A single key/value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub value: String,
}

impl Record {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Check that the record survives an encode/decode cycle unchanged
    pub fn validate(&self) -> Result<()> {
        if self.key.bytes().any(|b| b == DELIM || b == TERMINATOR) {
            return Err(HintError::Format(format!(
                "key {:?} contains a delimiter or newline",
                self.key
            )));
        }
        if self.value.bytes().any(|b| b == TERMINATOR) {
            return Err(HintError::Format(format!(
                "value for key {:?} contains a newline",
                self.key
            )));
        }
        Ok(())
    }

    /// Size of the encoded record in bytes
    pub fn encoded_len(&self) -> usize {
        self.key.len() + self.value.len() + 2
    }
}
