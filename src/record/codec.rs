//! Record codec
//!
//! Encoding and decoding between `Record` and its line representation.

use bytes::{BufMut, Bytes, BytesMut};

use super::Record;
use crate::error::{HintError, Result};

/// Field delimiter between key and value
pub const DELIM: u8 = b',';

/// Record terminator
pub const TERMINATOR: u8 = b'\n';

/// Encode a record to bytes
///
/// Format: key + ',' + value + '\n'
pub fn encode(record: &Record) -> Bytes {
    let mut buf = BytesMut::with_capacity(record.encoded_len());
    buf.put_slice(record.key.as_bytes());
    buf.put_u8(DELIM);
    buf.put_slice(record.value.as_bytes());
    buf.put_u8(TERMINATOR);
    buf.freeze()
}

/// Decode one line into a record
///
/// The key ends at the first delimiter; the value runs to the terminator
/// (or the end of the input if the terminator was already stripped).
pub fn decode(line: &[u8]) -> Result<Record> {
    let line = line.strip_suffix(&[TERMINATOR]).unwrap_or(line);

    let split = line
        .iter()
        .position(|&b| b == DELIM)
        .ok_or_else(|| HintError::Format("record has no delimiter".to_string()))?;

    let key = std::str::from_utf8(&line[..split])
        .map_err(|e| HintError::Format(format!("key is not valid UTF-8: {}", e)))?;
    let value = std::str::from_utf8(&line[split + 1..])
        .map_err(|e| HintError::Format(format!("value is not valid UTF-8: {}", e)))?;

    Ok(Record::new(key, value))
}
