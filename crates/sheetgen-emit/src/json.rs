//! JSON emitter
//!
//! Records become objects, sequences become arrays, and integers and floats
//! keep their variant (`7` and `7.0`). Output is compact.

use sheetgen_core::Record;

use crate::error::EmitResult;

/// Serialise a record sequence as a JSON array
pub fn to_string(records: &[Record]) -> EmitResult<String> {
    Ok(serde_json::to_string(records)?)
}

/// Parse a JSON array of records, as written by [`to_string`]
pub fn from_str(text: &str) -> EmitResult<Vec<Record>> {
    Ok(serde_json::from_str(text)?)
}
