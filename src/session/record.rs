//! Transcript line parsing.

use serde_json::Value;

use super::error::{Result, SessionError};
use super::models::RawRecord;

/// Parse one non-blank transcript line into a raw record.
///
/// Fails with [`SessionError::Parse`] when the line is not JSON and with
/// [`SessionError::InvalidFormat`] when the JSON does not have the record
/// shape. Unknown fields are ignored.
pub fn parse_record(line: &str) -> Result<RawRecord> {
    let value: Value = serde_json::from_str(line)?;
    serde_json::from_value(value).map_err(|e| SessionError::InvalidFormat(e.to_string()))
}
