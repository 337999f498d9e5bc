use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{ExportError, Result};
use crate::model::Conversation;

/// Read the export file and split it into raw conversation records.
///
/// Records are decoded one at a time with [`decode_conversation`], so a single
/// malformed entry doesn't take the whole export down with it.
pub fn load_records(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
    let value: Value = serde_json::from_str(&content).map_err(|e| ExportError::parse(path, e))?;

    match value {
        Value::Array(records) => Ok(records),
        _ => Err(ExportError::not_an_array(path)),
    }
}

pub fn decode_conversation(index: usize, record: Value) -> Result<Conversation> {
    serde_json::from_value(record).map_err(|e| ExportError::conversion(index, e))
}
