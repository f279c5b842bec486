//! Record tables → cell entries.
//!
//! A table is a JSON array of objects. The first record's keys become the
//! header row (row 0) and record `i` fills row `i + 1`, one column per
//! header key. Everything is clipped to the grid.

use serde_json::Value;

use crate::store::CellStore;
use crate::types::CellPos;

/// Build a store from a record table. Returns `None` (and builds nothing)
/// when the input is not an array, is empty, or its first record is not an
/// object. A later record that is not an object leaves its row empty.
pub fn table_to_store(table: &Value, total_rows: u32, total_cols: u32) -> Option<CellStore> {
    let records = table.as_array()?;
    let headers: Vec<&String> = records.first()?.as_object()?.keys().collect();

    let mut entries = Vec::new();
    for (col, key) in headers.iter().enumerate() {
        let Some(col) = clip(col, total_cols) else {
            break;
        };
        entries.push((CellPos::new(0, col), (*key).clone()));
    }
    for (index, record) in records.iter().enumerate() {
        let Some(row) = index.checked_add(1).and_then(|r| clip(r, total_rows)) else {
            break;
        };
        let Some(fields) = record.as_object() else {
            continue;
        };
        for (col, key) in headers.iter().enumerate() {
            let Some(col) = clip(col, total_cols) else {
                break;
            };
            if let Some(value) = fields.get(key.as_str()) {
                entries.push((CellPos::new(row, col), coerce(value)));
            }
        }
    }
    Some(CellStore::from_entries(entries))
}

/// Render a JSON value as cell text. `null` becomes empty.
pub fn coerce(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn clip(index: usize, limit: u32) -> Option<u32> {
    u32::try_from(index).ok().filter(|i| *i < limit)
}
