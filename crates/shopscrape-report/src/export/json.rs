use serde_json::{Map, Value};
use shopscrape_core::ResultTable;

use crate::error::ReportError;

/// Encodes the table as a pretty-printed JSON array with one object per row.
///
/// Object keys follow the table's column order; null cells become `null`.
///
/// # Errors
///
/// Returns [`ReportError::Json`] if a cell cannot be serialized.
pub fn to_json(table: &ResultTable) -> Result<String, ReportError> {
    let columns = table.columns();
    let mut objects: Vec<Value> = Vec::with_capacity(table.len());

    for record in table.records() {
        let mut object = Map::with_capacity(columns.len());
        for (column, cell) in columns.iter().zip(record) {
            object.insert(column.clone(), serde_json::to_value(cell)?);
        }
        objects.push(Value::Object(object));
    }

    Ok(serde_json::to_string_pretty(&objects)?)
}
