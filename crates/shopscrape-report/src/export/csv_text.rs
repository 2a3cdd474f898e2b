use shopscrape_core::ResultTable;

use crate::error::ReportError;

/// Encodes the table as CSV with a header row. Null cells are empty fields.
///
/// # Errors
///
/// Returns [`ReportError::Csv`] if a record cannot be written.
pub fn to_csv(table: &ResultTable) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for record in table.records() {
        writer.write_record(record.iter().map(ToString::to_string))?;
    }
    writer.into_inner().map_err(|e| ReportError::Io(e.into_error()))
}
