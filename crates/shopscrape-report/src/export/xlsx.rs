use rust_xlsxwriter::{Format, Workbook, Worksheet};
use shopscrape_core::{Cell, ResultTable};

use crate::error::ReportError;

/// Name of the single worksheet in the exported workbook.
pub const SHEET_NAME: &str = "Products";

/// Longest string an Excel cell can hold, in characters.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Encodes the table as an XLSX workbook with a bold header row.
///
/// Null cells are left empty. Numbers and booleans keep their cell types.
/// Text longer than [`MAX_CELL_CHARS`] (typically a long product description)
/// is truncated to fit, with a warning; CSV and JSON keep the full text.
///
/// # Errors
///
/// - [`ReportError::SheetLimit`]: more rows or columns than a worksheet holds.
/// - [`ReportError::Xlsx`]: the workbook could not be written.
pub fn to_xlsx(table: &ResultTable) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let header = Format::new().set_bold();
    for (col, name) in table.columns().iter().enumerate() {
        sheet.write_string_with_format(0, col_index(col)?, name, &header)?;
    }

    for (idx, record) in table.records().enumerate() {
        let row = u32::try_from(idx + 1).map_err(|_| ReportError::SheetLimit {
            reason: format!("{} rows", table.len()),
        })?;
        for (col, cell) in record.iter().enumerate() {
            write_cell(sheet, row, col_index(col)?, cell)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn col_index(col: usize) -> Result<u16, ReportError> {
    u16::try_from(col).map_err(|_| ReportError::SheetLimit {
        reason: format!("column {col}"),
    })
}

fn fit_cell_text(text: &str, row: u32, col: u16) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            tracing::warn!(
                row,
                col,
                chars = text.chars().count(),
                limit = MAX_CELL_CHARS,
                "text too long for an XLSX cell; truncating"
            );
            &text[..cut]
        }
        None => text,
    }
}

#[allow(clippy::cast_precision_loss)]
fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<(), ReportError> {
    match cell {
        Cell::Null => {}
        Cell::Text(s) => {
            sheet.write_string(row, col, fit_cell_text(s, row, col))?;
        }
        Cell::Float(v) => {
            sheet.write_number(row, col, *v)?;
        }
        Cell::Int(v) => {
            sheet.write_number(row, col, *v as f64)?;
        }
        Cell::Bool(v) => {
            sheet.write_boolean(row, col, *v)?;
        }
    }
    Ok(())
}
