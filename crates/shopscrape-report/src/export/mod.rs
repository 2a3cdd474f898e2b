//! File exports of a [`ResultTable`]: CSV, JSON and XLSX.
//!
//! Every format carries the same rows in the table's own column order.

mod csv_text;
mod json;
mod xlsx;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;
use shopscrape_core::ResultTable;

use crate::error::ReportError;

pub use csv_text::to_csv;
pub use json::to_json;
pub use xlsx::{to_xlsx, MAX_CELL_CHARS, SHEET_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Xlsx];

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(ReportError::UnknownFormat(other.to_owned())),
        }
    }
}

/// `shopify_scrape_{YYYYMMDD_HHMMSS}.{ext}`
#[must_use]
pub fn export_filename(at: NaiveDateTime, format: ExportFormat) -> String {
    format!(
        "shopify_scrape_{}.{}",
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Encodes the table in `format`.
///
/// # Errors
///
/// Returns the encoder's error; see [`to_csv`], [`to_json`] and [`to_xlsx`].
pub fn encode(table: &ResultTable, format: ExportFormat) -> Result<Vec<u8>, ReportError> {
    match format {
        ExportFormat::Csv => to_csv(table),
        ExportFormat::Json => to_json(table).map(String::into_bytes),
        ExportFormat::Xlsx => to_xlsx(table),
    }
}

/// Writes one file per format into `dir`, all sharing the timestamp `at`.
///
/// Returns the written paths in `formats` order. Duplicate formats are
/// written once.
///
/// # Errors
///
/// Returns [`ReportError::WriteFile`] if `dir` cannot be created or a file
/// cannot be written, or an encoder error.
pub fn write_exports(
    table: &ResultTable,
    dir: &Path,
    formats: &[ExportFormat],
    at: NaiveDateTime,
) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::WriteFile {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written: Vec<PathBuf> = Vec::with_capacity(formats.len());
    let mut seen: Vec<ExportFormat> = Vec::with_capacity(formats.len());
    for &format in formats {
        if seen.contains(&format) {
            continue;
        }
        seen.push(format);

        let bytes = encode(table, format)?;
        let path = dir.join(export_filename(at, format));
        std::fs::write(&path, &bytes).map_err(|source| ReportError::WriteFile {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), %format, "export written");
        written.push(path);
    }

    Ok(written)
}
