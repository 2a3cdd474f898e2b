use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XLSX encoding error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write export file {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("table too large for a worksheet: {reason}")]
    SheetLimit { reason: String },

    #[error("unknown export format \"{0}\" (expected csv, json or xlsx)")]
    UnknownFormat(String),
}
