pub mod error;
pub mod export;
pub mod insights;

pub use error::ReportError;
pub use export::{encode, export_filename, write_exports, ExportFormat};
pub use insights::{compute_insights, HistogramBin, Insights, VendorCount, HISTOGRAM_BINS, TOP_VENDORS};
