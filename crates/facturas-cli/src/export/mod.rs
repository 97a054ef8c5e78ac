//! Tabular exporters for the consolidated record set.

mod csv_file;
mod xlsx;

pub use csv_file::CsvExporter;
pub use xlsx::XlsxExporter;

use std::path::Path;

use chrono::NaiveDateTime;

use facturas_core::models::config::ExportConfig;
use facturas_core::RecordSink;

/// Spreadsheet file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SpreadsheetFormat {
    /// Excel workbook
    Xlsx,
    /// Comma-separated values
    Csv,
}

impl SpreadsheetFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SpreadsheetFormat::Xlsx => "xlsx",
            SpreadsheetFormat::Csv => "csv",
        }
    }

    /// Create the sink writing this format to `path`.
    pub fn sink(self, path: &Path, config: &ExportConfig) -> Box<dyn RecordSink> {
        match self {
            SpreadsheetFormat::Xlsx => Box::new(XlsxExporter::new(path, config.clone())),
            SpreadsheetFormat::Csv => Box::new(CsvExporter::new(path, config.labels())),
        }
    }
}

/// `<prefix>_<YYYYMMDD>_<HHMMSS>.<extension>`
pub fn timestamped_file_name(prefix: &str, now: NaiveDateTime, extension: &str) -> String {
    format!("{}_{}.{}", prefix, now.format("%Y%m%d_%H%M%S"), extension)
}
