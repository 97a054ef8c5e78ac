//! Data models for consolidated invoice records and pipeline configuration.

pub mod config;
pub mod record;

pub use config::{ExportConfig, FacturasConfig, PdfConfig};
pub use record::{FieldValue, InvoiceRecord, SentinelLabels, COLUMNS};
