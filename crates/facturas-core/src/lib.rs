//! Core library for consolidating phone-bill invoices.
//!
//! This crate provides:
//! - Text loading from PDF text layers or plain text
//! - Extraction of customer, invoice number, issue date, and total
//! - Locale-independent date and amount normalization
//! - Batch aggregation into one record per document

pub mod batch;
pub mod error;
pub mod invoice;
pub mod loader;
pub mod models;
pub mod pdf;

pub use batch::{BatchAggregator, BatchSummary, Document, RecordSink};
pub use error::{ExportError, ExtractionError, FacturasError, LoadError, PdfError, Result};
pub use invoice::{ExtractionPattern, InvoiceExtractor, PhoneBillExtractor};
pub use loader::{AutoLoader, PdfTextLoader, PlainTextLoader, TextLoader};
pub use models::config::FacturasConfig;
pub use models::record::{FieldValue, InvoiceRecord, SentinelLabels, COLUMNS};
pub use pdf::PdfTextLayer;
