//! Invoice field extraction module.

mod extractor;
pub mod rules;

pub use extractor::PhoneBillExtractor;
pub use rules::{ExtractionPattern, FieldData, PostProcess};

use crate::models::record::InvoiceRecord;

/// Trait for invoice field extractors.
pub trait InvoiceExtractor {
    /// Extract a record from a document's text layer.
    ///
    /// Never fails: fields that cannot be read become sentinels.
    fn extract(&self, raw_text: &str, file_name: &str) -> InvoiceRecord;
}
