//! Four-field invoice extractor.

use tracing::debug;

use crate::models::record::InvoiceRecord;

use super::rules::{ExtractionPattern, FieldData};
use super::InvoiceExtractor;

/// Extracts customer, number, issue date, and total from invoice text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneBillExtractor;

impl PhoneBillExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl InvoiceExtractor for PhoneBillExtractor {
    fn extract(&self, raw_text: &str, file_name: &str) -> InvoiceRecord {
        let record = InvoiceRecord {
            source_file_name: file_name.to_string(),
            customer: ExtractionPattern::Customer
                .extract(raw_text)
                .and_then(FieldData::into_text),
            number: ExtractionPattern::Number
                .extract(raw_text)
                .and_then(FieldData::into_text),
            date: ExtractionPattern::Date
                .extract(raw_text)
                .and_then(FieldData::into_date),
            total: ExtractionPattern::Pesos
                .extract(raw_text)
                .and_then(FieldData::into_amount),
        };

        debug!(
            "Extracted {}: customer={}, number={}, date={}, total={}",
            file_name, record.customer, record.number, record.date, record.total
        );

        record
    }
}
