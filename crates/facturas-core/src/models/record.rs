//! Consolidated invoice record, one per processed document.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Label used for a field whose rule found no candidate text.
pub const NOT_FOUND_LABEL: &str = "not found";

/// Label used for a field whose candidate text could not be interpreted.
pub const ERROR_LABEL: &str = "error";

/// Column headers of the consolidated table, in export order.
pub const COLUMNS: [&str; 5] = ["FILE NAME", "CUSTOMER", "NUMBER", "DATE", "TOTAL"];

/// Outcome of extracting a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<T> {
    /// The rule matched and the value was normalized.
    Matched(T),
    /// The rule found no candidate text.
    NotFound,
    /// The rule matched but post-processing rejected the text.
    Invalid,
}

impl<T> FieldValue<T> {
    pub fn is_matched(&self) -> bool {
        matches!(self, FieldValue::Matched(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            FieldValue::Matched(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldValue<U> {
        match self {
            FieldValue::Matched(v) => FieldValue::Matched(f(v)),
            FieldValue::NotFound => FieldValue::NotFound,
            FieldValue::Invalid => FieldValue::Invalid,
        }
    }

    /// Narrow a matched value, turning a rejected value into `Invalid`.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Option<U>) -> FieldValue<U> {
        match self {
            FieldValue::Matched(v) => f(v).map_or(FieldValue::Invalid, FieldValue::Matched),
            FieldValue::NotFound => FieldValue::NotFound,
            FieldValue::Invalid => FieldValue::Invalid,
        }
    }

    /// Render with caller-provided sentinel labels.
    pub fn render_with(&self, labels: &SentinelLabels, f: impl FnOnce(&T) -> String) -> String {
        match self {
            FieldValue::Matched(v) => f(v),
            FieldValue::NotFound => labels.not_found.clone(),
            FieldValue::Invalid => labels.error.clone(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for FieldValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Matched(v) => v.fmt(f),
            FieldValue::NotFound => f.write_str(NOT_FOUND_LABEL),
            FieldValue::Invalid => f.write_str(ERROR_LABEL),
        }
    }
}

impl<T: Serialize> Serialize for FieldValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Matched(v) => v.serialize(serializer),
            FieldValue::NotFound => serializer.serialize_str(NOT_FOUND_LABEL),
            FieldValue::Invalid => serializer.serialize_str(ERROR_LABEL),
        }
    }
}

/// Text written in place of a missing or rejected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelLabels {
    pub not_found: String,
    pub error: String,
}

impl Default for SentinelLabels {
    fn default() -> Self {
        Self {
            not_found: NOT_FOUND_LABEL.to_string(),
            error: ERROR_LABEL.to_string(),
        }
    }
}

/// The four fields extracted from one invoice document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceRecord {
    /// Name of the uploaded file this record came from.
    pub source_file_name: String,

    /// Customer name following the salutation marker.
    pub customer: FieldValue<String>,

    /// Invoice number.
    pub number: FieldValue<String>,

    /// Issue date.
    pub date: FieldValue<NaiveDate>,

    /// Total amount in pesos.
    pub total: FieldValue<Decimal>,
}

impl InvoiceRecord {
    /// Record for a document whose text could not be loaded.
    pub fn unreadable(file_name: impl Into<String>) -> Self {
        Self {
            source_file_name: file_name.into(),
            customer: FieldValue::Invalid,
            number: FieldValue::Invalid,
            date: FieldValue::Invalid,
            total: FieldValue::Invalid,
        }
    }

    /// Whether every field carries a value.
    pub fn is_complete(&self) -> bool {
        self.customer.is_matched()
            && self.number.is_matched()
            && self.date.is_matched()
            && self.total.is_matched()
    }

    /// Whether this is the record of an unreadable document.
    ///
    /// Customer and number have no post-processing, so they can only be
    /// `Invalid` when the document had no text.
    pub fn is_unreadable(&self) -> bool {
        self.customer == FieldValue::Invalid && self.number == FieldValue::Invalid
    }

    /// Row cells in `COLUMNS` order, dates in ISO format.
    pub fn cells(&self, labels: &SentinelLabels) -> [String; 5] {
        [
            self.source_file_name.clone(),
            self.customer.render_with(labels, Clone::clone),
            self.number.render_with(labels, Clone::clone),
            self.date.render_with(labels, |d| d.format("%Y-%m-%d").to_string()),
            self.total.render_with(labels, Decimal::to_string),
        ]
    }
}
