//! Rule-based field extractors for phone-bill invoices.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::normalize_amount;
pub use dates::{month_number, normalize_date};

use chrono::NaiveDate;
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::error::ExtractionError;
use crate::models::record::FieldValue;

/// Post-processing applied to a pattern's captured text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    /// Keep the trimmed capture as text.
    Identity,
    /// Day, month name, and year through `normalize_date`.
    NormalizeDate,
    /// Locale-formatted number through `normalize_amount`.
    NormalizeAmount,
}

/// A normalized field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldData {
    Text(String),
    Date(NaiveDate),
    Amount(Decimal),
}

impl FieldData {
    pub fn into_text(self) -> Option<String> {
        match self {
            FieldData::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_date(self) -> Option<NaiveDate> {
        match self {
            FieldData::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn into_amount(self) -> Option<Decimal> {
        match self {
            FieldData::Amount(a) => Some(a),
            _ => None,
        }
    }
}

/// One of the four fixed field rules.
///
/// Each rule matches and normalizes on its own, so a failure in one field
/// never affects another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionPattern {
    Customer,
    Number,
    Date,
    Pesos,
}

impl ExtractionPattern {
    /// All rules, in the order fields are extracted.
    pub const ALL: [ExtractionPattern; 4] = [
        ExtractionPattern::Customer,
        ExtractionPattern::Number,
        ExtractionPattern::Date,
        ExtractionPattern::Pesos,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExtractionPattern::Customer => "CUSTOMER",
            ExtractionPattern::Number => "NUMBER",
            ExtractionPattern::Date => "DATE",
            ExtractionPattern::Pesos => "PESOS",
        }
    }

    pub fn regex(self) -> &'static Regex {
        match self {
            ExtractionPattern::Customer => &*patterns::CUSTOMER,
            ExtractionPattern::Number => &*patterns::NUMBER,
            ExtractionPattern::Date => &*patterns::ISSUE_DATE,
            ExtractionPattern::Pesos => &*patterns::TOTAL_PESOS,
        }
    }

    pub fn post_process(self) -> PostProcess {
        match self {
            ExtractionPattern::Customer | ExtractionPattern::Number => PostProcess::Identity,
            ExtractionPattern::Date => PostProcess::NormalizeDate,
            ExtractionPattern::Pesos => PostProcess::NormalizeAmount,
        }
    }

    /// Match this rule against `text` and normalize the first hit.
    pub fn extract(self, text: &str) -> FieldValue<FieldData> {
        let Some(caps) = self.regex().captures(text) else {
            trace!("{}: no match", self.name());
            return FieldValue::NotFound;
        };

        let value = match self.post_process() {
            PostProcess::Identity => {
                let captured = caps[1].trim();
                if captured.is_empty() {
                    FieldValue::NotFound
                } else {
                    FieldValue::Matched(FieldData::Text(captured.to_string()))
                }
            }
            PostProcess::NormalizeDate => match date_from_captures(&caps) {
                Ok(date) => FieldValue::Matched(FieldData::Date(date)),
                Err(e) => {
                    debug!("{}: {}", self.name(), e);
                    FieldValue::Invalid
                }
            },
            PostProcess::NormalizeAmount => match normalize_amount(&caps[1]) {
                Ok(amount) => FieldValue::Matched(FieldData::Amount(amount)),
                Err(e) => {
                    debug!("{}: {}", self.name(), e);
                    FieldValue::Invalid
                }
            },
        };

        trace!("{}: {:?}", self.name(), value);
        value
    }
}

fn date_from_captures(caps: &Captures<'_>) -> Result<NaiveDate, ExtractionError> {
    let (Ok(day), Ok(year)) = (caps[1].parse::<u32>(), caps[3].parse::<i32>()) else {
        return Err(ExtractionError::InvalidDate {
            day: 0,
            month: caps[2].to_string(),
            year: 0,
        });
    };
    normalize_date(day, &caps[2], year)
}
