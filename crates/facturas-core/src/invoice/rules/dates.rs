//! Issue date normalization for Spanish long-form dates.
//!
//! Month names are resolved through a bundled table, never through the host
//! locale, so "15 de marzo de 2024" reads the same on every machine.

use chrono::NaiveDate;

use crate::error::ExtractionError;

/// Spanish month names, indexed by month number minus one.
const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Convert a day, Spanish month name, and year into a calendar date.
pub fn normalize_date(day: u32, month_name: &str, year: i32) -> Result<NaiveDate, ExtractionError> {
    let invalid = || ExtractionError::InvalidDate {
        day,
        month: month_name.to_string(),
        year,
    };

    let month = month_number(month_name).ok_or_else(invalid)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Resolve a Spanish month name to 1-12, ignoring case and accents.
pub fn month_number(name: &str) -> Option<u32> {
    let folded = fold(name.trim());

    // "setiembre" is the accepted variant spelling in Chile and Peru
    if folded == "setiembre" {
        return Some(9);
    }

    MONTHS
        .iter()
        .position(|m| *m == folded)
        .map(|i| i as u32 + 1)
}

/// Lowercase and strip Spanish diacritics.
pub(crate) fn fold(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}
