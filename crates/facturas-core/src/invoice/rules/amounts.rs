//! Amount normalization for Chilean peso totals.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ExtractionError;

/// Parse a peso amount written as "1.234.567" or "1.234,56".
///
/// `.` groups thousands and `,` marks decimals. More than one `,`, no
/// digits at all, or any other character is rejected.
pub fn normalize_amount(text: &str) -> Result<Decimal, ExtractionError> {
    let invalid = || ExtractionError::InvalidAmount(text.to_string());
    let raw = text.trim();

    if !raw.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if !raw.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return Err(invalid());
    }

    let mut parts = raw.split(',');
    let integer: String = parts
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| *c != '.')
        .collect();
    let fraction = parts.next();
    if parts.next().is_some() {
        return Err(invalid());
    }

    // Thousands separators after the decimal comma make no sense
    if fraction.is_some_and(|f| f.contains('.')) {
        return Err(invalid());
    }

    let integer = if integer.is_empty() { "0".to_string() } else { integer };
    let canonical = match fraction {
        Some(f) if !f.is_empty() => format!("{}.{}", integer, f),
        _ => integer,
    };

    Decimal::from_str(&canonical).map_err(|_| invalid())
}
