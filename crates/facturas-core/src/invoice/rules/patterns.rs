//! Regex patterns for the phone-bill invoice layout.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Customer: salutation marker, then the rest of the line up to the tax ID.
    // A lone "Sr." or "Sra." is not a marker.
    pub static ref CUSTOMER: Regex = Regex::new(
        r"(?i)\b(?:Sr\.?[ \t]*/[ \t]*Sra\.?|Se[ñn]or(?:\(es\)|es|a)?)[ \t]*:?[ \t]*([^\n]*?)[ \t]*(?:(?-i:\bR\.?U\.?T\b)|\r?\n|$)"
    ).unwrap();

    // Invoice number: "N° :" followed by digits
    pub static ref NUMBER: Regex = Regex::new(
        r"N[°º][ \t]*:\s*([0-9]+)"
    ).unwrap();

    // Issue date: "Fecha de Emisión: 15 de marzo de 2024"
    pub static ref ISSUE_DATE: Regex = Regex::new(
        r"(?i)Fecha\s+(?:de\s+)?Emisi[oó]n\s*:?\s*([0-9]{1,2})\s+de\s+(\p{L}+)\s+del?\s+([0-9]{4})\b"
    ).unwrap();

    // Total in pesos: "Total Único Cuenta Telefónica $ 12.345"
    pub static ref TOTAL_PESOS: Regex = Regex::new(
        r"(?i)Total\s+[úu]nico\s+Cuenta\s+Telef[óo]nica\s*:?\s*\$\s*([0-9.,]+)"
    ).unwrap();
}
