//! Error types for the facturas-core library.

use thiserror::Error;

/// Main error type for the facturas library.
#[derive(Error, Debug)]
pub enum FacturasError {
    /// Tabular export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be read or written as JSON.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Reasons a document yields no text layer at all.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The PDF could not be read.
    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// The document bytes could not be obtained.
    #[error("cannot read document: {0}")]
    Read(String),

    /// The document is neither a PDF nor UTF-8 text.
    #[error("document is not valid UTF-8 text")]
    NotUtf8,

    /// The document was read but carries no text (e.g. an image-only scan).
    #[error("document has no extractable text")]
    NoText,
}

/// Errors raised while normalizing a matched field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Day, month name, and year do not form a calendar date.
    #[error("invalid date: {day} de {month} de {year}")]
    InvalidDate { day: u32, month: String, year: i32 },

    /// The numeric text could not be read as an amount.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
}

/// Errors raised by a tabular sink.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing to export.
    #[error("no documents have been processed")]
    NoRecords,

    /// The underlying writer failed.
    #[error("failed to write output: {0}")]
    Write(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the facturas library.
pub type Result<T> = std::result::Result<T, FacturasError>;
