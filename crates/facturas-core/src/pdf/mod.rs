//! Embedded text layer of PDF invoices.
//!
//! Phone bills are generated documents, so the text layer is all there is to
//! read. Scanned bills without one surface as an empty layer.

use lopdf::Document;
use tracing::debug;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A parsed PDF whose text can be read whole or page by page.
pub struct PdfTextLayer {
    document: Document,
    /// Bytes handed to pdf-extract; the decrypted copy for protected files.
    bytes: Vec<u8>,
}

impl PdfTextLayer {
    /// Parse a PDF, unlocking files protected with an empty user password.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let bytes = if document.is_encrypted() {
            document.decrypt("").map_err(|_| PdfError::Encrypted)?;
            debug!("Unlocked PDF with empty password");

            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("cannot re-save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        if document.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        debug!("PDF has {} pages", document.get_pages().len());
        Ok(Self { document, bytes })
    }

    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Text of every page, in reading order.
    pub fn text(&self) -> Result<String> {
        // pdf-extract panics on some malformed font tables
        std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&self.bytes))
            .map_err(|_| PdfError::TextExtraction("pdf-extract panicked".to_string()))?
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    /// Text of one page, numbered from 1.
    pub fn page_text(&self, page: u32) -> Result<String> {
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }

        self.document
            .extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}
