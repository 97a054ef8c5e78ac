//! Text loaders turning document bytes into a plain-text layer.

use tracing::{debug, trace};

use crate::error::LoadError;
use crate::models::config::PdfConfig;
use crate::pdf::PdfTextLayer;

/// Magic header of every PDF file.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Produces the text content of a document.
pub trait TextLoader {
    fn load_text(&self, bytes: &[u8]) -> Result<String, LoadError>;
}

/// Loads the embedded text layer of a PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfTextLoader {
    config: PdfConfig,
}

impl PdfTextLoader {
    pub fn new(config: PdfConfig) -> Self {
        Self { config }
    }
}

impl TextLoader for PdfTextLoader {
    fn load_text(&self, bytes: &[u8]) -> Result<String, LoadError> {
        let layer = PdfTextLayer::parse(bytes)?;

        let text = if self.config.first_page_only {
            layer.page_text(1)?
        } else {
            layer.text()?
        };

        trace!("PDF text layer: {} chars", text.len());
        require_text(text, self.config.min_text_length)
    }
}

/// Loads a document that already is UTF-8 text.
#[derive(Debug, Clone, Default)]
pub struct PlainTextLoader {
    min_text_length: usize,
}

impl PlainTextLoader {
    pub fn new(min_text_length: usize) -> Self {
        Self { min_text_length }
    }
}

impl TextLoader for PlainTextLoader {
    fn load_text(&self, bytes: &[u8]) -> Result<String, LoadError> {
        let text = std::str::from_utf8(bytes).map_err(|_| LoadError::NotUtf8)?;
        require_text(text.to_string(), self.min_text_length)
    }
}

/// Picks the PDF or plain-text loader from the document's header.
#[derive(Debug, Clone, Default)]
pub struct AutoLoader {
    pdf: PdfTextLoader,
    plain: PlainTextLoader,
}

impl AutoLoader {
    pub fn new(config: &PdfConfig) -> Self {
        Self {
            pdf: PdfTextLoader::new(config.clone()),
            plain: PlainTextLoader::new(config.min_text_length),
        }
    }
}

impl TextLoader for AutoLoader {
    fn load_text(&self, bytes: &[u8]) -> Result<String, LoadError> {
        if is_pdf(bytes) {
            debug!("Loading {} bytes as PDF", bytes.len());
            self.pdf.load_text(bytes)
        } else {
            debug!("Loading {} bytes as plain text", bytes.len());
            self.plain.load_text(bytes)
        }
    }
}

/// Whether the bytes start with a PDF header, ignoring a leading BOM or whitespace.
pub fn is_pdf(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace() && !matches!(*b, 0xEF | 0xBB | 0xBF))
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(PDF_MAGIC)
}

fn require_text(text: String, min_len: usize) -> Result<String, LoadError> {
    let visible = text.chars().filter(|c| !c.is_whitespace()).count();
    if visible < min_len.max(1) {
        return Err(LoadError::NoText);
    }
    Ok(text)
}
