//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{EmbeddedText, EmbeddedTextSource, Result};
use crate::error::PdfError;

/// Embedded-text extractor for digitally generated PDFs.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

/// A parsed PDF ready for text extraction.
struct LoadedPdf {
    /// Bytes handed to pdf-extract (decrypted when needed).
    raw_data: Vec<u8>,
    page_count: u32,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract the embedded text of a PDF.
    pub fn extract(&self, data: &[u8]) -> Result<EmbeddedText> {
        let pdf = Self::load(data)?;
        let text = pdf_extract::extract_text_from_mem(&pdf.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        debug!("Extracted {} chars of embedded text from {} pages", text.len(), pdf.page_count);
        Ok(EmbeddedText {
            text,
            page_count: pdf.page_count,
        })
    }

    fn load(data: &[u8]) -> Result<LoadedPdf> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Bills are often "encrypted" with an empty user password
        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len() as u32;
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        Ok(LoadedPdf { raw_data, page_count })
    }
}

impl EmbeddedTextSource for PdfExtractor {
    fn embedded_text(&self, data: &[u8]) -> Option<EmbeddedText> {
        match self.extract(data) {
            Ok(embedded) if !embedded.text.trim().is_empty() => Some(embedded),
            Ok(_) => {
                debug!("PDF has no embedded text");
                None
            }
            Err(e) => {
                warn!("Embedded text extraction failed: {}", e);
                None
            }
        }
    }
}
