//! PDF processing module.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text embedded in a document, as recovered without OCR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedText {
    /// Extracted text, pages joined in order.
    pub text: String,
    /// Number of pages in the document.
    pub page_count: u32,
}

/// Source of embedded document text.
///
/// Implementations never fail: unreadable or text-less documents yield
/// `None`.
pub trait EmbeddedTextSource: Send + Sync {
    /// Extract the embedded text of a document.
    fn embedded_text(&self, data: &[u8]) -> Option<EmbeddedText>;
}

/// Document type recognized from its leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image(image::ImageFormat),
}

impl DocumentKind {
    /// Identify a document by its magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"%PDF") {
            return Some(Self::Pdf);
        }
        image::guess_format(data).ok().map(Self::Image)
    }

    /// MIME type for this kind of document.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Image(format) => format.to_mime_type(),
        }
    }

    /// Whether a MIME type names a PDF document.
    pub fn is_pdf_mime(mime: &str) -> bool {
        mime.trim().eq_ignore_ascii_case("application/pdf")
    }
}
