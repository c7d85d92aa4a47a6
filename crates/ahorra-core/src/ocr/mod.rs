//! OCR collaborator interface.
//!
//! Recognition runs on a remote document-analysis service. Failures of any
//! kind surface as "no text recovered", never as errors.

#[cfg(feature = "native")]
mod remote;

#[cfg(feature = "native")]
pub use remote::DocumentAnalysisClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Text recognized from a document image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrText {
    /// Recognized text, lines joined with newlines.
    pub text: String,

    /// Provider-reported recognition confidence (0.0 - 1.0), if any.
    pub confidence: Option<f32>,
}

/// Remote OCR provider.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Recognize the text of a document.
    ///
    /// Returns `None` on any failure: authentication, network, timeout or
    /// an empty result.
    async fn recognize(&self, data: &[u8], mime: &str) -> Option<OcrText>;
}

/// Provider used when OCR is not configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOcr;

#[async_trait]
impl OcrProvider for NoOcr {
    async fn recognize(&self, _data: &[u8], _mime: &str) -> Option<OcrText> {
        None
    }
}

#[async_trait]
impl<T: OcrProvider + ?Sized> OcrProvider for Box<T> {
    async fn recognize(&self, data: &[u8], mime: &str) -> Option<OcrText> {
        (**self).recognize(data, mime).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_ocr_recognizes_nothing() {
        assert_eq!(NoOcr.recognize(b"\x89PNG", "image/png").await, None);
    }

    #[tokio::test]
    async fn test_boxed_provider() {
        let provider: Box<dyn OcrProvider> = Box::new(NoOcr);
        assert!(provider.recognize(b"", "image/jpeg").await.is_none());
    }
}
