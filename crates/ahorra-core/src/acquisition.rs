//! Text acquisition: embedded PDF text first, remote OCR as fallback.
//!
//! The flow is a single linear pass through [`AcquisitionState`]; nothing
//! here retries.

use tracing::{debug, info};

use crate::bill::{BillFieldParser, BillParser};
use crate::models::config::AcquisitionConfig;
use crate::models::extraction::{InvoiceExtraction, TextSource};
use crate::ocr::OcrProvider;
use crate::pdf::{DocumentKind, EmbeddedTextSource};

/// Stages of one acquisition pass.
#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionState {
    /// Nothing attempted yet.
    Start,
    /// Embedded text is missing or too short; OCR is next.
    NeedsOcr {
        /// Embedded text recovered so far, kept for diagnostics.
        partial_text: Option<String>,
    },
    /// Text recovered with a provenance-based confidence.
    Extracted {
        text: String,
        confidence: f32,
        source: TextSource,
    },
    /// No usable text.
    Failed { text: Option<String> },
}

/// Text acquisition stage.
pub struct TextAcquisition<P, O> {
    pdf: P,
    ocr: O,
    parser: BillFieldParser,
    config: AcquisitionConfig,
}

impl<P: EmbeddedTextSource, O: OcrProvider> TextAcquisition<P, O> {
    /// Create an acquisition stage with default thresholds.
    pub fn new(pdf: P, ocr: O) -> Self {
        Self::with_config(pdf, ocr, AcquisitionConfig::default())
    }

    /// Create an acquisition stage with explicit thresholds.
    pub fn with_config(pdf: P, ocr: O, config: AcquisitionConfig) -> Self {
        let parser = BillFieldParser::new().with_raw_text_limit(config.raw_text_limit);
        Self {
            pdf,
            ocr,
            parser,
            config,
        }
    }

    /// Acquisition thresholds in use.
    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    /// Recover text from a document and extract its bill fields.
    ///
    /// Never fails: unrecoverable documents produce a failed extraction
    /// with empty figures and zero confidence.
    pub async fn acquire(&self, data: &[u8], mime: &str) -> InvoiceExtraction {
        let mut state = AcquisitionState::Start;

        loop {
            debug!("Acquisition state: {}", state.name());
            state = match state {
                AcquisitionState::Start => self.start(data, mime),
                AcquisitionState::NeedsOcr { partial_text } => {
                    self.run_ocr(data, mime, partial_text).await
                }
                AcquisitionState::Extracted {
                    text,
                    confidence,
                    source,
                } => {
                    if text.trim().chars().count() < self.config.min_text_len {
                        info!("Recovered text too short for extraction");
                        AcquisitionState::Failed { text: Some(text) }
                    } else {
                        info!("Extracting fields from {:?} text", source);
                        return self
                            .parser
                            .parse(&text)
                            .with_confidence(confidence)
                            .with_source(source);
                    }
                }
                AcquisitionState::Failed { text } => {
                    info!("Text acquisition failed");
                    return InvoiceExtraction::failed(text.as_deref(), self.config.raw_text_limit);
                }
            };
        }
    }

    fn start(&self, data: &[u8], mime: &str) -> AcquisitionState {
        let is_pdf = if mime.trim().is_empty() {
            DocumentKind::sniff(data) == Some(DocumentKind::Pdf)
        } else {
            DocumentKind::is_pdf_mime(mime)
        };

        if !is_pdf {
            return AcquisitionState::NeedsOcr { partial_text: None };
        }

        match self.pdf.embedded_text(data) {
            Some(embedded)
                if embedded.text.trim().chars().count() >= self.config.min_embedded_text_len =>
            {
                debug!("Using embedded text from {} pages", embedded.page_count);
                AcquisitionState::Extracted {
                    text: embedded.text,
                    confidence: self.config.embedded_text_confidence,
                    source: TextSource::EmbeddedText,
                }
            }
            Some(embedded) => AcquisitionState::NeedsOcr {
                partial_text: Some(embedded.text),
            },
            None => AcquisitionState::NeedsOcr { partial_text: None },
        }
    }

    async fn run_ocr(
        &self,
        data: &[u8],
        mime: &str,
        partial_text: Option<String>,
    ) -> AcquisitionState {
        match self.ocr.recognize(data, mime).await {
            Some(ocr) if !ocr.text.trim().is_empty() => AcquisitionState::Extracted {
                text: ocr.text,
                confidence: ocr.confidence.unwrap_or(self.config.default_ocr_confidence),
                source: TextSource::Ocr,
            },
            _ => AcquisitionState::Failed { text: partial_text },
        }
    }
}

impl AcquisitionState {
    fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::NeedsOcr { .. } => "needs_ocr",
            Self::Extracted { .. } => "extracted",
            Self::Failed { .. } => "failed",
        }
    }
}
