//! Error types for the ahorra-core library.
//!
//! Only the edges of the system raise errors (files, remote calls, config).
//! Unreadable bills and missing comparisons are ordinary values.

use thiserror::Error;

/// Main error type for the ahorra library.
#[derive(Error, Debug)]
pub enum AhorraError {
    /// Offer catalog error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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
}

/// Errors raised inside the remote OCR client.
///
/// These never cross the [`crate::ocr::OcrProvider`] boundary; the client
/// logs them and reports "no text recovered" instead.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The client is missing an endpoint or key.
    #[error("OCR not configured: {0}")]
    NotConfigured(String),

    /// Transport-level failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The analysis finished in a failed state.
    #[error("analysis failed: {0}")]
    AnalysisFailed(String),

    /// The response could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The poll budget ran out before the analysis finished.
    #[error("analysis did not finish after {0} polls")]
    PollBudgetExhausted(u32),
}

/// Errors related to loading offer catalogs.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The catalog contents are not a valid offer list.
    #[error("invalid catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for the ahorra library.
pub type Result<T> = std::result::Result<T, AhorraError>;
