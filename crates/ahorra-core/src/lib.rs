//! Core library for Spanish electricity bill analysis.
//!
//! This crate provides:
//! - Text acquisition from bills (embedded PDF text, remote OCR fallback)
//! - Rule-based extraction of supplier, consumption, total and billing period
//! - A tariff cost model for flat-fee and two-band power offers
//! - Best-offer comparison with a prudent-mode policy

pub mod acquisition;
pub mod bill;
pub mod catalog;
pub mod comparison;
pub mod error;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod tariff;

pub use acquisition::{AcquisitionState, TextAcquisition};
pub use bill::rules::{canonicalize_company, format_locale_amount, parse_locale_number};
pub use bill::{extract_fields, BillFieldParser, BillParser};
pub use catalog::{JsonOfferCatalog, OfferCatalog};
pub use comparison::{explain_failure, ComparisonEngine};
pub use error::{AhorraError, Result};
pub use models::comparison::{ComparisonResult, ComparisonStatus, FailureReason, SavingsReport};
pub use models::config::AhorraConfig;
pub use models::extraction::{BillingPeriod, InvoiceExtraction, TextSource};
pub use models::offer::{EnergyOffer, OfferPricing};
pub use ocr::{NoOcr, OcrProvider, OcrText};
pub use pdf::{DocumentKind, EmbeddedText, EmbeddedTextSource, PdfExtractor};
pub use pipeline::{savings_report, SavingsPipeline};
pub use tariff::TariffModel;

#[cfg(feature = "native")]
pub use ocr::DocumentAnalysisClient;
