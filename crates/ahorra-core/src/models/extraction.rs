//! Facts recovered from one energy bill.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured billing facts extracted from a single document.
///
/// Built once per document and handed on unchanged. `consumption_kwh` and
/// `total_factura` are either strictly positive or `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceExtraction {
    /// Canonical supplier name.
    pub company_name: Option<String>,

    /// Energy consumed over the billing period, in kWh.
    pub consumption_kwh: Option<Decimal>,

    /// Billed total, in currency units.
    pub total_factura: Option<Decimal>,

    /// Length of the billing cycle in months (at least 1).
    pub period_months: u32,

    /// Quality of the text the facts came from (0.0 - 1.0).
    pub confidence: f32,

    /// Leading part of the source text, kept for audit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    /// Where the text came from.
    #[serde(default)]
    pub source: TextSource,

    /// Explicit billing dates, when printed on the bill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_period: Option<BillingPeriod>,

    /// Fields that were missing or rejected.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Provenance of the text a bill was read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    /// Text embedded in a digitally generated PDF.
    EmbeddedText,
    /// Text recognized by the OCR provider.
    Ocr,
    /// No document text (failed acquisition or manual entry).
    #[default]
    None,
}

/// Start and end dates of the billed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BillingPeriod {
    /// Number of billed days, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Keep a value only when it is strictly positive.
pub fn positive(value: Decimal) -> Option<Decimal> {
    (value > Decimal::ZERO).then_some(value)
}

/// Cut `text` to at most `limit` characters.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

impl InvoiceExtraction {
    /// Confidence assumed when the field extractor runs on bare text.
    pub const NOMINAL_CONFIDENCE: f32 = 0.9;

    /// Extraction for a document whose text could not be recovered.
    pub fn failed(raw_text: Option<&str>, raw_text_limit: usize) -> Self {
        Self {
            company_name: None,
            consumption_kwh: None,
            total_factura: None,
            period_months: 1,
            confidence: 0.0,
            raw_text: raw_text
                .filter(|t| !t.is_empty())
                .map(|t| truncate_chars(t, raw_text_limit)),
            source: TextSource::None,
            billing_period: None,
            warnings: vec!["No usable text recovered from document".to_string()],
        }
    }

    /// Extraction built from values typed in by a user.
    ///
    /// Non-positive figures are dropped, like extracted ones.
    pub fn manual(
        company_name: Option<&str>,
        consumption_kwh: Decimal,
        total_factura: Decimal,
        period_months: u32,
    ) -> Self {
        Self {
            company_name: company_name.and_then(crate::bill::rules::canonicalize_company),
            consumption_kwh: positive(consumption_kwh),
            total_factura: positive(total_factura),
            period_months: period_months.max(1),
            confidence: 1.0,
            raw_text: None,
            source: TextSource::None,
            billing_period: None,
            warnings: Vec::new(),
        }
    }

    /// Replace the confidence, clamped to `[0, 1]`.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Tag the text provenance.
    pub fn with_source(mut self, source: TextSource) -> Self {
        self.source = source;
        self
    }

    /// Whether both figures needed for a comparison are present.
    pub fn has_billing_figures(&self) -> bool {
        self.consumption_kwh.is_some() && self.total_factura.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_extraction() {
        let extraction = InvoiceExtraction::failed(Some("short"), 2000);
        assert_eq!(extraction.consumption_kwh, None);
        assert_eq!(extraction.total_factura, None);
        assert_eq!(extraction.company_name, None);
        assert_eq!(extraction.confidence, 0.0);
        assert_eq!(extraction.period_months, 1);
        assert_eq!(extraction.raw_text.as_deref(), Some("short"));
        assert!(!extraction.has_billing_figures());
    }

    #[test]
    fn test_failed_extraction_truncates_raw_text() {
        let text = "ñ".repeat(50);
        let extraction = InvoiceExtraction::failed(Some(&text), 10);
        assert_eq!(extraction.raw_text.unwrap().chars().count(), 10);

        assert_eq!(InvoiceExtraction::failed(Some(""), 10).raw_text, None);
    }

    #[test]
    fn test_manual_rejects_non_positive() {
        let extraction =
            InvoiceExtraction::manual(Some(" Gas Natural Fenosa "), Decimal::ZERO, Decimal::from(-5), 0);
        assert_eq!(extraction.company_name.as_deref(), Some("Naturgy"));
        assert_eq!(extraction.consumption_kwh, None);
        assert_eq!(extraction.total_factura, None);
        assert_eq!(extraction.period_months, 1);
    }

    #[test]
    fn test_with_confidence_clamps() {
        let extraction = InvoiceExtraction::failed(None, 10).with_confidence(1.7);
        assert_eq!(extraction.confidence, 1.0);
    }

    #[test]
    fn test_billing_period_days() {
        let period = BillingPeriod {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        };
        assert_eq!(period.days(), 60);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 3), "ab");
    }
}
