//! Rule-based field extractor for energy bills.

use tracing::{debug, info};

use crate::models::extraction::{positive, truncate_chars, InvoiceExtraction, TextSource};

use super::rules::{
    collapse_whitespace, extract_billing_period, extract_consumption, extract_period_months,
    extract_supplier, extract_total,
};
use super::BillParser;

/// Default cap on retained raw text.
pub const DEFAULT_RAW_TEXT_LIMIT: usize = 2000;

/// Field extractor applying the ordered rule tables.
#[derive(Debug, Clone)]
pub struct BillFieldParser {
    /// Maximum characters of raw text kept on the extraction.
    raw_text_limit: usize,
}

impl BillFieldParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            raw_text_limit: DEFAULT_RAW_TEXT_LIMIT,
        }
    }

    /// Set the raw text cap.
    pub fn with_raw_text_limit(mut self, limit: usize) -> Self {
        self.raw_text_limit = limit;
        self
    }
}

impl Default for BillFieldParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BillParser for BillFieldParser {
    fn parse(&self, raw_text: &str) -> InvoiceExtraction {
        let text = collapse_whitespace(raw_text);
        let mut warnings = Vec::new();

        info!("Parsing bill from {} characters of text", text.len());

        let company_name = match extract_supplier(&text) {
            Some(found) => {
                debug!("Supplier {:?} via rule {}", found.value, found.rule);
                Some(found.value)
            }
            None => {
                warnings.push("Could not extract supplier".to_string());
                None
            }
        };

        let consumption_kwh = match extract_consumption(&text) {
            Some(found) => {
                debug!("Consumption {} kWh via rule {}", found.value, found.rule);
                let value = positive(found.value);
                if value.is_none() {
                    warnings.push(format!("Ignored non-positive consumption {:?}", found.source));
                }
                value
            }
            None => {
                warnings.push("Could not extract consumption".to_string());
                None
            }
        };

        let total_factura = match extract_total(&text) {
            Some(found) => {
                debug!("Total {} via rule {}", found.value, found.rule);
                let value = positive(found.value);
                if value.is_none() {
                    warnings.push(format!("Ignored non-positive total {:?}", found.source));
                }
                value
            }
            None => {
                warnings.push("Could not extract total amount".to_string());
                None
            }
        };

        let period_months = extract_period_months(&text);
        let billing_period = extract_billing_period(&text);

        debug!(
            "Extracted company={:?} consumption={:?} total={:?} period_months={}",
            company_name, consumption_kwh, total_factura, period_months
        );

        InvoiceExtraction {
            company_name,
            consumption_kwh,
            total_factura,
            period_months,
            confidence: InvoiceExtraction::NOMINAL_CONFIDENCE,
            raw_text: (!raw_text.is_empty()).then(|| truncate_chars(raw_text, self.raw_text_limit)),
            source: TextSource::None,
            billing_period,
            warnings,
        }
    }
}

/// Extract bill fields from text with the default parser.
pub fn extract_fields(raw_text: &str) -> InvoiceExtraction {
    BillFieldParser::new().parse(raw_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_basic_bill() {
        let text = r#"
            IBERDROLA CLIENTES, S.A.U.
            Factura de electricidad
            Periodo de facturación: 01/03/2024 a 31/03/2024

            Consumo total: 250 kWh
            Término de potencia: 4,6 kW x 31 días

            Total a pagar: 60,00 €
        "#;

        let extraction = extract_fields(text);

        assert_eq!(extraction.company_name.as_deref(), Some("Iberdrola"));
        assert_eq!(extraction.consumption_kwh, Some(Decimal::from(250)));
        assert_eq!(extraction.total_factura, Some(Decimal::new(6000, 2)));
        assert_eq!(extraction.period_months, 1);
        assert_eq!(extraction.confidence, InvoiceExtraction::NOMINAL_CONFIDENCE);
        assert_eq!(extraction.billing_period.unwrap().days(), 31);
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_line_wrapped_labels() {
        let text = "Consumo\ntotal:\n 1.250,5\nkWh\nTotal a\npagar: 210,40 €";
        let extraction = extract_fields(text);
        assert_eq!(extraction.consumption_kwh, Some(Decimal::new(12505, 1)));
        assert_eq!(extraction.total_factura, Some(Decimal::new(21040, 2)));
    }

    #[test]
    fn test_non_positive_values_are_not_found() {
        let text = "Consumo total: 0 kWh Total a pagar: 0,00 €";
        let extraction = extract_fields(text);
        assert_eq!(extraction.consumption_kwh, None);
        assert_eq!(extraction.total_factura, None);
        assert_eq!(extraction.warnings.len(), 3);
    }

    #[test]
    fn test_empty_text() {
        let extraction = extract_fields("");
        assert_eq!(extraction.company_name, None);
        assert_eq!(extraction.raw_text, None);
        assert_eq!(extraction.period_months, 1);
    }

    #[test]
    fn test_raw_text_limit() {
        let text = format!("Consumo total: 250 kWh {}", "x".repeat(100));
        let extraction = BillFieldParser::new().with_raw_text_limit(10).parse(&text);
        assert_eq!(extraction.raw_text.as_deref(), Some("Consumo to"));
        assert_eq!(extraction.consumption_kwh, Some(Decimal::from(250)));
    }
}
