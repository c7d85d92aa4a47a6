//! Total billed amount extraction.

use lazy_static::lazy_static;
use regex::Captures;
use rust_decimal::Decimal;

use super::numbers::parse_locale_number;
use super::patterns::{
    AMOUNT_BEFORE_TOTAL, IMPORTE_TOTAL, TOTAL_A_PAGAR, TOTAL_FACTURA, TOTAL_WITH_CURRENCY,
};
use super::{first_match, ExtractionMatch, PatternRule};

fn amount(caps: &Captures) -> Option<Decimal> {
    parse_locale_number(&caps[1])
}

lazy_static! {
    /// Total-amount rules, most specific first.
    pub static ref TOTAL_RULES: Vec<PatternRule<Decimal>> = vec![
        PatternRule { name: "total_a_pagar", pattern: &*TOTAL_A_PAGAR, extract: amount },
        PatternRule { name: "importe_total", pattern: &*IMPORTE_TOTAL, extract: amount },
        PatternRule { name: "total_factura", pattern: &*TOTAL_FACTURA, extract: amount },
        PatternRule { name: "amount_total", pattern: &*AMOUNT_BEFORE_TOTAL, extract: amount },
        PatternRule { name: "total", pattern: &*TOTAL_WITH_CURRENCY, extract: amount },
    ];
}

/// Find the billed total in whitespace-collapsed text.
///
/// The value is returned as parsed; it may be zero or negative.
pub fn extract_total(text: &str) -> Option<ExtractionMatch<Decimal>> {
    first_match(&TOTAL_RULES, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_a_pagar_wins() {
        let text = "Total energía: 38,20 € Importe total: 61,00 € Total a pagar: 60,00 €";
        let found = extract_total(text).unwrap();
        assert_eq!(found.value, Decimal::new(6000, 2));
        assert_eq!(found.rule, "total_a_pagar");
    }

    #[test]
    fn test_rule_order() {
        let cases = [
            ("Importe total de la factura: 1.045,32 €", "importe_total", Decimal::new(104532, 2)),
            ("TOTAL FACTURA 88,10", "total_factura", Decimal::new(8810, 2)),
            ("72,35 € Total", "amount_total", Decimal::new(7235, 2)),
            ("Total: 55.40 EUR", "total", Decimal::new(5540, 2)),
        ];

        for (text, rule, value) in cases {
            let found = extract_total(text).unwrap();
            assert_eq!(found.rule, rule, "{}", text);
            assert_eq!(found.value, value, "{}", text);
        }
    }

    #[test]
    fn test_no_total() {
        assert!(extract_total("Término de potencia 4,6 kW x 30 días").is_none());
    }
}
