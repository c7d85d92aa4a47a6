//! Energy consumption (kWh) extraction.

use lazy_static::lazy_static;
use regex::Captures;
use rust_decimal::Decimal;

use super::numbers::parse_locale_number;
use super::patterns::{
    CONSUMPTION_BARE, CONSUMPTION_ENERGY, CONSUMPTION_LABELED, CONSUMPTION_PERIOD,
    CONSUMPTION_TOTAL,
};
use super::{first_match, ExtractionMatch, PatternRule};

fn number(caps: &Captures) -> Option<Decimal> {
    parse_locale_number(&caps[1])
}

lazy_static! {
    /// Consumption rules, most specific first.
    pub static ref CONSUMPTION_RULES: Vec<PatternRule<Decimal>> = vec![
        PatternRule { name: "consumo_total", pattern: &*CONSUMPTION_TOTAL, extract: number },
        PatternRule { name: "consumo_periodo", pattern: &*CONSUMPTION_PERIOD, extract: number },
        PatternRule { name: "energia_consumida", pattern: &*CONSUMPTION_ENERGY, extract: number },
        PatternRule { name: "consumo", pattern: &*CONSUMPTION_LABELED, extract: number },
        PatternRule { name: "kwh", pattern: &*CONSUMPTION_BARE, extract: number },
    ];
}

/// Find the billed consumption in whitespace-collapsed text.
///
/// The value is returned as parsed; it may be zero or negative.
pub fn extract_consumption(text: &str) -> Option<ExtractionMatch<Decimal>> {
    first_match(&CONSUMPTION_RULES, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_label_beats_earlier_bare_figure() {
        let text = "Consumo año anterior 3.100 kWh. Consumo total: 250 kWh";
        let found = extract_consumption(text).unwrap();
        assert_eq!(found.value, Decimal::from(250));
        assert_eq!(found.rule, "consumo_total");
    }

    #[test]
    fn test_rule_order() {
        let cases = [
            ("Consumo total facturado: 312 kWh", "consumo_total", Decimal::from(312)),
            ("Consumo del período: 198,5 kWh", "consumo_periodo", Decimal::new(1985, 1)),
            ("Energía consumida 401 kWh", "energia_consumida", Decimal::from(401)),
            ("Consumo: 77 kWh", "consumo", Decimal::from(77)),
            ("Punta 120 kWh Llano 80 kWh", "kwh", Decimal::from(120)),
        ];

        for (text, rule, value) in cases {
            let found = extract_consumption(text).unwrap();
            assert_eq!(found.rule, rule, "{}", text);
            assert_eq!(found.value, value, "{}", text);
        }
    }

    #[test]
    fn test_zero_is_returned_as_parsed() {
        let found = extract_consumption("Consumo total: 0 kWh").unwrap();
        assert_eq!(found.value, Decimal::ZERO);
    }

    #[test]
    fn test_no_consumption() {
        assert!(extract_consumption("Precio 0,15 €/kWh").is_none());
    }
}
