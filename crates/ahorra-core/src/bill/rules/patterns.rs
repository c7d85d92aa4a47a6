//! Common regex patterns for Spanish electricity bills.
//!
//! Patterns run against text whose whitespace has already been collapsed
//! to single spaces, so none of them rely on line breaks.

use lazy_static::lazy_static;
use regex::Regex;

/// A number in European or US notation, with optional grouping.
///
/// Dots, commas and non-breaking spaces group thousands anywhere. A plain
/// space groups only when a comma decimal follows ("1 234,56"), so figures
/// from adjacent lines are never joined.
const NUM: &str = r"\b(\d{1,3}(?:[.,\x{A0}\x{202F}]\d{3})+(?:[.,]\d{1,2})?|\d{1,3}(?: \d{3})+,\d{1,2}|\d+(?:[.,]\d+)?)";

/// Up to six words following a label; trimmed later by the supplier rules.
const WORDS: &str = r"([^\s:]+(?:\s[^\s:]+){0,5})";

/// Currency marker after an amount.
const CURRENCY: &str = r"(?:€|eur(?:os)?\b)";

/// Known suppliers as (pattern, display name), longest alias first.
pub const KNOWN_SUPPLIERS: &[(&str, &str)] = &[
    (r"gas\s+natural\s+fenosa", "Naturgy"),
    (r"gas\s+natural", "Naturgy"),
    (r"naturgy", "Naturgy"),
    (r"iberdrola", "Iberdrola"),
    (r"endesa", "Endesa"),
    (r"repsol", "Repsol"),
    (r"total\s*energies", "TotalEnergies"),
    (r"octopus\s+energy", "Octopus Energy"),
    (r"factor\s+energ[ií]a", "Factor Energía"),
    (r"audax(?:\s+renovables)?", "Audax Renovables"),
    (r"fenie\s+energ[ií]a", "Fenie Energía"),
    (r"som\s+energia", "Som Energia"),
    (r"energ[ií]a\s+xxi", "Energía XXI"),
    (r"curenerg[ií]a", "Curenergía"),
    (r"holaluz", "Holaluz"),
    (r"lucera", "Lucera"),
    (r"viesgo", "Viesgo"),
    (r"aldro", "Aldro"),
    (r"podo", "Podo"),
    (r"edp", "EDP"),
];

fn build(pattern: &str) -> Regex {
    let pattern = pattern
        .replace("{NUM}", NUM)
        .replace("{WORDS}", WORDS)
        .replace("{CURRENCY}", CURRENCY);
    Regex::new(&pattern).unwrap()
}

lazy_static! {
    // Supplier vocabulary: one capture group per known supplier
    pub static ref SUPPLIER_VOCABULARY: Regex = Regex::new(&format!(
        r"(?i)\b(?:{})\b",
        KNOWN_SUPPLIERS
            .iter()
            .map(|(pattern, _)| format!("({})", pattern))
            .collect::<Vec<_>>()
            .join("|")
    ))
    .unwrap();

    // Labeled supplier patterns
    pub static ref SUPPLIER_COMERCIALIZADORA: Regex = build(
        r"(?i)\b(?:empresa\s+)?comercializador[a]?\s*:\s*{WORDS}"
    );

    pub static ref SUPPLIER_EMPRESA: Regex = build(
        r"(?i)\bempresa\s*:\s*{WORDS}"
    );

    pub static ref SUPPLIER_SUMINISTRADORA: Regex = build(
        r"(?i)\bsuministrador[a]?\s*:\s*{WORDS}"
    );

    // Document title: "Factura de luz - X"
    pub static ref SUPPLIER_TITLE: Regex = build(
        r"(?i)\bfactura\s+de\s+(?:luz|electricidad)\s*[-–—:]\s*{WORDS}"
    );

    // Consumption, most specific first
    pub static ref CONSUMPTION_TOTAL: Regex = build(
        r"(?i)\bconsumo\s+total(?:\s+facturado)?\s*:?\s*{NUM}\s*kwh\b"
    );

    pub static ref CONSUMPTION_PERIOD: Regex = build(
        r"(?i)\bconsumo\s+(?:del\s+per[ií]odo|en\s+el\s+per[ií]odo|facturado)\s*:?\s*{NUM}\s*kwh\b"
    );

    pub static ref CONSUMPTION_ENERGY: Regex = build(
        r"(?i)\benerg[ií]a\s+(?:consumida|activa)\s*:?\s*{NUM}\s*kwh\b"
    );

    pub static ref CONSUMPTION_LABELED: Regex = build(
        r"(?i)\bconsumo\s*:?\s*{NUM}\s*kwh\b"
    );

    pub static ref CONSUMPTION_BARE: Regex = build(
        r"(?i){NUM}\s*kwh\b"
    );

    // Total amount, most specific first
    pub static ref TOTAL_A_PAGAR: Regex = build(
        r"(?i)\btotal\s+a\s+pagar\s*:?\s*{NUM}"
    );

    pub static ref IMPORTE_TOTAL: Regex = build(
        r"(?i)\bimporte\s+total(?:\s+de\s+(?:la\s+)?factura)?\s*:?\s*{NUM}"
    );

    pub static ref TOTAL_FACTURA: Regex = build(
        r"(?i)\btotal\s+(?:factura|importe)\s*:?\s*{NUM}"
    );

    pub static ref AMOUNT_BEFORE_TOTAL: Regex = build(
        r"(?i){NUM}\s*{CURRENCY}\s*total\b"
    );

    pub static ref TOTAL_WITH_CURRENCY: Regex = build(
        r"(?i)\btotal\s*:?\s*{NUM}\s*{CURRENCY}"
    );

    // Billing period cues
    pub static ref PERIOD_BIMONTHLY: Regex = Regex::new(
        r"(?i)\b(?:bimensual|bimestral|2\s+meses|dos\s+meses)\b"
    ).unwrap();

    pub static ref PERIOD_QUARTERLY: Regex = Regex::new(
        r"(?i)\b(?:trimestral|3\s+meses|tres\s+meses)\b"
    ).unwrap();

    // Explicit billing dates: "Periodo de facturación: 01/01/2024 a 29/02/2024"
    pub static ref BILLING_DATES: Regex = Regex::new(
        r"(?i)\bper[ií]odo(?:\s+de\s+(?:facturaci[oó]n|consumo))?\s*:?\s*(?:del?\s+)?(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4}|\d{2})\s*(?:a|al|hasta|-|–)\s*(?:el\s+)?(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4}|\d{2})\b"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_does_not_join_years() {
        let caps = CONSUMPTION_BARE.captures("Fecha 29/02/2024 250 kWh").unwrap();
        assert_eq!(&caps[1], "250");
    }

    #[test]
    fn test_num_grouped() {
        let caps = CONSUMPTION_TOTAL.captures("Consumo total: 1.234,5 kWh").unwrap();
        assert_eq!(&caps[1], "1.234,5");
    }

    #[test]
    fn test_num_space_grouping_needs_decimals() {
        let caps = CONSUMPTION_BARE.captures("Días facturados 31 250 kWh").unwrap();
        assert_eq!(&caps[1], "250");

        let caps = CONSUMPTION_TOTAL.captures("Consumo total: 1 234,56 kWh").unwrap();
        assert_eq!(&caps[1], "1 234,56");
    }

    #[test]
    fn test_num_non_breaking_space_groups() {
        let caps = CONSUMPTION_TOTAL.captures("Consumo total: 1\u{a0}234 kWh").unwrap();
        assert_eq!(&caps[1], "1\u{a0}234");
    }

    #[test]
    fn test_vocabulary_has_group_per_supplier() {
        assert_eq!(SUPPLIER_VOCABULARY.captures_len(), KNOWN_SUPPLIERS.len() + 1);
    }

    #[test]
    fn test_kw_is_not_kwh() {
        assert!(CONSUMPTION_BARE.captures("Potencia contratada 4,6 kW").is_none());
    }
}
