//! Locale-aware number parsing for European and US formatted figures.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parse a number written with either comma or dot decimals.
///
/// Whitespace (including non-breaking spaces) is ignored. When the last
/// comma comes after the last dot, the comma is the decimal separator and
/// dots group thousands ("1.234,56"); otherwise the dot is decimal and
/// commas group thousands ("1,234.56"). Zero and negative values are
/// returned as parsed; callers decide whether they are meaningful.
pub fn parse_locale_number(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    let negative = cleaned.starts_with('-');
    let body = cleaned.trim_start_matches('-');
    if body.contains('-') || !body.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match (body.rfind(','), body.rfind('.')) {
        (Some(c), Some(d)) if c > d => body.replace('.', "").replace(',', "."),
        (Some(_), None) => body.replace(',', "."),
        _ => body.replace(',', ""),
    };

    // A comma-decimal figure with a second comma ("1,234,56") is not a number.
    if normalized.matches('.').count() > 1 {
        return None;
    }

    let value = Decimal::from_str(&normalized).ok()?;
    Some(if negative { -value } else { value })
}

/// Round to two decimals, halves away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount in Spanish style (1.234,56).
pub fn format_locale_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", round2(amount));
    let (sign, s) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let Some((integer_part, decimal_part)) = s.split_once('.') else {
        return format!("{}{}", sign, s);
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{}{},{}", sign, formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_locale_number() {
        assert_eq!(parse_locale_number("1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_locale_number("1 234,56"), Some(dec("1234.56")));
        assert_eq!(parse_locale_number("1\u{00a0}234,56"), Some(dec("1234.56")));
        assert_eq!(parse_locale_number("1234.56"), Some(dec("1234.56")));
        assert_eq!(parse_locale_number("45,50"), Some(dec("45.50")));
        assert_eq!(parse_locale_number("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_locale_number("12.345.678,90"), Some(dec("12345678.90")));
        assert_eq!(parse_locale_number("250"), Some(dec("250")));
    }

    #[test]
    fn test_parse_keeps_zero_and_negative() {
        assert_eq!(parse_locale_number("0,00"), Some(Decimal::ZERO));
        assert_eq!(parse_locale_number("-12,50"), Some(dec("-12.50")));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_locale_number(""), None);
        assert_eq!(parse_locale_number("kWh"), None);
        assert_eq!(parse_locale_number(",."), None);
        assert_eq!(parse_locale_number("1-2"), None);
        assert_eq!(parse_locale_number("1,234,56"), None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(dec("20.8333")), dec("20.83"));
        assert_eq!(round2(dec("0.125")), dec("0.13"));
        assert_eq!(round2(dec("-0.125")), dec("-0.13"));
    }

    #[test]
    fn test_format_locale_amount() {
        assert_eq!(format_locale_amount(dec("1234.5")), "1.234,50");
        assert_eq!(format_locale_amount(dec("12345678.90")), "12.345.678,90");
        assert_eq!(format_locale_amount(dec("47.5")), "47,50");
        assert_eq!(format_locale_amount(dec("-1234")), "-1.234,00");
    }
}
