//! Rule-based field extractors for energy bills.
//!
//! Each field is recovered by an ordered table of [`PatternRule`]s. The
//! first rule that yields a value wins, so table order is part of the
//! behavior: earlier rules are the more specific ones.

pub mod amounts;
pub mod consumption;
pub mod numbers;
pub mod patterns;
pub mod period;
pub mod supplier;

pub use amounts::{extract_total, TOTAL_RULES};
pub use consumption::{extract_consumption, CONSUMPTION_RULES};
pub use numbers::{format_locale_amount, parse_locale_number, round2};
pub use period::{extract_billing_period, extract_period_months};
pub use supplier::{canonicalize_company, extract_supplier, SUPPLIER_RULES};

use regex::{Captures, Regex};
use tracing::trace;

/// One entry of an ordered extraction table.
pub struct PatternRule<T> {
    /// Name reported in debug output and matches.
    pub name: &'static str,
    /// Pattern to search for.
    pub pattern: &'static Regex,
    /// Turns the first match into a value, or declines it.
    pub extract: fn(&Captures) -> Option<T>,
}

/// A value recovered by a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Name of the rule that produced it.
    pub rule: &'static str,
    /// Position in source text.
    pub position: (usize, usize),
    /// Source text that was matched.
    pub source: String,
}

/// Evaluate `rules` in order and return the first value produced.
///
/// A rule whose pattern matches but whose extractor declines does not stop
/// the search.
pub fn first_match<T>(rules: &[PatternRule<T>], text: &str) -> Option<ExtractionMatch<T>> {
    rules.iter().find_map(|rule| {
        let caps = rule.pattern.captures(text)?;
        let full_match = caps.get(0)?;
        trace!("Rule {} matched {:?}", rule.name, full_match.as_str());

        (rule.extract)(&caps).map(|value| ExtractionMatch {
            value,
            rule: rule.name,
            position: (full_match.start(), full_match.end()),
            source: full_match.as_str().to_string(),
        })
    })
}

/// Collapse every whitespace run (including line breaks) to one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() && !is_group_separator(c))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Non-breaking spaces used as thousands separators ("1 234").
fn is_group_separator(c: char) -> bool {
    matches!(c, '\u{a0}' | '\u{202f}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;

    lazy_static! {
        static ref DIGITS: Regex = Regex::new(r"(\d+)").unwrap();
        static ref WORD: Regex = Regex::new(r"([a-z]+)").unwrap();
    }

    fn decline(_: &Captures) -> Option<String> {
        None
    }

    fn capture(caps: &Captures) -> Option<String> {
        Some(caps[1].to_string())
    }

    #[test]
    fn test_first_match_respects_order() {
        let rules = [
            PatternRule { name: "word", pattern: &*WORD, extract: capture },
            PatternRule { name: "digits", pattern: &*DIGITS, extract: capture },
        ];
        let found = first_match(&rules, "42 abc").unwrap();
        assert_eq!(found.value, "abc");
        assert_eq!(found.rule, "word");
        assert_eq!(found.position, (3, 6));
    }

    #[test]
    fn test_first_match_skips_declined() {
        let rules = [
            PatternRule { name: "word", pattern: &*WORD, extract: decline },
            PatternRule { name: "digits", pattern: &*DIGITS, extract: capture },
        ];
        assert_eq!(first_match(&rules, "42 abc").unwrap().rule, "digits");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Consumo\n total:\t 250\r\n kWh "), "Consumo total: 250 kWh");
    }

    #[test]
    fn test_collapse_whitespace_keeps_group_separators() {
        assert_eq!(collapse_whitespace("1\u{a0}234\n kWh"), "1\u{a0}234 kWh");
    }
}
