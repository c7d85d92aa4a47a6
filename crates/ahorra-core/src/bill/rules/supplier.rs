//! Supplier (comercializadora) detection and name canonicalization.

use lazy_static::lazy_static;
use regex::Captures;

use super::patterns::{
    KNOWN_SUPPLIERS, SUPPLIER_COMERCIALIZADORA, SUPPLIER_EMPRESA, SUPPLIER_SUMINISTRADORA,
    SUPPLIER_TITLE, SUPPLIER_VOCABULARY,
};
use super::{first_match, ExtractionMatch, PatternRule};

/// Words that end a labeled supplier name.
const STOP_WORDS: &[&str] = &[
    "cif", "nif", "c/", "calle", "avda", "avda.", "avenida", "tel", "tel.", "teléfono",
    "telefono", "dirección", "direccion", "domicilio", "nº", "n.º", "número", "numero",
];

const MAX_NAME_WORDS: usize = 4;

fn known_supplier(caps: &Captures) -> Option<String> {
    // Group i + 1 belongs to KNOWN_SUPPLIERS[i]
    KNOWN_SUPPLIERS
        .iter()
        .enumerate()
        .find(|(i, _)| caps.get(i + 1).is_some())
        .map(|(_, (_, name))| name.to_string())
}

fn labeled_name(caps: &Captures) -> Option<String> {
    clean_supplier_name(&caps[1])
}

lazy_static! {
    /// Supplier rules: known vocabulary, then labels, then the title.
    pub static ref SUPPLIER_RULES: Vec<PatternRule<String>> = vec![
        PatternRule { name: "known_supplier", pattern: &*SUPPLIER_VOCABULARY, extract: known_supplier },
        PatternRule { name: "comercializadora", pattern: &*SUPPLIER_COMERCIALIZADORA, extract: labeled_name },
        PatternRule { name: "empresa", pattern: &*SUPPLIER_EMPRESA, extract: labeled_name },
        PatternRule { name: "suministradora", pattern: &*SUPPLIER_SUMINISTRADORA, extract: labeled_name },
        PatternRule { name: "title", pattern: &*SUPPLIER_TITLE, extract: labeled_name },
    ];
}

/// Find the supplier in whitespace-collapsed text, canonicalized.
pub fn extract_supplier(text: &str) -> Option<ExtractionMatch<String>> {
    let mut found = first_match(&SUPPLIER_RULES, text)?;
    found.value = canonicalize_company(&found.value)?;
    Some(found)
}

/// Cut a captured label value down to the supplier name itself.
///
/// Stops at the first stop word or token containing a digit and keeps at
/// most four words.
pub fn clean_supplier_name(raw: &str) -> Option<String> {
    let name = raw
        .split_whitespace()
        .take_while(|word| {
            let lower = word.to_lowercase();
            !STOP_WORDS.contains(&lower.as_str()) && !word.chars().any(|c| c.is_ascii_digit())
        })
        .take(MAX_NAME_WORDS)
        .collect::<Vec<_>>()
        .join(" ");

    let name = name.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-' | '–' | '—'));
    (!name.is_empty()).then(|| name.to_string())
}

/// Map supplier aliases to their canonical name.
///
/// Any name containing "gas natural" or "naturgy" becomes "Naturgy";
/// other names come back trimmed. Blank names yield `None`.
pub fn canonicalize_company(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    if lower.contains("gas natural") || lower.contains("naturgy") {
        return Some("Naturgy".to_string());
    }

    Some(trimmed.to_string())
}

/// Key used to decide whether two supplier names are the same supplier.
pub fn company_key(name: &str) -> Option<String> {
    canonicalize_company(name).map(|c| c.to_lowercase())
}
