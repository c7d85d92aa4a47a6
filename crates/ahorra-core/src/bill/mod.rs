//! Bill field extraction module.

mod parser;
pub mod rules;

pub use parser::{extract_fields, BillFieldParser, DEFAULT_RAW_TEXT_LIMIT};

use crate::models::extraction::InvoiceExtraction;

/// Trait for bill field extractors.
///
/// Parsing never fails: fields that cannot be found are left empty and
/// recorded as warnings on the extraction.
pub trait BillParser {
    /// Extract bill fields from recognized or embedded text.
    fn parse(&self, text: &str) -> InvoiceExtraction;
}
