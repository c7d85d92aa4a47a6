//! Offer comparison and failure explanation.

mod engine;
mod explain;

pub use engine::{comparable_offers, ComparisonEngine};
pub use explain::explain_failure;
