//! Comparison outcomes handed to persistence and presentation layers.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::extraction::InvoiceExtraction;

/// Savings estimate against the cheapest comparable offer.
///
/// Monetary and percentage fields are rounded to two decimals.
/// `estimated_savings_percentage` is never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Customer's current supplier.
    pub current_company: Option<String>,

    /// Current monthly cost derived from the bill.
    pub current_monthly_cost: Decimal,

    /// Catalog identifier of the best offer.
    pub best_offer_id: String,

    /// Supplier of the best offer.
    pub best_offer_company: String,

    /// Modeled monthly cost of the best offer.
    pub best_offer_monthly_cost: Decimal,

    /// Monthly savings amount.
    pub estimated_savings_amount: Decimal,

    /// Monthly savings as a percentage of the current cost.
    pub estimated_savings_percentage: Decimal,

    /// Present the result conservatively.
    pub prudent_mode: bool,
}

impl ComparisonResult {
    /// Whether an exact savings figure may be shown.
    ///
    /// False for prudent results and for savings below `min_percent`.
    pub fn should_show_exact_savings(&self, min_percent: Decimal) -> bool {
        !self.prudent_mode && self.estimated_savings_percentage >= min_percent
    }
}

/// Why no comparison could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Consumption or total missing from the bill.
    MissingBillData,
    /// The offer catalog is empty.
    NoOffersConfigured,
    /// Every offer belongs to the current supplier.
    NoComparableOffers,
    /// No comparable offer is cheaper.
    NoSavingsFound,
}

impl FailureReason {
    /// Human-readable explanation.
    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::MissingBillData => "Could not read the bill data automatically",
            FailureReason::NoOffersConfigured => "No offers configured",
            FailureReason::NoComparableOffers => "No other suppliers to compare",
            FailureReason::NoSavingsFound => "No offer with savings found",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Status tag persisted alongside a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
    Completed,
    Failed,
}

/// Everything the pipeline produces for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsReport {
    pub status: ComparisonStatus,
    pub extraction: InvoiceExtraction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<FailureReason>,
    pub show_exact_savings: bool,
}

impl SavingsReport {
    /// Report for a successful comparison.
    pub fn completed(
        extraction: InvoiceExtraction,
        comparison: ComparisonResult,
        min_percent_to_show: Decimal,
    ) -> Self {
        let show_exact_savings = comparison.should_show_exact_savings(min_percent_to_show);
        Self {
            status: ComparisonStatus::Completed,
            extraction,
            comparison: Some(comparison),
            failure_reason: None,
            show_exact_savings,
        }
    }

    /// Report for a request that produced no comparison.
    pub fn failed(extraction: InvoiceExtraction, reason: FailureReason) -> Self {
        Self {
            status: ComparisonStatus::Failed,
            extraction,
            comparison: None,
            failure_reason: Some(reason),
            show_exact_savings: false,
        }
    }
}
