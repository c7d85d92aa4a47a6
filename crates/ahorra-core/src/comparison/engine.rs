//! Best-offer selection, savings and prudent-mode policy.

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::bill::rules::round2;
use crate::bill::rules::supplier::company_key;
use crate::models::comparison::ComparisonResult;
use crate::models::config::{AhorraConfig, ComparisonConfig};
use crate::models::extraction::{positive, InvoiceExtraction};
use crate::models::offer::EnergyOffer;
use crate::tariff::TariffModel;

/// Offers from a supplier other than the one on the bill.
///
/// Names are compared after canonicalization, ignoring case and
/// surrounding whitespace. Input order is preserved.
pub fn comparable_offers<'a>(
    extraction: &InvoiceExtraction,
    offers: &'a [EnergyOffer],
) -> Vec<&'a EnergyOffer> {
    let current = extraction.company_name.as_deref().and_then(company_key);
    offers
        .iter()
        .filter(|offer| current.is_none() || company_key(&offer.company_name) != current)
        .collect()
}

/// Comparison engine.
#[derive(Debug, Clone)]
pub struct ComparisonEngine {
    tariff: TariffModel,
    config: ComparisonConfig,
}

impl ComparisonEngine {
    /// Create an engine with default policy and tariff constants.
    pub fn new() -> Self {
        Self::with_config(ComparisonConfig::default(), TariffModel::new())
    }

    /// Create an engine with explicit policy and tariff model.
    pub fn with_config(config: ComparisonConfig, tariff: TariffModel) -> Self {
        Self { tariff, config }
    }

    /// Create an engine from the full configuration.
    pub fn from_config(config: &AhorraConfig) -> Self {
        Self::with_config(config.comparison.clone(), TariffModel::from_config(&config.tariff))
    }

    /// Policy in use.
    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    /// Tariff model in use.
    pub fn tariff(&self) -> &TariffModel {
        &self.tariff
    }

    /// Compare the bill against the catalog.
    ///
    /// Returns `None` when the bill lacks consumption or total, when no
    /// comparable offer exists, or when the best offer is more expensive
    /// than the current bill. Offers whose modeled cost overflows are
    /// skipped.
    pub fn run_comparison(
        &self,
        extraction: &InvoiceExtraction,
        offers: &[EnergyOffer],
    ) -> Option<ComparisonResult> {
        let consumption = extraction.consumption_kwh.and_then(positive)?;
        let total = extraction.total_factura.and_then(positive)?;

        let period = Decimal::from(extraction.period_months.max(1));
        let current_monthly_cost = total.checked_div(period)?;
        let monthly_consumption = consumption.checked_div(period)?;

        let candidates = comparable_offers(extraction, offers);
        if candidates.is_empty() {
            debug!("No comparable offers among {}", offers.len());
            return None;
        }

        let mut best: Option<(&EnergyOffer, Decimal)> = None;
        for offer in candidates {
            let Some(cost) = self.tariff.monthly_cost(monthly_consumption, offer) else {
                debug!("Skipping offer {}: cost out of range", offer.id);
                continue;
            };
            debug!("Offer {} ({}) costs {}", offer.id, offer.company_name, cost);
            // Strict comparison keeps the first offer on ties
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((offer, cost));
            }
        }
        let (best_offer, best_cost) = best?;

        let savings = current_monthly_cost.checked_sub(best_cost)?;
        let percentage = if current_monthly_cost.is_zero() {
            Decimal::ZERO
        } else {
            savings
                .checked_div(current_monthly_cost)?
                .checked_mul(Decimal::ONE_HUNDRED)?
        };

        if percentage < Decimal::ZERO {
            debug!("Best offer {} is {}% more expensive", best_offer.id, -percentage);
            return None;
        }

        let prudent_mode = self.is_prudent(percentage, consumption, extraction.confidence);

        info!(
            "Best offer {} saves {} per month ({}%), prudent={}",
            best_offer.id,
            round2(savings),
            round2(percentage),
            prudent_mode
        );

        Some(ComparisonResult {
            current_company: extraction.company_name.clone(),
            current_monthly_cost: round2(current_monthly_cost),
            best_offer_id: best_offer.id.clone(),
            best_offer_company: best_offer.company_name.clone(),
            best_offer_monthly_cost: round2(best_cost),
            estimated_savings_amount: round2(savings),
            estimated_savings_percentage: round2(percentage),
            prudent_mode,
        })
    }

    /// Whether a result should be presented conservatively.
    ///
    /// Triggered by implausibly high savings, a consumption outside the
    /// plausible range, or a known extraction confidence below the floor.
    /// A confidence of zero means "unknown" and does not trigger it.
    pub fn is_prudent(&self, savings_percentage: Decimal, consumption_kwh: Decimal, confidence: f32) -> bool {
        savings_percentage > self.config.prudent_max_savings_percent
            || consumption_kwh < self.config.prudent_min_consumption_kwh
            || consumption_kwh > self.config.prudent_max_consumption_kwh
            || (confidence > 0.0 && confidence < self.config.prudent_min_confidence)
    }

    /// Whether an exact savings figure may be shown for `result`.
    pub fn should_show_exact_savings(&self, result: &ComparisonResult) -> bool {
        result.should_show_exact_savings(self.config.min_percent_to_show)
    }
}

impl Default for ComparisonEngine {
    fn default() -> Self {
        Self::new()
    }
}
