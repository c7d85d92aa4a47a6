//! Tariff cost model.
//!
//! A monthly cost is an energy term (consumption times the energy price)
//! plus a power term. Power-banded offers charge per contracted kW per day
//! in two time bands; since bills rarely expose the customer's contracted
//! power, a fixed default stands in for it.

use rust_decimal::Decimal;

use crate::models::config::TariffConfig;
use crate::models::offer::{EnergyOffer, OfferPricing};

/// Monthly cost model for energy offers.
#[derive(Debug, Clone)]
pub struct TariffModel {
    contracted_power_kw: Decimal,
    days_per_month: Decimal,
}

impl TariffModel {
    /// Create a model with the default power and month length.
    pub fn new() -> Self {
        Self::from_config(&TariffConfig::default())
    }

    /// Create a model from configuration.
    pub fn from_config(config: &TariffConfig) -> Self {
        Self {
            contracted_power_kw: config.default_contracted_power_kw,
            days_per_month: config.days_per_month,
        }
    }

    /// Energy charge for a month, or `None` on overflow.
    pub fn energy_term(&self, consumption_kwh: Decimal, offer: &EnergyOffer) -> Option<Decimal> {
        consumption_kwh.checked_mul(offer.price_per_kwh)
    }

    /// Power or fixed charge for a month, or `None` on overflow.
    pub fn power_term(&self, offer: &EnergyOffer) -> Option<Decimal> {
        match offer.pricing() {
            OfferPricing::PowerBanded { p1, p2 } => {
                let mean_price = p1.checked_add(p2)?.checked_div(Decimal::TWO)?;
                self.contracted_power_kw
                    .checked_mul(self.days_per_month)?
                    .checked_mul(mean_price)
            }
            OfferPricing::Flat { monthly_fixed_cost } => Some(monthly_fixed_cost),
        }
    }

    /// Modeled monthly cost of `offer` for `consumption_kwh`. Unrounded.
    ///
    /// Figures read from bill text are unbounded, so an overflowing cost
    /// yields `None` instead of a value.
    pub fn monthly_cost(&self, consumption_kwh: Decimal, offer: &EnergyOffer) -> Option<Decimal> {
        self.energy_term(consumption_kwh, offer)?
            .checked_add(self.power_term(offer)?)
    }
}

impl Default for TariffModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_offer() {
        let offer = EnergyOffer::flat("o1", "Endesa", Decimal::new(15, 2), Decimal::from(10));
        let cost = TariffModel::new().monthly_cost(Decimal::from(250), &offer);
        assert_eq!(cost, Some(Decimal::new(4750, 2)));
    }

    #[test]
    fn test_power_banded_offer() {
        // 4.6 kW x 30 days x (0.10 + 0.04) / 2 = 9.66
        let offer = EnergyOffer::flat("o2", "Holaluz", Decimal::new(12, 2), Decimal::from(99))
            .with_power_prices(Decimal::new(10, 2), Decimal::new(4, 2));
        let model = TariffModel::new();

        assert_eq!(model.power_term(&offer), Some(Decimal::new(966, 2)));
        assert_eq!(model.monthly_cost(Decimal::from(200), &offer), Some(Decimal::new(3366, 2)));
    }

    #[test]
    fn test_configured_power() {
        let config = TariffConfig {
            default_contracted_power_kw: Decimal::from(10),
            days_per_month: Decimal::from(30),
        };
        let offer = EnergyOffer::flat("o3", "Lucera", Decimal::ZERO, Decimal::ZERO)
            .with_power_prices(Decimal::new(1, 1), Decimal::new(1, 1));
        assert_eq!(
            TariffModel::from_config(&config).monthly_cost(Decimal::ZERO, &offer),
            Some(Decimal::from(30))
        );
    }

    #[test]
    fn test_overflowing_cost_is_none() {
        let offer = EnergyOffer::flat("o4", "Endesa", Decimal::from(2), Decimal::from(10));
        let consumption = Decimal::from_str_exact("50000000000000000000000000000").unwrap();

        let model = TariffModel::new();
        assert_eq!(model.energy_term(consumption, &offer), None);
        assert_eq!(model.monthly_cost(consumption, &offer), None);
        assert_eq!(model.monthly_cost(Decimal::MAX, &offer), None);
    }
}
