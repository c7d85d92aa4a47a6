//! Competing supplier offers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A supplier offer from the externally maintained catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyOffer {
    /// Catalog identifier.
    pub id: String,

    /// Supplier name.
    pub company_name: String,

    /// Energy price per kWh.
    pub price_per_kwh: Decimal,

    /// Flat monthly fee, used when no power prices are set.
    #[serde(default)]
    pub monthly_fixed_cost: Decimal,

    /// Power price per contracted kW per day, first time band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p1: Option<Decimal>,

    /// Power price per contracted kW per day, second time band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2: Option<Decimal>,

    /// Whether the offer may be compared against.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// The pricing shape that governs an offer's fixed monthly term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferPricing {
    /// A single flat monthly fee.
    Flat { monthly_fixed_cost: Decimal },
    /// Two-band power charge per contracted kW per day.
    PowerBanded { p1: Decimal, p2: Decimal },
}

impl EnergyOffer {
    /// Create a flat-fee offer.
    pub fn flat(
        id: impl Into<String>,
        company_name: impl Into<String>,
        price_per_kwh: Decimal,
        monthly_fixed_cost: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            company_name: company_name.into(),
            price_per_kwh,
            monthly_fixed_cost,
            p1: None,
            p2: None,
            active: true,
        }
    }

    /// Set two-band power prices, making the power tariff authoritative.
    pub fn with_power_prices(mut self, p1: Decimal, p2: Decimal) -> Self {
        self.p1 = Some(p1);
        self.p2 = Some(p2);
        self
    }

    /// Mark the offer active or inactive.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// The authoritative pricing shape.
    ///
    /// Power prices win only when both bands are present.
    pub fn pricing(&self) -> OfferPricing {
        match (self.p1, self.p2) {
            (Some(p1), Some(p2)) => OfferPricing::PowerBanded { p1, p2 },
            _ => OfferPricing::Flat {
                monthly_fixed_cost: self.monthly_fixed_cost,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_shape() {
        let flat = EnergyOffer::flat("1", "Endesa", Decimal::new(15, 2), Decimal::from(10));
        assert_eq!(
            flat.pricing(),
            OfferPricing::Flat { monthly_fixed_cost: Decimal::from(10) }
        );

        let banded = flat.clone().with_power_prices(Decimal::new(1, 1), Decimal::new(3, 2));
        assert_eq!(
            banded.pricing(),
            OfferPricing::PowerBanded { p1: Decimal::new(1, 1), p2: Decimal::new(3, 2) }
        );

        let mut half = flat;
        half.p1 = Some(Decimal::new(1, 1));
        assert!(matches!(half.pricing(), OfferPricing::Flat { .. }));
    }

    #[test]
    fn test_deserialize_defaults() {
        let offer: EnergyOffer = serde_json::from_str(
            r#"{"id": "a1", "company_name": "Holaluz", "price_per_kwh": "0.12"}"#,
        )
        .unwrap();
        assert!(offer.active);
        assert_eq!(offer.monthly_fixed_cost, Decimal::ZERO);
        assert_eq!(offer.p1, None);
        assert_eq!(offer.price_per_kwh, Decimal::new(12, 2));
    }
}
