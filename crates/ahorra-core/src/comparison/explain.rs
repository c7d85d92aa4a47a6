//! Explanations for requests that produced no comparison.

use crate::models::comparison::FailureReason;
use crate::models::extraction::{positive, InvoiceExtraction};
use crate::models::offer::EnergyOffer;

use super::engine::comparable_offers;

/// Pick the first applicable reason, checked in a fixed order.
pub fn explain_failure(extraction: &InvoiceExtraction, offers: &[EnergyOffer]) -> FailureReason {
    let has_figures = extraction.consumption_kwh.and_then(positive).is_some()
        && extraction.total_factura.and_then(positive).is_some();

    if !has_figures {
        FailureReason::MissingBillData
    } else if offers.is_empty() {
        FailureReason::NoOffersConfigured
    } else if comparable_offers(extraction, offers).is_empty() {
        FailureReason::NoComparableOffers
    } else {
        FailureReason::NoSavingsFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn bill() -> InvoiceExtraction {
        InvoiceExtraction::manual(Some("Iberdrola"), Decimal::from(250), Decimal::from(60), 1)
    }

    #[test]
    fn test_missing_data_checked_first() {
        let extraction = InvoiceExtraction::failed(None, 10);
        assert_eq!(explain_failure(&extraction, &[]), FailureReason::MissingBillData);
    }

    #[test]
    fn test_reasons_in_order() {
        assert_eq!(explain_failure(&bill(), &[]), FailureReason::NoOffersConfigured);

        let own = vec![EnergyOffer::flat("1", "IBERDROLA", Decimal::ONE, Decimal::ZERO)];
        assert_eq!(explain_failure(&bill(), &own), FailureReason::NoComparableOffers);

        let dear = vec![EnergyOffer::flat("2", "Endesa", Decimal::ONE, Decimal::ZERO)];
        assert_eq!(explain_failure(&bill(), &dear), FailureReason::NoSavingsFound);
    }
}
