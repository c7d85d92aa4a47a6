//! End-to-end savings pipeline: acquire text, extract fields, compare.

use tracing::info;

use crate::acquisition::TextAcquisition;
use crate::comparison::{explain_failure, ComparisonEngine};
use crate::models::comparison::SavingsReport;
use crate::models::config::AhorraConfig;
use crate::models::extraction::InvoiceExtraction;
use crate::models::offer::EnergyOffer;
use crate::ocr::OcrProvider;
use crate::pdf::EmbeddedTextSource;

/// Compare an extraction and bundle the outcome into a report.
///
/// This is also the entry point for figures typed in by a user.
pub fn savings_report(
    engine: &ComparisonEngine,
    extraction: InvoiceExtraction,
    offers: &[EnergyOffer],
) -> SavingsReport {
    match engine.run_comparison(&extraction, offers) {
        Some(comparison) => {
            SavingsReport::completed(extraction, comparison, engine.config().min_percent_to_show)
        }
        None => {
            let reason = explain_failure(&extraction, offers);
            info!("No comparison: {}", reason);
            SavingsReport::failed(extraction, reason)
        }
    }
}

/// Document-to-report pipeline.
pub struct SavingsPipeline<P, O> {
    acquisition: TextAcquisition<P, O>,
    engine: ComparisonEngine,
}

impl<P: EmbeddedTextSource, O: OcrProvider> SavingsPipeline<P, O> {
    pub fn new(acquisition: TextAcquisition<P, O>, engine: ComparisonEngine) -> Self {
        Self { acquisition, engine }
    }

    /// Build every stage from configuration.
    pub fn from_config(pdf: P, ocr: O, config: &AhorraConfig) -> Self {
        Self::new(
            TextAcquisition::with_config(pdf, ocr, config.acquisition.clone()),
            ComparisonEngine::from_config(config),
        )
    }

    pub fn engine(&self) -> &ComparisonEngine {
        &self.engine
    }

    /// Acquire and extract bill fields only.
    pub async fn extract(&self, data: &[u8], mime: &str) -> InvoiceExtraction {
        self.acquisition.acquire(data, mime).await
    }

    /// Run the full pipeline on a document.
    pub async fn analyze(&self, data: &[u8], mime: &str, offers: &[EnergyOffer]) -> SavingsReport {
        let extraction = self.extract(data, mime).await;
        info!(
            "Extracted bill: company={:?} consumption={:?} total={:?} confidence={:.2}",
            extraction.company_name,
            extraction.consumption_kwh,
            extraction.total_factura,
            extraction.confidence
        );
        savings_report(&self.engine, extraction, offers)
    }

    /// Compare figures entered by hand, bypassing text acquisition.
    pub fn analyze_manual(&self, extraction: InvoiceExtraction, offers: &[EnergyOffer]) -> SavingsReport {
        savings_report(&self.engine, extraction, offers)
    }
}

#[cfg(feature = "native")]
mod native {
    use tracing::warn;

    use super::SavingsPipeline;
    use crate::models::config::AhorraConfig;
    use crate::ocr::{DocumentAnalysisClient, NoOcr, OcrProvider};
    use crate::pdf::PdfExtractor;

    impl SavingsPipeline<PdfExtractor, Box<dyn OcrProvider>> {
        /// Pipeline over real PDFs and the configured OCR service.
        ///
        /// OCR is disabled when no endpoint or key is available.
        pub fn native(config: &AhorraConfig) -> Self {
            let ocr: Box<dyn OcrProvider> = if config.ocr.is_enabled() {
                match DocumentAnalysisClient::from_config(&config.ocr) {
                    Ok(client) => Box::new(client),
                    Err(e) => {
                        warn!("OCR disabled: {}", e);
                        Box::new(NoOcr)
                    }
                }
            } else {
                Box::new(NoOcr)
            };

            Self::from_config(PdfExtractor::new(), ocr, config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comparison::{ComparisonStatus, FailureReason};
    use rust_decimal::Decimal;

    #[test]
    fn test_savings_report_completed() {
        let extraction =
            InvoiceExtraction::manual(Some("Iberdrola"), Decimal::from(250), Decimal::from(60), 1);
        let offers = vec![EnergyOffer::flat("e1", "Endesa", Decimal::new(15, 2), Decimal::from(10))];

        let report = savings_report(&ComparisonEngine::new(), extraction, &offers);
        assert_eq!(report.status, ComparisonStatus::Completed);
        assert!(report.show_exact_savings);
        assert_eq!(report.failure_reason, None);
    }

    #[test]
    fn test_savings_report_failed() {
        let extraction =
            InvoiceExtraction::manual(Some("Iberdrola"), Decimal::from(250), Decimal::from(60), 1);

        let report = savings_report(&ComparisonEngine::new(), extraction, &[]);
        assert_eq!(report.status, ComparisonStatus::Failed);
        assert_eq!(report.failure_reason, Some(FailureReason::NoOffersConfigured));
        assert!(report.comparison.is_none());
    }
}
