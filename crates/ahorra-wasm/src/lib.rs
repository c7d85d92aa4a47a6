//! WASM bindings for energy-bill savings analysis.
//!
//! Text acquisition stays on the JavaScript side; these bindings cover
//! field extraction from already-recovered text and the comparison itself.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use wasm_bindgen::prelude::*;

use ahorra_core::models::extraction::InvoiceExtraction;
use ahorra_core::models::offer::EnergyOffer;
use ahorra_core::{
    savings_report, AhorraConfig, BillFieldParser, BillParser, ComparisonEngine, ComparisonResult,
    TariffModel, TextSource,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::try_from(value).ok()
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn offers_from_js(offers: JsValue) -> Result<Vec<EnergyOffer>, JsValue> {
    let offers: Vec<EnergyOffer> = serde_wasm_bindgen::from_value(offers).map_err(to_js_error)?;
    Ok(offers.into_iter().filter(|offer| offer.active).collect())
}

/// Extract bill fields from text.
///
/// Takes bill text (from OCR or PDF extraction) and returns the extraction.
#[wasm_bindgen]
pub fn extract_fields(text: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&ahorra_core::extract_fields(text)).map_err(to_js_error)
}

/// Parse a Spanish-formatted number (e.g., "1.234,56").
#[wasm_bindgen]
pub fn parse_locale_number(value: &str) -> Option<f64> {
    ahorra_core::parse_locale_number(value).map(to_f64)
}

/// Format an amount in Spanish style (1.234,56).
#[wasm_bindgen]
pub fn format_amount(amount: f64) -> String {
    to_decimal(amount)
        .map(ahorra_core::format_locale_amount)
        .unwrap_or_default()
}

/// Monthly cost of an offer under the default tariff model.
#[wasm_bindgen]
pub fn monthly_cost(consumption_kwh: f64, offer: JsValue) -> Result<f64, JsValue> {
    let offer: EnergyOffer = serde_wasm_bindgen::from_value(offer).map_err(to_js_error)?;
    let consumption =
        to_decimal(consumption_kwh).ok_or_else(|| JsValue::from_str("Invalid consumption"))?;
    TariffModel::new()
        .monthly_cost(consumption, &offer)
        .map(to_f64)
        .ok_or_else(|| JsValue::from_str("Cost out of range"))
}

/// Compare an extraction against offers with default policy.
///
/// Returns the comparison result, or `null` when none is possible.
#[wasm_bindgen]
pub fn run_comparison(extraction: JsValue, offers: JsValue) -> Result<JsValue, JsValue> {
    let extraction: InvoiceExtraction =
        serde_wasm_bindgen::from_value(extraction).map_err(to_js_error)?;
    let offers: Vec<EnergyOffer> = serde_wasm_bindgen::from_value(offers).map_err(to_js_error)?;

    match ComparisonEngine::new().run_comparison(&extraction, &offers) {
        Some(result) => serde_wasm_bindgen::to_value(&result).map_err(to_js_error),
        None => Ok(JsValue::NULL),
    }
}

/// Explain why no comparison was produced.
#[wasm_bindgen]
pub fn explain_failure(extraction: JsValue, offers: JsValue) -> Result<String, JsValue> {
    let extraction: InvoiceExtraction =
        serde_wasm_bindgen::from_value(extraction).map_err(to_js_error)?;
    let offers: Vec<EnergyOffer> = serde_wasm_bindgen::from_value(offers).map_err(to_js_error)?;

    Ok(ahorra_core::explain_failure(&extraction, &offers).to_string())
}

/// Whether a comparison result may show an exact savings figure.
#[wasm_bindgen]
pub fn should_show_exact_savings(result: JsValue, min_percent: f64) -> Result<bool, JsValue> {
    let result: ComparisonResult = serde_wasm_bindgen::from_value(result).map_err(to_js_error)?;
    let min_percent =
        to_decimal(min_percent).ok_or_else(|| JsValue::from_str("Invalid percentage"))?;
    Ok(result.should_show_exact_savings(min_percent))
}

/// Savings calculator for browser use.
#[wasm_bindgen]
pub struct SavingsCalculator {
    parser: BillFieldParser,
    engine: ComparisonEngine,
}

#[wasm_bindgen]
impl SavingsCalculator {
    /// Create a calculator, optionally from a configuration object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<SavingsCalculator, JsValue> {
        let config: AhorraConfig = if config.is_undefined() || config.is_null() {
            AhorraConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(to_js_error)?
        };

        Ok(Self {
            parser: BillFieldParser::new().with_raw_text_limit(config.acquisition.raw_text_limit),
            engine: ComparisonEngine::from_config(&config),
        })
    }

    /// Extract bill fields from recognized text.
    ///
    /// `confidence` is the recognizer's own score; pass 0 when unknown.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str, confidence: f32) -> Result<JsValue, JsValue> {
        let mut extraction = self.parser.parse(text);
        if confidence > 0.0 {
            extraction = extraction.with_confidence(confidence).with_source(TextSource::Ocr);
        }
        serde_wasm_bindgen::to_value(&extraction).map_err(to_js_error)
    }

    /// Modeled monthly cost of an offer for a monthly consumption.
    #[wasm_bindgen]
    pub fn monthly_cost(&self, consumption_kwh: f64, offer: JsValue) -> Result<f64, JsValue> {
        let offer: EnergyOffer = serde_wasm_bindgen::from_value(offer).map_err(to_js_error)?;
        let consumption = to_decimal(consumption_kwh)
            .ok_or_else(|| JsValue::from_str("Invalid consumption"))?;
        self.engine
            .tariff()
            .monthly_cost(consumption, &offer)
            .map(to_f64)
            .ok_or_else(|| JsValue::from_str("Cost out of range"))
    }

    /// Compare an extraction against a list of offers.
    ///
    /// Returns a savings report; inactive offers are ignored.
    #[wasm_bindgen]
    pub fn compare(&self, extraction: JsValue, offers: JsValue) -> Result<JsValue, JsValue> {
        let extraction: InvoiceExtraction =
            serde_wasm_bindgen::from_value(extraction).map_err(to_js_error)?;
        let offers = offers_from_js(offers)?;

        let report = savings_report(&self.engine, extraction, &offers);
        serde_wasm_bindgen::to_value(&report).map_err(to_js_error)
    }

    /// Compare figures typed in by the user.
    #[wasm_bindgen]
    pub fn compare_manual(
        &self,
        company_name: Option<String>,
        consumption_kwh: f64,
        total_factura: f64,
        period_months: u32,
        offers: JsValue,
    ) -> Result<JsValue, JsValue> {
        let extraction = InvoiceExtraction::manual(
            company_name.as_deref(),
            to_decimal(consumption_kwh).unwrap_or_default(),
            to_decimal(total_factura).unwrap_or_default(),
            period_months,
        );
        let offers = offers_from_js(offers)?;

        let report = savings_report(&self.engine, extraction, &offers);
        serde_wasm_bindgen::to_value(&report).map_err(to_js_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_parse_locale_number() {
        let value = parse_locale_number("1.234,56");
        assert!(value.is_some());
        assert!((value.unwrap() - 1234.56).abs() < 0.001);
        assert_eq!(parse_locale_number("n/a"), None);
    }

    #[wasm_bindgen_test]
    fn test_format_amount() {
        assert_eq!(format_amount(1234.5), "1.234,50");
    }

    #[wasm_bindgen_test]
    fn test_explain_failure_without_offers() {
        let extraction = InvoiceExtraction::manual(None, Decimal::from(250), Decimal::from(60), 1);
        let extraction = serde_wasm_bindgen::to_value(&extraction).unwrap();
        let offers = serde_wasm_bindgen::to_value(&Vec::<EnergyOffer>::new()).unwrap();

        let reason = explain_failure(extraction, offers).unwrap();
        assert_eq!(reason, ahorra_core::FailureReason::NoOffersConfigured.to_string());
    }

    #[wasm_bindgen_test]
    fn test_monthly_cost() {
        let calculator = SavingsCalculator::new(JsValue::UNDEFINED).unwrap();
        let offer = EnergyOffer::flat("e1", "Endesa", Decimal::new(15, 2), Decimal::from(10));
        let offer = serde_wasm_bindgen::to_value(&offer).unwrap();

        let cost = calculator.monthly_cost(250.0, offer).unwrap();
        assert!((cost - 47.5).abs() < 0.001);
    }
}
