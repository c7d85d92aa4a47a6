//! Configuration structures for the savings pipeline.
//!
//! Every policy threshold lives here with its default so the pipeline can be
//! tuned without touching the extraction or comparison code.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Main configuration for the ahorra pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AhorraConfig {
    /// Text acquisition configuration.
    pub acquisition: AcquisitionConfig,

    /// Remote OCR configuration.
    pub ocr: OcrConfig,

    /// Tariff cost model configuration.
    pub tariff: TariffConfig,

    /// Comparison and prudence policy configuration.
    pub comparison: ComparisonConfig,
}

/// Text acquisition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Minimum embedded PDF text length to skip OCR.
    pub min_embedded_text_len: usize,

    /// Minimum final text length to attempt field extraction.
    pub min_text_len: usize,

    /// Confidence assigned to embedded PDF text.
    pub embedded_text_confidence: f32,

    /// Confidence used when the OCR provider reports none.
    pub default_ocr_confidence: f32,

    /// Maximum number of characters of raw text kept on an extraction.
    pub raw_text_limit: usize,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            min_embedded_text_len: 80,
            min_text_len: 30,
            embedded_text_confidence: 0.92,
            default_ocr_confidence: 0.8,
            raw_text_limit: 2000,
        }
    }
}

/// Remote document-analysis OCR configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Service base URL. Empty disables OCR.
    pub endpoint: String,

    /// Name of the environment variable holding the API key.
    pub api_key_env: String,

    /// Analysis model identifier.
    pub model: String,

    /// Service API version.
    pub api_version: String,

    /// Delay between result polls, in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum number of result polls per document.
    pub max_polls: u32,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key_env: "AHORRA_OCR_KEY".to_string(),
            model: "prebuilt-read".to_string(),
            api_version: "2024-11-30".to_string(),
            poll_interval_ms: 1000,
            max_polls: 60,
            request_timeout_secs: 60,
        }
    }
}

impl OcrConfig {
    /// Whether an endpoint has been configured.
    pub fn is_enabled(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }
}

/// Tariff cost model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    /// Contracted power (kW) assumed for power-banded offers.
    ///
    /// Bills rarely expose the customer's real contracted power, so this
    /// fixed assumption stands in for it.
    pub default_contracted_power_kw: Decimal,

    /// Days billed per month for the power term.
    pub days_per_month: Decimal,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            default_contracted_power_kw: Decimal::new(46, 1),
            days_per_month: Decimal::from(30),
        }
    }
}

/// Comparison and prudent-mode policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Savings percentages above this are considered implausible.
    pub prudent_max_savings_percent: Decimal,

    /// Consumption below this (kWh) is considered implausible.
    pub prudent_min_consumption_kwh: Decimal,

    /// Consumption above this (kWh) is considered implausible.
    pub prudent_max_consumption_kwh: Decimal,

    /// Known extraction confidences below this mark the result prudent.
    pub prudent_min_confidence: f32,

    /// Minimum savings percentage for showing an exact figure.
    pub min_percent_to_show: Decimal,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            prudent_max_savings_percent: Decimal::from(45),
            prudent_min_consumption_kwh: Decimal::from(50),
            prudent_max_consumption_kwh: Decimal::from(5000),
            prudent_min_confidence: 0.8,
            min_percent_to_show: Decimal::from(8),
        }
    }
}

impl AhorraConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AhorraConfig::default();
        assert_eq!(config.acquisition.min_embedded_text_len, 80);
        assert_eq!(config.acquisition.min_text_len, 30);
        assert_eq!(config.tariff.default_contracted_power_kw, Decimal::new(46, 1));
        assert_eq!(config.comparison.min_percent_to_show, Decimal::from(8));
        assert!(!config.ocr.is_enabled());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AhorraConfig =
            serde_json::from_str(r#"{"comparison": {"min_percent_to_show": "10"}}"#).unwrap();
        assert_eq!(config.comparison.min_percent_to_show, Decimal::from(10));
        assert_eq!(config.comparison.prudent_max_savings_percent, Decimal::from(45));
        assert_eq!(config.acquisition.raw_text_limit, 2000);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AhorraConfig::default();
        config.ocr.endpoint = "https://ocr.example.com".to_string();
        config.save(&path).unwrap();

        let loaded = AhorraConfig::from_file(&path).unwrap();
        assert!(loaded.ocr.is_enabled());
        assert_eq!(loaded.tariff.days_per_month, Decimal::from(30));
    }

    #[test]
    fn test_from_file_errors() {
        use crate::error::AhorraError;

        let dir = tempfile::tempdir().unwrap();
        let missing = AhorraConfig::from_file(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(AhorraError::Io(_))));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(AhorraConfig::from_file(&path), Err(AhorraError::Json(_))));
    }
}
