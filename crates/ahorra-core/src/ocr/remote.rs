//! Client for a remote document-analysis "read" service.
//!
//! The document is submitted once; the returned `Operation-Location` is
//! then polled until the analysis succeeds, fails or the poll budget runs
//! out. All of this is one logical OCR call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{OcrProvider, OcrText};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

const API_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

type Result<T> = std::result::Result<T, OcrError>;

/// Remote OCR client.
#[derive(Debug, Clone)]
pub struct DocumentAnalysisClient {
    client: Client,
    analyze_url: String,
    api_key: String,
    poll_interval: Duration,
    max_polls: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOperation {
    status: String,
    #[serde(default)]
    analyze_result: Option<AnalyzeResult>,
    #[serde(default)]
    error: Option<ServiceError>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalyzeResult {
    #[serde(default)]
    content: String,
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    lines: Vec<Line>,
    #[serde(default)]
    words: Vec<Word>,
}

#[derive(Debug, Deserialize)]
struct Line {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Word {
    #[serde(default)]
    confidence: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    message: String,
}

impl DocumentAnalysisClient {
    /// Build a client from configuration, reading the API key from the
    /// environment variable named in `config.api_key_env`.
    pub fn from_config(config: &OcrConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| OcrError::NotConfigured(format!("{} not set", config.api_key_env)))?;
        Self::new(config, api_key)
    }

    /// Build a client with an explicit API key.
    pub fn new(config: &OcrConfig, api_key: impl Into<String>) -> Result<Self> {
        if !config.is_enabled() {
            return Err(OcrError::NotConfigured("no endpoint configured".to_string()));
        }

        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(OcrError::NotConfigured("empty API key".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| OcrError::Request(e.to_string()))?;

        Ok(Self {
            client,
            analyze_url: analyze_url(config),
            api_key,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_polls: config.max_polls,
        })
    }

    /// Run one analysis, surfacing failures as errors.
    pub async fn analyze(&self, data: &[u8], mime: &str) -> Result<OcrText> {
        let response = self
            .client
            .post(&self.analyze_url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type(mime))
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| OcrError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let operation_url = response
            .headers()
            .get("Operation-Location")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| OcrError::InvalidResponse("missing Operation-Location".to_string()))?
            .to_string();

        debug!("OCR analysis submitted, polling {}", operation_url);

        for attempt in 1..=self.max_polls {
            tokio::time::sleep(self.poll_interval).await;

            let operation: AnalyzeOperation = self
                .client
                .get(&operation_url)
                .header(API_KEY_HEADER, &self.api_key)
                .send()
                .await
                .map_err(|e| OcrError::Request(e.to_string()))?
                .json()
                .await
                .map_err(|e| OcrError::InvalidResponse(e.to_string()))?;

            match operation.status.as_str() {
                "succeeded" => {
                    debug!("OCR analysis finished after {} polls", attempt);
                    return ocr_text(operation.analyze_result.unwrap_or_default());
                }
                "failed" => {
                    let message = operation
                        .error
                        .map(|e| e.message)
                        .unwrap_or_else(|| "unknown error".to_string());
                    return Err(OcrError::AnalysisFailed(message));
                }
                other => debug!("OCR analysis status: {}", other),
            }
        }

        Err(OcrError::PollBudgetExhausted(self.max_polls))
    }
}

#[async_trait]
impl OcrProvider for DocumentAnalysisClient {
    async fn recognize(&self, data: &[u8], mime: &str) -> Option<OcrText> {
        info!("Running remote OCR on {} bytes ({})", data.len(), mime);
        match self.analyze(data, mime).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Remote OCR failed: {}", e);
                None
            }
        }
    }
}

fn analyze_url(config: &OcrConfig) -> String {
    format!(
        "{}/documentintelligence/documentModels/{}:analyze?api-version={}",
        config.endpoint.trim().trim_end_matches('/'),
        config.model,
        config.api_version
    )
}

fn content_type(mime: &str) -> &str {
    let mime = mime.trim();
    if mime.is_empty() {
        "application/octet-stream"
    } else {
        mime
    }
}

/// Flatten an analysis result into text and a mean word confidence.
fn ocr_text(result: AnalyzeResult) -> Result<OcrText> {
    let text = if result.content.trim().is_empty() {
        result
            .pages
            .iter()
            .flat_map(|page| page.lines.iter().map(|line| line.content.as_str()))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        result.content
    };

    if text.trim().is_empty() {
        return Err(OcrError::InvalidResponse("no text recognized".to_string()));
    }

    let confidences: Vec<f32> = result
        .pages
        .iter()
        .flat_map(|page| page.words.iter().filter_map(|word| word.confidence))
        .collect();

    let confidence = (!confidences.is_empty())
        .then(|| confidences.iter().sum::<f32>() / confidences.len() as f32);

    Ok(OcrText { text, confidence })
}
