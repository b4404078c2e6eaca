//! Summarization service client and response normalization.
//!
//! The hosted inference API answers with a plain string, an object, or a list
//! of objects depending on model and version. [`normalize_summary`] turns any
//! of those shapes into one string.

use crate::config::{Credentials, SummarizerConfig};
use crate::http::{build_client, join_url};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Response fields that carry the summary, in order of preference
const TEXT_FIELDS: [&str; 2] = ["generated_text", "summary_text"];

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("summarization service error: request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("summarization service error: {status}: {body}")]
    Api { status: StatusCode, body: String },
}

/// Anything that can condense a text into a summary.
#[async_trait]
pub trait SummaryService {
    async fn summarize(&self, text: &str, max_length: u32) -> Result<String, SummaryError>;
}

/// Client for the Hugging Face inference API
pub struct HuggingFaceSummarizer {
    client: Client,
    url: String,
    token: String,
}

impl HuggingFaceSummarizer {
    pub fn new(config: &SummarizerConfig, credentials: &Credentials) -> Result<Self, SummaryError> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            url: join_url(&config.endpoint, &config.model),
            token: credentials.huggingface_key.clone(),
        })
    }
}

#[async_trait]
impl SummaryService for HuggingFaceSummarizer {
    async fn summarize(&self, text: &str, max_length: u32) -> Result<String, SummaryError> {
        let body = json!({
            "inputs": text,
            "parameters": { "max_length": max_length },
        });

        tracing::debug!(url = %self.url, chars = text.chars().count(), "requesting summary");
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(SummaryError::Api { status, body: raw });
        }

        // Some deployments answer with bare text rather than JSON
        let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
        Ok(normalize_summary(&value))
    }
}

/// Reduce a summarization response of unknown shape to a single string.
///
/// Objects yield their `generated_text` or `summary_text` field. For lists the
/// first object carrying one of those fields wins; otherwise the first element
/// is used as-is. Anything else is rendered as JSON.
pub fn normalize_summary(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(map) => preferred_text(map).unwrap_or_else(|| value.to_string()),
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .filter_map(Value::as_object)
            .find_map(preferred_text)
            .unwrap_or_else(|| stringify(&items[0])),
        other => other.to_string(),
    }
}

fn preferred_text(map: &Map<String, Value>) -> Option<String> {
    TEXT_FIELDS
        .iter()
        .filter_map(|field| map.get(*field).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
