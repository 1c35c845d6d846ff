//! Client for the upstream question-answering service

use std::time::Duration;

use hyper::ext::ReasonPhrase;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::DomainError;

/// Sub-path appended to the upstream base URL
pub const DEFAULT_ASK_PATH: &str = "/ask";

/// Outcome of a forwarded request that reached the upstream
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamReply {
    /// 2xx with a JSON body, relayed as-is
    Success(Value),
    /// Non-success status and its reason phrase
    Failure { status: u16, reason: String },
}

/// Forwards chat bodies to `<base_url><ask_path>`
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str, ask_path: &str, timeout: Duration) -> Result<Self, DomainError> {
        if base_url.trim().is_empty() {
            warn!("Upstream base URL is empty, proxied requests will fail");
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                ask_path.trim_start_matches('/')
            ),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Posts the body unchanged and reports what the upstream answered
    ///
    /// Transport failures and undecodable success bodies are errors.
    pub async fn forward(&self, body: &Value) -> Result<UpstreamReply, DomainError> {
        debug!(url = %self.url, "Forwarding request upstream");

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::network(format!("Upstream request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            return Ok(UpstreamReply::Failure {
                status: status.as_u16(),
                reason: reason_phrase(status, response.extensions().get::<ReasonPhrase>()),
            });
        }

        let value = response.json::<Value>().await.map_err(|e| {
            DomainError::internal(format!("Failed to parse upstream response: {}", e))
        })?;

        Ok(UpstreamReply::Success(value))
    }
}

/// Reason phrase the upstream sent, falling back to the canonical one
///
/// hyper only records a phrase when it differs from the canonical reason.
fn reason_phrase(status: StatusCode, sent: Option<&ReasonPhrase>) -> String {
    sent.map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned())
        .filter(|phrase| !phrase.trim().is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "Unknown".to_string())
}
