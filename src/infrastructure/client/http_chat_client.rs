//! HTTP chat client talking to the proxy route

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::domain::chat::{ChatClient, ChatRequest, ChatResponse};
use crate::domain::DomainError;

/// Request timeout applied to every question
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default proxy route, relative to the client base URL
pub const DEFAULT_ROUTE: &str = "/chat";

const JSON: &str = "application/json";

/// Error body returned by the proxy
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Chat client posting questions to the proxy over HTTP
///
/// One request per question, no retry and no caching.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpChatClient {
    pub fn new(base_url: &str, route: &str) -> Result<Self, DomainError> {
        Self::with_timeout(base_url, route, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        route: &str,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            route.trim_start_matches('/')
        );

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, error: reqwest::Error) -> DomainError {
        if error.is_timeout() {
            DomainError::network(format!(
                "timeout of {}ms exceeded",
                self.timeout.as_millis()
            ))
        } else {
            DomainError::network(format!("Request failed: {}", error))
        }
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn ask_question(&self, question: &str) -> Result<ChatResponse, DomainError> {
        debug!(endpoint = %self.endpoint, "Sending question");

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON)
            .json(&ChatRequest::new(question))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::upstream(
                status.as_u16(),
                error_message(status, &body),
            ));
        }

        response.json::<ChatResponse>().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(e)
            } else {
                DomainError::network(format!("Failed to parse response: {}", e))
            }
        })
    }
}

/// Picks the server-supplied message, falling back to the status code
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()))
}
