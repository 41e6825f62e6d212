//! Natural-language student summaries via a local generation runtime.
//!
//! The Ollama-backed client posts a single non-streaming `/api/generate` request per summary and
//! returns the `response` field untouched. Every request carries a timeout so a stalled runtime
//! cannot pin a request handler indefinitely; nothing is retried.

use crate::store::StudentRecord;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced while asking the provider for a summary.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// The provider did not answer within the configured timeout.
    #[error("Ollama API timed out after {0:?}")]
    Timeout(Duration),
    /// The request could not be delivered or the reply could not be read.
    #[error("Failed to call Ollama API: {0}")]
    Transport(String),
    /// The provider answered with a non-success status.
    #[error("Ollama API returned error ({status}): {body}")]
    Status {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Raw response body, for diagnostics.
        body: String,
    },
    /// The reply body was not a valid generation response.
    #[error("Failed to decode Ollama API response: {0}")]
    Decode(String),
}

/// Outbound payload for the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model identifier understood by the provider.
    pub model: String,
    /// Full instruction prompt.
    pub prompt: String,
    /// Always `false`; the client reads one complete JSON reply.
    pub stream: bool,
}

impl GenerationRequest {
    /// Build the summary request for `record` against `model`.
    pub fn for_student(model: impl Into<String>, record: &StudentRecord) -> Self {
        Self {
            model: model.into(),
            prompt: build_prompt(record),
            stream: false,
        }
    }
}

/// Reply body of the generation endpoint; unknown fields such as `done` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationResponse {
    /// Generated text.
    pub response: String,
}

/// Compose the instruction prompt for a single student.
pub fn build_prompt(record: &StudentRecord) -> String {
    format!(
        "Summarize the student with name={}, age={}, email={} in no more than 3 short sentences \
         about the student. Do not start with phrases like \"Here is a summary of\" and do not \
         use any formatting.",
        record.name, record.age, record.email
    )
}

/// Interface implemented by summary providers.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Send `request` to the provider and return the generated text verbatim.
    async fn generate_summary(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, SummarizationClientError>;
}

/// Summary client talking to an Ollama-compatible `/api/generate` endpoint.
pub struct OllamaSummarizationClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl OllamaSummarizationClient {
    /// Build a client for the runtime at `base_url` with a per-request `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SummarizationClientError> {
        let http = Client::builder()
            .user_agent("rusty-roster/summary")
            .timeout(timeout)
            .build()
            .map_err(|error| {
                SummarizationClientError::Transport(format!("failed to build HTTP client: {error}"))
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }

    fn classify(&self, error: reqwest::Error) -> SummarizationClientError {
        if error.is_timeout() {
            SummarizationClientError::Timeout(self.timeout)
        } else {
            SummarizationClientError::Transport(format!(
                "failed to reach Ollama at {}: {error}",
                self.base_url
            ))
        }
    }
}

#[async_trait]
impl SummarizationClient for OllamaSummarizationClient {
    async fn generate_summary(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, SummarizationClientError> {
        tracing::debug!(model = %request.model, endpoint = %self.endpoint(), "Requesting summary");

        let response = self
            .http
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|error| self.classify(error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|error| self.classify(error))?;
        let body: GenerationResponse = serde_json::from_slice(&bytes)
            .map_err(|error| SummarizationClientError::Decode(error.to_string()))?;

        Ok(body.response)
    }
}
