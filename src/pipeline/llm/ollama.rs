use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{map_transport_error, status_error, LlmClient};
use crate::pipeline::summary::SummaryError;

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a client pointing at an Ollama instance.
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, SummaryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SummaryError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs: timeout.as_secs(),
        })
    }

    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(self.generate_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| map_transport_error(e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), body));
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| SummaryError::ResponseParsing(e.to_string()))?;

        tracing::debug!(
            model = %self.model,
            response_len = parsed.response.len(),
            "Ollama generation complete"
        );
        Ok(parsed.response)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
