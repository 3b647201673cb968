//! LLM provider layer.
//!
//! The rest of the crate sees the model as a black box: prompt string in,
//! free text out, fallible. One client is built at start-up and shared by
//! handle.

pub mod gemini;
pub mod mock;
pub mod ollama;

use std::sync::Arc;

use async_trait::async_trait;

pub use gemini::GeminiClient;
pub use mock::{MockLlmClient, MockReply};
pub use ollama::OllamaClient;

use crate::config::{LlmProvider, LlmSettings};
use crate::pipeline::summary::SummaryError;

/// Abstraction over LLM backends (allows mocking in tests).
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one non-streaming generation.
    async fn generate(&self, prompt: &str) -> Result<String, SummaryError>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

/// Build the configured backend.
pub fn client_from_settings(settings: &LlmSettings) -> Result<Arc<dyn LlmClient>, SummaryError> {
    let client: Arc<dyn LlmClient> = match settings.provider {
        LlmProvider::Ollama => Arc::new(OllamaClient::new(
            &settings.base_url,
            &settings.model,
            settings.timeout,
        )?),
        LlmProvider::Gemini => {
            let key = settings
                .api_key
                .as_deref()
                .ok_or_else(|| SummaryError::HttpClient("Gemini API key not configured".into()))?;
            Arc::new(GeminiClient::new(
                &settings.base_url,
                &settings.model,
                key,
                settings.timeout,
            )?)
        }
    };
    tracing::info!(
        provider = client.name(),
        model = %settings.model,
        timeout_secs = settings.timeout.as_secs(),
        "LLM client configured"
    );
    Ok(client)
}

/// Map a reqwest transport error onto the crate error type.
pub(crate) fn map_transport_error(e: reqwest::Error, base_url: &str, timeout_secs: u64) -> SummaryError {
    if e.is_connect() {
        SummaryError::LlmConnection(base_url.to_string())
    } else if e.is_timeout() {
        SummaryError::HttpClient(format!("Request timed out after {timeout_secs}s"))
    } else {
        SummaryError::HttpClient(e.to_string())
    }
}

/// Map a non-success HTTP status onto the crate error type. Quota
/// rejections get their own variant so the retry policy can see them.
pub(crate) fn status_error(status: u16, body: String) -> SummaryError {
    if status == 429 || crate::pipeline::summary::mentions_quota(&body) {
        SummaryError::QuotaExceeded(format!("status {status}"))
    } else {
        SummaryError::LlmStatus { status, body }
    }
}
