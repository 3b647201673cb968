//! Visit-summary quality control.
//!
//! Normalizes LLM-generated visit summaries into the canonical Markdown
//! layout, validates them against the source transcript (three LLM checkers
//! plus a deterministic numeric scanner), proposes corrections, and applies
//! the safe subset of those corrections without touching structural lines.

pub mod anomaly;
pub mod checks;
pub mod markdown;
pub mod orchestrator;
pub mod patch;
pub mod prompt;
pub mod propose;
pub mod recommend;
pub mod response;
pub mod score;
pub mod spans;
pub mod types;
pub mod validate;

pub use anomaly::scan_anomalies;
pub use markdown::normalize_summary_markdown;
pub use orchestrator::SummaryValidator;
pub use patch::apply_inline_replacements;
pub use propose::propose_modifications;
pub use recommend::recommendations_for;
pub use score::compute_score;
pub use types::*;
pub use validate::validate_summary;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("LLM service is not reachable at {0}")]
    LlmConnection(String),

    #[error("LLM service returned error (status {status}): {body}")]
    LlmStatus { status: u16, body: String },

    #[error("LLM quota exhausted: {0}")]
    QuotaExceeded(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Summary validation failed: {0}")]
    ValidationFailed(String),

    #[error("Transcript is empty")]
    EmptyTranscript,
}

impl SummaryError {
    /// Whether the provider rejected the call for quota / rate-limit reasons.
    ///
    /// Only these failures are worth waiting out; everything else is
    /// returned to the caller immediately.
    pub fn is_quota(&self) -> bool {
        match self {
            SummaryError::QuotaExceeded(_) => true,
            SummaryError::LlmStatus { status, body } => {
                *status == 429 || mentions_quota(body)
            }
            SummaryError::HttpClient(msg) => mentions_quota(msg),
            _ => false,
        }
    }
}

/// Provider error bodies that signal quota exhaustion without a 429 status.
pub(crate) fn mentions_quota(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("quota") || lower.contains("resource_exhausted") || lower.contains("429")
}
