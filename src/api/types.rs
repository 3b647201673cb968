//! Shared types for the HTTP API layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::pipeline::generation::RetryPolicy;
use crate::pipeline::llm::LlmClient;
use crate::pipeline::summary::recommend::Recommendation;
use crate::pipeline::summary::{QualityReport, SummaryValidator};

// ═══════════════════════════════════════════════════════════
// API context
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes. Cheap to clone.
#[derive(Clone)]
pub struct ApiContext {
    pub llm: Arc<dyn LlmClient>,
    pub validator: SummaryValidator,
    pub retry: RetryPolicy,
}

impl ApiContext {
    pub fn new(llm: Arc<dyn LlmClient>, retry: RetryPolicy) -> Self {
        Self {
            validator: SummaryValidator::new(llm.clone()),
            llm,
            retry,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Request / response bodies
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct SoapRequest {
    pub transcript: String,
}

/// Body of both validation endpoints.
#[derive(Debug, Deserialize)]
pub struct SummaryCheckRequest {
    pub transcript: String,
    pub summary: String,
}

impl SummaryCheckRequest {
    /// Reject blank inputs before any model call.
    pub fn ensure_not_blank(&self) -> Result<(), ApiError> {
        if self.transcript.trim().is_empty() {
            return Err(ApiError::BadRequest("transcript must not be empty".into()));
        }
        if self.summary.trim().is_empty() {
            return Err(ApiError::BadRequest("summary must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    #[serde(flatten)]
    pub report: QualityReport,
    pub recommendations: Vec<Recommendation>,
}
