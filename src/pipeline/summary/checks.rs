//! LLM-backed summary checkers.
//!
//! Each checker is one model round trip. Failures are absorbed here: the two
//! finding checkers report a single `validation_error` finding, the
//! highlight checker reports nothing.

use serde::Deserialize;
use serde_json::Value;

use super::prompt::{build_consistency_prompt, build_highlight_prompt, build_missing_info_prompt};
use super::response::{extract_json_object, list_field, optional_str, parse_array_lenient, required_str};
use super::types::{FindingCategory, HighlightCategory, HighlightSpan, ValidationFinding, ValidationLevel};
use super::SummaryError;
use crate::pipeline::llm::LlmClient;

/// Fact-consistency findings between transcript and summary.
pub async fn check_consistency(
    llm: &dyn LlmClient,
    transcript: &str,
    summary: &str,
) -> Vec<ValidationFinding> {
    let prompt = build_consistency_prompt(transcript, summary);
    let result = match llm.generate(&prompt).await {
        Ok(response) => parse_findings(&response, "issues", ""),
        Err(e) => Err(e),
    };
    match result {
        Ok(findings) => {
            tracing::debug!(finding_count = findings.len(), "Consistency check complete");
            findings
        }
        Err(e) => {
            tracing::warn!(error = %e, backend = llm.name(), "Consistency check failed");
            vec![ValidationFinding::check_failed(format!("事實一致性校驗失敗: {e}"))]
        }
    }
}

/// Information present in the transcript but absent from the summary.
pub async fn check_missing_info(
    llm: &dyn LlmClient,
    transcript: &str,
    summary: &str,
) -> Vec<ValidationFinding> {
    let prompt = build_missing_info_prompt(transcript, summary);
    let result = match llm.generate(&prompt).await {
        Ok(response) => parse_findings(&response, "missing_items", "可能遺漏: "),
        Err(e) => Err(e),
    };
    match result {
        Ok(findings) => {
            tracing::debug!(finding_count = findings.len(), "Missing-info check complete");
            findings
        }
        Err(e) => {
            tracing::warn!(error = %e, backend = llm.name(), "Missing-info check failed");
            vec![ValidationFinding::check_failed(format!("遺漏資訊檢測失敗: {e}"))]
        }
    }
}

/// Key information spans in the summary. Empty on any failure.
pub async fn extract_highlights(llm: &dyn LlmClient, summary: &str) -> Vec<HighlightSpan> {
    let prompt = build_highlight_prompt(summary);
    let result = match llm.generate(&prompt).await {
        Ok(response) => parse_highlights(&response),
        Err(e) => Err(e),
    };
    match result {
        Ok(spans) => {
            tracing::debug!(highlight_count = spans.len(), "Highlight extraction complete");
            spans
        }
        Err(e) => {
            tracing::warn!(error = %e, backend = llm.name(), "Highlight extraction failed");
            Vec::new()
        }
    }
}

/// Parse `{key: [{type, severity, description, suggestion}]}`.
///
/// Any item missing `type`, `severity` or `description` fails the whole
/// response.
fn parse_findings(
    response: &str,
    key: &str,
    message_prefix: &str,
) -> Result<Vec<ValidationFinding>, SummaryError> {
    let value = extract_json_object(response)?;
    let items = list_field(&value, key)?;
    items
        .iter()
        .map(|item| finding_from_item(item, message_prefix))
        .collect()
}

fn finding_from_item(item: &Value, message_prefix: &str) -> Result<ValidationFinding, SummaryError> {
    let category = required_str(item, "type")?;
    let severity = required_str(item, "severity")?;
    let description = required_str(item, "description")?;
    Ok(ValidationFinding {
        level: ValidationLevel::from_model_severity(severity),
        message: format!("{message_prefix}{description}"),
        category: FindingCategory::from_tag(category),
        suggestion: optional_str(item, "suggestion"),
    })
}

#[derive(Deserialize)]
struct RawHighlight {
    text: String,
    start_pos: usize,
    end_pos: usize,
    category: HighlightCategory,
    confidence: f32,
    #[serde(default)]
    importance: String,
}

fn parse_highlights(response: &str) -> Result<Vec<HighlightSpan>, SummaryError> {
    let value = extract_json_object(response)?;
    let items = list_field(&value, "highlights")?;
    Ok(parse_array_lenient::<RawHighlight>(&items)
        .into_iter()
        .map(|raw| HighlightSpan {
            text: raw.text,
            start_pos: raw.start_pos,
            end_pos: raw.end_pos,
            category: raw.category,
            confidence: if raw.confidence.is_nan() { 0.0 } else { raw.confidence.clamp(0.0, 1.0) },
            importance: raw.importance,
        })
        .collect())
}
