use std::sync::Arc;

use super::markdown::normalize_summary_markdown;
use super::patch::apply_inline_replacements;
use super::propose::propose_modifications;
use super::types::{QualityReport, SmartModifyOutcome};
use super::validate::validate_summary;
use super::SummaryError;
use crate::pipeline::llm::LlmClient;

/// Entry point for summary quality control, bound to one LLM client.
#[derive(Clone)]
pub struct SummaryValidator {
    llm: Arc<dyn LlmClient>,
}

impl SummaryValidator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Validate `summary` as given.
    pub async fn validate(&self, transcript: &str, summary: &str) -> Result<QualityReport, SummaryError> {
        validate_summary(self.llm.clone(), transcript, summary).await
    }

    /// Normalize, validate, propose and apply safe edits.
    ///
    /// Proposals and the validation report refer to the normalized summary,
    /// which is returned as `original_summary`. The patched text is
    /// normalized once more before it is returned.
    pub async fn smart_modify(
        &self,
        transcript: &str,
        summary: &str,
    ) -> Result<SmartModifyOutcome, SummaryError> {
        let normalized = normalize_summary_markdown(summary);
        let report = self.validate(transcript, &normalized).await?;
        let modifications =
            propose_modifications(self.llm.as_ref(), transcript, &normalized, &report).await;
        let patched = apply_inline_replacements(&normalized, &modifications);
        let patched_summary = normalize_summary_markdown(&patched);

        tracing::info!(
            summary_len = normalized.len(),
            patched_len = patched_summary.len(),
            modification_count = modifications.len(),
            changed = patched_summary != normalized,
            "Smart modify complete"
        );

        Ok(SmartModifyOutcome {
            original_summary: normalized,
            patched_summary,
            modifications,
            validation_result: report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::llm::{MockLlmClient, MockReply};
    use crate::pipeline::summary::markdown::SUMMARY_HEADING_LINE;
    use crate::pipeline::summary::types::ProposalKind;

    const EMPTY_CHECKS: &str = r#"{"issues": [], "missing_items": [], "highlights": []}"#;

    #[tokio::test]
    async fn smart_modify_normalizes_patches_and_keeps_structure() {
        let llm = MockLlmClient::new(EMPTY_CHECKS).on(
            "\"modifications\"",
            MockReply::text(
                r#"{"modifications": [
  {"type": "replace", "original_text": "三天", "correct_text": "兩天", "severity": "high", "category": "time_error"},
  {"type": "replace", "original_text": "看診原因", "correct_text": "原因"},
  {"type": "highlight", "original_text": "多喝水"}
]}"#,
            ),
        );
        let validator = SummaryValidator::new(Arc::new(llm));

        let outcome = validator
            .smart_modify("喉嚨痛兩天", "看診原因\n喉嚨痛三天\n治療計畫\n多喝水")
            .await
            .unwrap();

        assert_eq!(
            outcome.original_summary,
            "## 看診重點摘要\n\n**看診原因**\n\n喉嚨痛三天\n\n**治療計畫**\n\n多喝水"
        );
        assert_eq!(
            outcome.patched_summary,
            "## 看診重點摘要\n\n**看診原因**\n\n喉嚨痛兩天\n\n**治療計畫**\n\n多喝水"
        );
        assert_eq!(outcome.modifications.len(), 3);
        assert_eq!(outcome.validation_result.overall_score, 100);
    }

    #[tokio::test]
    async fn smart_modify_with_llm_down_uses_fallback_and_leaves_text() {
        let validator = SummaryValidator::new(Arc::new(MockLlmClient::failing("offline")));
        let outcome = validator
            .smart_modify("心跳很快", "**看診原因**\n心率：160")
            .await
            .unwrap();

        assert!(outcome.patched_summary.starts_with(SUMMARY_HEADING_LINE));
        assert_eq!(outcome.patched_summary, outcome.original_summary);
        assert_eq!(outcome.modifications.len(), 1);
        assert_eq!(outcome.modifications[0].kind, ProposalKind::Highlight);
        assert_eq!(outcome.modifications[0].category, "value_error");
        assert_eq!(outcome.validation_result.overall_score, 88);
    }

    #[tokio::test]
    async fn validate_passes_summary_through_unchanged() {
        let llm = Arc::new(MockLlmClient::new(EMPTY_CHECKS));
        let validator = SummaryValidator::new(llm.clone());
        let report = validator.validate("T", "plain text").await.unwrap();
        assert_eq!(report.overall_score, 100);
        assert!(llm.prompts().iter().all(|p| !p.contains(SUMMARY_HEADING_LINE)));
    }
}
