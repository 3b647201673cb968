use super::prompt::build_visit_summary_prompt;
use super::retry::RetryPolicy;
use crate::pipeline::llm::LlmClient;
use crate::pipeline::summary::{normalize_summary_markdown, SummaryError};

/// Generate a patient-facing visit summary in canonical Markdown.
pub async fn generate_visit_summary(
    llm: &dyn LlmClient,
    retry: &RetryPolicy,
    transcript: &str,
) -> Result<String, SummaryError> {
    if transcript.trim().is_empty() {
        return Err(SummaryError::EmptyTranscript);
    }

    let prompt = build_visit_summary_prompt(transcript);
    let raw = retry.run("visit_summary", || llm.generate(&prompt)).await?;
    let summary = normalize_summary_markdown(&raw).trim().to_string();

    tracing::info!(
        transcript_len = transcript.len(),
        summary_len = summary.len(),
        backend = llm.name(),
        "Visit summary generated"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::llm::{MockLlmClient, MockReply};
    use std::time::Duration;

    #[tokio::test]
    async fn output_is_normalized() {
        let mock = MockLlmClient::new("看診重點摘要\r\n看診原因\r\n喉嚨痛\r\n\r\n\r\n診斷結果：\r\n感冒\r\n");
        let summary = generate_visit_summary(&mock, &RetryPolicy::default(), "醫師：哪裡不舒服？")
            .await
            .unwrap();
        assert_eq!(
            summary,
            "## 看診重點摘要\n\n**看診原因**\n\n喉嚨痛\n\n**診斷結果**\n\n感冒"
        );
    }

    #[tokio::test]
    async fn empty_transcript_rejected_without_calling_model() {
        let mock = MockLlmClient::new("unused");
        let err = generate_visit_summary(&mock, &RetryPolicy::default(), "  \n ")
            .await
            .unwrap_err();
        assert!(matches!(err, SummaryError::EmptyTranscript));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn quota_failures_are_retried() {
        let mock = MockLlmClient::new("**看診原因**\n頭痛").with_queue(vec![MockReply::Quota]);
        let retry = RetryPolicy::with_unit(Duration::from_secs(1));
        let summary = generate_visit_summary(&mock, &retry, "頭痛").await.unwrap();
        assert!(summary.ends_with("頭痛"));
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn other_failures_surface() {
        let mock = MockLlmClient::failing("bad gateway");
        let err = generate_visit_summary(&mock, &RetryPolicy::default(), "頭痛")
            .await
            .unwrap_err();
        assert!(matches!(err, SummaryError::LlmStatus { .. }));
        assert_eq!(mock.call_count(), 1);
    }
}
