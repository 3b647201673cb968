//! Validation aggregator: scanner plus the three checkers, run concurrently.

use std::future::Future;
use std::sync::Arc;

use tokio::task::{JoinError, JoinHandle};

use super::anomaly::scan_anomalies;
use super::checks::{check_consistency, check_missing_info, extract_highlights};
use super::score::compute_score;
use super::types::{AnomalyFinding, HighlightSpan, QualityReport, ValidationFinding};
use super::SummaryError;
use crate::pipeline::llm::LlmClient;

/// Join handle that aborts its task when dropped, so a cancelled request
/// does not leave checker calls running.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> AbortOnDrop<T> {
    fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        Self(tokio::spawn(future))
    }

    async fn join(mut self) -> Result<T, JoinError> {
        (&mut self.0).await
    }
}

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Validate `summary` against `transcript`.
///
/// Sub-tasks that panic or are cancelled contribute nothing. Only when all
/// four fail does the call return `ValidationFailed`.
pub async fn validate_summary(
    llm: Arc<dyn LlmClient>,
    transcript: &str,
    summary: &str,
) -> Result<QualityReport, SummaryError> {
    let transcript: Arc<str> = Arc::from(transcript);
    let summary: Arc<str> = Arc::from(summary);

    let consistency = {
        let (llm, t, s) = (llm.clone(), transcript.clone(), summary.clone());
        AbortOnDrop::spawn(async move { check_consistency(llm.as_ref(), &t, &s).await })
    };
    let highlights = {
        let (llm, s) = (llm.clone(), summary.clone());
        AbortOnDrop::spawn(async move { extract_highlights(llm.as_ref(), &s).await })
    };
    let missing = {
        let (llm, t, s) = (llm.clone(), transcript.clone(), summary.clone());
        AbortOnDrop::spawn(async move { check_missing_info(llm.as_ref(), &t, &s).await })
    };
    let anomalies = {
        let s = summary.clone();
        AbortOnDrop::spawn(async move { scan_anomalies(&s) })
    };

    let (consistency, highlights, missing, anomalies) = tokio::join!(
        consistency.join(),
        highlights.join(),
        missing.join(),
        anomalies.join(),
    );

    assemble_report(
        task_output("consistency", consistency),
        task_output("highlights", highlights),
        task_output("missing_info", missing),
        task_output("anomalies", anomalies),
    )
}

fn task_output<T>(task: &'static str, result: Result<T, JoinError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(
                task,
                panicked = e.is_panic(),
                cancelled = e.is_cancelled(),
                "Validation sub-task did not complete"
            );
            None
        }
    }
}

/// Combine sub-task outputs into a report; a missing output counts as empty.
pub fn assemble_report(
    consistency: Option<Vec<ValidationFinding>>,
    highlights: Option<Vec<HighlightSpan>>,
    missing: Option<Vec<ValidationFinding>>,
    anomalies: Option<Vec<AnomalyFinding>>,
) -> Result<QualityReport, SummaryError> {
    if consistency.is_none() && highlights.is_none() && missing.is_none() && anomalies.is_none() {
        return Err(SummaryError::ValidationFailed(
            "All validation tasks failed".into(),
        ));
    }

    let fact_consistency = consistency.unwrap_or_default();
    let missing_alerts = missing.unwrap_or_default();
    let anomalies = anomalies.unwrap_or_default();
    let overall_score = compute_score(&fact_consistency, &missing_alerts, &anomalies);

    tracing::info!(
        consistency_count = fact_consistency.len(),
        missing_count = missing_alerts.len(),
        anomaly_count = anomalies.len(),
        overall_score,
        "Summary validated"
    );

    Ok(QualityReport {
        fact_consistency,
        highlights: highlights.unwrap_or_default(),
        missing_alerts,
        anomalies,
        overall_score,
    })
}
