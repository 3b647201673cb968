//! Modification proposer: model-suggested edits with a rule-based fallback.

use serde_json::Value;

use super::markdown::is_structural_line;
use super::prompt::build_modification_prompt;
use super::response::{extract_json_list, optional_str, optional_usize};
use super::types::{
    ModificationProposal, ProposalKind, ProposalSeverity, QualityReport, ValidationLevel,
};
use super::SummaryError;
use crate::pipeline::llm::LlmClient;

/// Upper bound on proposals returned from one call.
pub const MAX_PROPOSALS: usize = 10;

/// Terms whose appearance in the summary but not the transcript suggests
/// invented content.
const HALLUCINATION_TERMS: [&str; 5] = ["診斷", "治療", "藥物", "手術", "檢查"];

/// Propose edits for `summary`. Never fails: a failed or empty model
/// answer falls back to [`fallback_proposals`].
pub async fn propose_modifications(
    llm: &dyn LlmClient,
    transcript: &str,
    summary: &str,
    report: &QualityReport,
) -> Vec<ModificationProposal> {
    let prompt = build_modification_prompt(transcript, summary);
    let result = match llm.generate(&prompt).await {
        Ok(response) => parse_proposals(&response),
        Err(e) => Err(e),
    };

    match result {
        Ok(proposals) if !proposals.is_empty() => {
            tracing::debug!(proposal_count = proposals.len(), "Model proposals parsed");
            proposals
        }
        Ok(_) => {
            tracing::debug!("Model proposed nothing, using rule-based proposals");
            fallback_proposals(transcript, summary, report)
        }
        Err(e) => {
            tracing::warn!(error = %e, backend = llm.name(), "Proposal generation failed, using rule-based proposals");
            fallback_proposals(transcript, summary, report)
        }
    }
}

/// Parse `{"modifications": [...]}` or a bare array, filling defaults for
/// missing fields. Non-object items are ignored.
fn parse_proposals(response: &str) -> Result<Vec<ModificationProposal>, SummaryError> {
    let items = extract_json_list(response, "modifications")?;
    Ok(items
        .iter()
        .filter(|item| item.is_object())
        .take(MAX_PROPOSALS)
        .map(proposal_from_item)
        .collect())
}

fn proposal_from_item(item: &Value) -> ModificationProposal {
    let text = |key: &str| optional_str(item, key).unwrap_or_default();
    ModificationProposal {
        kind: optional_str(item, "type")
            .map(|t| ProposalKind::from_tag(&t))
            .unwrap_or(ProposalKind::Highlight),
        title: optional_str(item, "title").unwrap_or_else(|| "錯誤檢測".to_string()),
        description: text("description"),
        original_text: text("original_text"),
        correct_text: text("correct_text"),
        reason: text("reason"),
        severity: optional_str(item, "severity")
            .map(|s| ProposalSeverity::from_tag(&s))
            .unwrap_or(ProposalSeverity::Medium),
        category: optional_str(item, "category").unwrap_or_else(|| "fact_error".to_string()),
        start: optional_usize(item, "start"),
        end: optional_usize(item, "end"),
    }
}

/// Rule-based proposals derived from the validation report and a plain
/// substring heuristic for invented content. All are `highlight` proposals.
pub fn fallback_proposals(
    transcript: &str,
    summary: &str,
    report: &QualityReport,
) -> Vec<ModificationProposal> {
    let mut proposals = Vec::new();

    for finding in &report.fact_consistency {
        if finding.is_check_failure()
            || !matches!(finding.level, ValidationLevel::Error | ValidationLevel::Critical)
        {
            continue;
        }
        proposals.push(ModificationProposal {
            kind: ProposalKind::Highlight,
            title: "事實不一致".to_string(),
            description: format!("摘要中的內容與逐字稿不符：{}", finding.message),
            original_text: String::new(),
            correct_text: finding
                .suggestion
                .clone()
                .unwrap_or_else(|| "請對照逐字稿確認內容".to_string()),
            reason: "摘要內容與原始逐字稿不一致".to_string(),
            severity: if finding.level == ValidationLevel::Critical {
                ProposalSeverity::High
            } else {
                ProposalSeverity::Medium
            },
            category: "fact_error".to_string(),
            start: None,
            end: None,
        });
    }

    for anomaly in &report.anomalies {
        proposals.push(ModificationProposal {
            kind: ProposalKind::Highlight,
            title: "數值異常".to_string(),
            description: format!(
                "數值 {} 可能異常，正常範圍：{}",
                anomaly.value, anomaly.normal_range
            ),
            original_text: anomaly.value.clone(),
            correct_text: format!("請確認數值是否正確（正常範圍：{}）", anomaly.normal_range),
            reason: "數值超出正常範圍，需要確認".to_string(),
            severity: anomaly.severity.into(),
            category: "value_error".to_string(),
            start: None,
            end: None,
        });
    }

    for sentence in summary.split(['。', '\n']) {
        let sentence = sentence.trim();
        if sentence.is_empty() || is_structural_line(sentence) {
            continue;
        }
        let Some(term) = HALLUCINATION_TERMS
            .iter()
            .find(|term| sentence.contains(**term) && !transcript.contains(**term))
        else {
            continue;
        };
        proposals.push(ModificationProposal {
            kind: ProposalKind::Highlight,
            title: "可能的幻覺內容".to_string(),
            description: format!("摘要中提到「{term}」但逐字稿中未提及"),
            original_text: sentence.to_string(),
            correct_text: "請確認此內容是否在逐字稿中出現".to_string(),
            reason: "摘要中的內容在逐字稿中找不到對應".to_string(),
            severity: ProposalSeverity::High,
            category: "hallucination".to_string(),
            start: None,
            end: None,
        });
    }

    proposals.truncate(MAX_PROPOSALS);
    proposals
}
