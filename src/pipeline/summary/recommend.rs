use serde::{Deserialize, Serialize};

use super::types::QualityReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    FactConsistency,
    MissingInformation,
    AnomalousValues,
    OverallQuality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPriority {
    Medium,
    High,
    Critical,
}

/// Reviewer action item derived from a quality report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: RecommendationPriority,
    pub title: String,
    pub description: String,
    pub actions: Vec<String>,
}

fn actions(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Mechanical action items for `report`. Checker-failure findings are not
/// counted as problems with the summary.
pub fn recommendations_for(report: &QualityReport) -> Vec<Recommendation> {
    let mut out = Vec::new();

    let fact_count = report
        .fact_consistency
        .iter()
        .filter(|f| !f.is_check_failure())
        .count();
    if fact_count > 0 {
        out.push(Recommendation {
            kind: RecommendationKind::FactConsistency,
            priority: RecommendationPriority::High,
            title: "事實一致性問題".into(),
            description: format!("發現 {fact_count} 個事實一致性問題，建議重新檢查摘要內容"),
            actions: actions(&["檢查症狀描述是否準確", "確認數值是否正確", "驗證診斷建議的合理性"]),
        });
    }

    let missing_count = report
        .missing_alerts
        .iter()
        .filter(|f| !f.is_check_failure())
        .count();
    if missing_count > 0 {
        out.push(Recommendation {
            kind: RecommendationKind::MissingInformation,
            priority: RecommendationPriority::Medium,
            title: "資訊遺漏提醒".into(),
            description: format!("可能遺漏 {missing_count} 項重要資訊"),
            actions: actions(&["檢查是否包含所有重要症狀", "確認生命徵象完整性", "補充必要的病史資訊"]),
        });
    }

    if !report.anomalies.is_empty() {
        out.push(Recommendation {
            kind: RecommendationKind::AnomalousValues,
            priority: RecommendationPriority::High,
            title: "異常數值檢測".into(),
            description: format!("發現 {} 個異常數值", report.anomalies.len()),
            actions: actions(&["重新確認數值準確性", "檢查測量單位", "考慮是否需要重新測量"]),
        });
    }

    let score = report.overall_score;
    if score < 70 {
        out.push(Recommendation {
            kind: RecommendationKind::OverallQuality,
            priority: RecommendationPriority::Critical,
            title: "摘要品質需要改善".into(),
            description: format!("整體品質分數為 {score}，建議大幅修改摘要內容"),
            actions: actions(&["重新生成摘要", "手動檢查所有內容", "尋求同事協助審核"]),
        });
    } else if score < 85 {
        out.push(Recommendation {
            kind: RecommendationKind::OverallQuality,
            priority: RecommendationPriority::Medium,
            title: "摘要品質可進一步提升".into(),
            description: format!("整體品質分數為 {score}，建議進行小幅調整"),
            actions: actions(&["檢查標記的問題", "補充遺漏資訊", "確認異常數值"]),
        });
    }

    out
}
