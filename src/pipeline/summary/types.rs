use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Findings
// ──────────────────────────────────────────────

/// Four-level severity attached to checker findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
    Critical,
}

impl ValidationLevel {
    /// Map the model's textual severity onto a level.
    ///
    /// `low` → warning, `medium`/`high` → error, anything else → critical.
    pub fn from_model_severity(severity: &str) -> Self {
        match severity.trim().to_ascii_lowercase().as_str() {
            "low" => ValidationLevel::Warning,
            "medium" | "high" => ValidationLevel::Error,
            _ => ValidationLevel::Critical,
        }
    }
}

/// Category tag of a finding.
///
/// Known tags get their own variant; anything else the model emits is kept
/// verbatim in `Other`. `CheckFailed` is never parsed from a tag: only
/// [`ValidationFinding::check_failed`] creates it, so a model that reports
/// its own issue as `validation_error` still gets scored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FindingCategory {
    SymptomMismatch,
    ValueError,
    DiagnosisInconsistency,
    TreatmentUnfounded,
    MissingSymptom,
    MissingVitalSign,
    MissingAllergy,
    MissingMedicalHistory,
    MissingFamilyHistory,
    MissingSocialHistory,
    /// The checker itself failed; the finding describes the failure.
    /// Serialized as `validation_error`.
    CheckFailed,
    Other(String),
}

impl FindingCategory {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "symptom_mismatch" => FindingCategory::SymptomMismatch,
            "value_error" => FindingCategory::ValueError,
            "diagnosis_inconsistency" => FindingCategory::DiagnosisInconsistency,
            "treatment_unfounded" => FindingCategory::TreatmentUnfounded,
            "symptom" => FindingCategory::MissingSymptom,
            "vital_sign" => FindingCategory::MissingVitalSign,
            "allergy" => FindingCategory::MissingAllergy,
            "medical_history" => FindingCategory::MissingMedicalHistory,
            "family_history" => FindingCategory::MissingFamilyHistory,
            "social_history" => FindingCategory::MissingSocialHistory,
            other => FindingCategory::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FindingCategory::SymptomMismatch => "symptom_mismatch",
            FindingCategory::ValueError => "value_error",
            FindingCategory::DiagnosisInconsistency => "diagnosis_inconsistency",
            FindingCategory::TreatmentUnfounded => "treatment_unfounded",
            FindingCategory::MissingSymptom => "symptom",
            FindingCategory::MissingVitalSign => "vital_sign",
            FindingCategory::MissingAllergy => "allergy",
            FindingCategory::MissingMedicalHistory => "medical_history",
            FindingCategory::MissingFamilyHistory => "family_history",
            FindingCategory::MissingSocialHistory => "social_history",
            FindingCategory::CheckFailed => "validation_error",
            FindingCategory::Other(tag) => tag,
        }
    }
}

impl From<String> for FindingCategory {
    fn from(tag: String) -> Self {
        FindingCategory::from_tag(&tag)
    }
}

impl From<FindingCategory> for String {
    fn from(category: FindingCategory) -> Self {
        category.as_str().to_string()
    }
}

/// One observation produced by the consistency or missing-info checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFinding {
    pub level: ValidationLevel,
    pub message: String,
    pub category: FindingCategory,
    pub suggestion: Option<String>,
}

impl ValidationFinding {
    /// Finding recorded when a checker could not complete.
    pub fn check_failed(message: String) -> Self {
        Self {
            level: ValidationLevel::Error,
            message,
            category: FindingCategory::CheckFailed,
            suggestion: None,
        }
    }

    /// Whether this finding reports a checker failure rather than a
    /// problem in the summary itself.
    pub fn is_check_failure(&self) -> bool {
        self.category == FindingCategory::CheckFailed
    }
}

// ──────────────────────────────────────────────
// Highlights
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightCategory {
    VitalSigns,
    LabValues,
    Medications,
    Symptoms,
    Diagnosis,
    Treatment,
}

/// Key information located by the highlight checker.
///
/// Offsets are character offsets into the exact summary that was checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightSpan {
    pub text: String,
    pub start_pos: usize,
    pub end_pos: usize,
    pub category: HighlightCategory,
    /// Clamped to [0, 1].
    pub confidence: f32,
    pub importance: String,
}

// ──────────────────────────────────────────────
// Anomalies
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySeverity {
    Medium,
    High,
}

/// An out-of-range vital sign or lab value found in the summary text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFinding {
    /// The number(s) exactly as written, e.g. `"160"` or `"190/100"`.
    pub value: String,
    pub normal_range: String,
    pub severity: AnomalySeverity,
    pub suggestion: String,
    /// Character span `[start, end)` of the whole match.
    pub position: (usize, usize),
}

// ──────────────────────────────────────────────
// Report
// ──────────────────────────────────────────────

/// Result of one validation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub fact_consistency: Vec<ValidationFinding>,
    pub highlights: Vec<HighlightSpan>,
    pub missing_alerts: Vec<ValidationFinding>,
    pub anomalies: Vec<AnomalyFinding>,
    /// 0–100.
    pub overall_score: u8,
}

// ──────────────────────────────────────────────
// Modification proposals
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalKind {
    Replace,
    Highlight,
    Remove,
}

impl ProposalKind {
    /// Unknown kinds degrade to `Highlight`, which never mutates text.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "replace" => ProposalKind::Replace,
            "remove" => ProposalKind::Remove,
            _ => ProposalKind::Highlight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ProposalSeverity {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "low" => ProposalSeverity::Low,
            "high" => ProposalSeverity::High,
            "critical" => ProposalSeverity::Critical,
            _ => ProposalSeverity::Medium,
        }
    }
}

impl From<AnomalySeverity> for ProposalSeverity {
    fn from(severity: AnomalySeverity) -> Self {
        match severity {
            AnomalySeverity::Medium => ProposalSeverity::Medium,
            AnomalySeverity::High => ProposalSeverity::High,
        }
    }
}

/// A suggested edit to a summary. Not applied until it passes the patcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationProposal {
    #[serde(rename = "type")]
    pub kind: ProposalKind,
    pub title: String,
    pub description: String,
    pub original_text: String,
    pub correct_text: String,
    pub reason: String,
    pub severity: ProposalSeverity,
    pub category: String,
    /// Optional explicit character span of `original_text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

/// Everything the smart-modify flow hands back to its caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartModifyOutcome {
    pub original_summary: String,
    pub patched_summary: String,
    pub modifications: Vec<ModificationProposal>,
    pub validation_result: QualityReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_mapping() {
        assert_eq!(ValidationLevel::from_model_severity("low"), ValidationLevel::Warning);
        assert_eq!(ValidationLevel::from_model_severity("medium"), ValidationLevel::Error);
        assert_eq!(ValidationLevel::from_model_severity("high"), ValidationLevel::Error);
        assert_eq!(ValidationLevel::from_model_severity("critical"), ValidationLevel::Critical);
        assert_eq!(ValidationLevel::from_model_severity("severe"), ValidationLevel::Critical);
        assert_eq!(ValidationLevel::from_model_severity(""), ValidationLevel::Critical);
    }

    #[test]
    fn finding_category_round_trips_known_and_unknown_tags() {
        assert_eq!(FindingCategory::from_tag("value_error"), FindingCategory::ValueError);
        assert_eq!(FindingCategory::from_tag("vital_sign"), FindingCategory::MissingVitalSign);
        assert_eq!(
            FindingCategory::from_tag("dosage_error"),
            FindingCategory::Other("dosage_error".into())
        );
        assert_eq!(FindingCategory::Other("dosage_error".into()).as_str(), "dosage_error");
    }

    #[test]
    fn model_supplied_validation_error_tag_is_not_a_check_failure() {
        let category = FindingCategory::from_tag("validation_error");
        assert_eq!(category, FindingCategory::Other("validation_error".into()));

        let finding = ValidationFinding {
            level: ValidationLevel::Critical,
            message: "摘要與逐字稿不符".into(),
            category,
            suggestion: None,
        };
        assert!(!finding.is_check_failure());
    }

    #[test]
    fn finding_serializes_category_as_plain_tag() {
        let finding = ValidationFinding::check_failed("boom".into());
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["category"], "validation_error");
        assert_eq!(json["level"], "error");
        assert!(finding.is_check_failure());
    }

    #[test]
    fn proposal_serializes_kind_as_type() {
        let proposal = ModificationProposal {
            kind: ProposalKind::Replace,
            title: "t".into(),
            description: String::new(),
            original_text: "a".into(),
            correct_text: "b".into(),
            reason: String::new(),
            severity: ProposalSeverity::High,
            category: "fact_error".into(),
            start: None,
            end: None,
        };
        let json = serde_json::to_value(&proposal).unwrap();
        assert_eq!(json["type"], "replace");
        assert_eq!(json["severity"], "high");
        assert!(json.get("start").is_none());
    }

    #[test]
    fn unknown_proposal_tags_degrade_safely() {
        assert_eq!(ProposalKind::from_tag("rewrite"), ProposalKind::Highlight);
        assert_eq!(ProposalSeverity::from_tag("urgent"), ProposalSeverity::Medium);
    }

    #[test]
    fn anomaly_position_serializes_as_pair() {
        let anomaly = AnomalyFinding {
            value: "160".into(),
            normal_range: "60-100".into(),
            severity: AnomalySeverity::High,
            suggestion: String::new(),
            position: (3, 9),
        };
        let json = serde_json::to_value(&anomaly).unwrap();
        assert_eq!(json["position"], serde_json::json!([3, 9]));
        assert_eq!(json["severity"], "high");
    }
}
