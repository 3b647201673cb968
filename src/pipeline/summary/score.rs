use super::types::{AnomalyFinding, AnomalySeverity, ValidationFinding, ValidationLevel};

/// Deterministic 0–100 quality score.
///
/// Deductions per finding:
/// - consistency: critical 20, error 10, warning 5
/// - missing info: critical 15, error 8, warning 3
/// - anomaly: high 12, medium 6
///
/// Findings recording a checker's own failure carry no deduction.
pub fn compute_score(
    consistency: &[ValidationFinding],
    missing: &[ValidationFinding],
    anomalies: &[AnomalyFinding],
) -> u8 {
    let consistency_penalty: u32 = consistency
        .iter()
        .filter(|f| !f.is_check_failure())
        .map(|f| match f.level {
            ValidationLevel::Critical => 20,
            ValidationLevel::Error => 10,
            ValidationLevel::Warning => 5,
            ValidationLevel::Info => 0,
        })
        .sum();

    let missing_penalty: u32 = missing
        .iter()
        .filter(|f| !f.is_check_failure())
        .map(|f| match f.level {
            ValidationLevel::Critical => 15,
            ValidationLevel::Error => 8,
            ValidationLevel::Warning => 3,
            ValidationLevel::Info => 0,
        })
        .sum();

    let anomaly_penalty: u32 = anomalies
        .iter()
        .map(|a| match a.severity {
            AnomalySeverity::High => 12,
            AnomalySeverity::Medium => 6,
        })
        .sum();

    let total = consistency_penalty
        .saturating_add(missing_penalty)
        .saturating_add(anomaly_penalty);
    100u32.saturating_sub(total) as u8
}
