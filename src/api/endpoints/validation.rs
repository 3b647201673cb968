//! Summary validation endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SummaryCheckRequest, ValidationResponse};
use crate::pipeline::summary::{recommendations_for, SmartModifyOutcome};

/// `POST /api/validation/validate-summary`
pub async fn validate_summary(
    State(ctx): State<ApiContext>,
    Json(req): Json<SummaryCheckRequest>,
) -> Result<Json<ValidationResponse>, ApiError> {
    req.ensure_not_blank()?;
    let report = ctx.validator.validate(&req.transcript, &req.summary).await?;
    let recommendations = recommendations_for(&report);
    Ok(Json(ValidationResponse {
        report,
        recommendations,
    }))
}

/// `POST /api/validation/smart-modify`
pub async fn smart_modify(
    State(ctx): State<ApiContext>,
    Json(req): Json<SummaryCheckRequest>,
) -> Result<Json<SmartModifyOutcome>, ApiError> {
    req.ensure_not_blank()?;
    let outcome = ctx
        .validator
        .smart_modify(&req.transcript, &req.summary)
        .await?;
    Ok(Json(outcome))
}

#[derive(Debug, Serialize)]
pub struct ValidationStats {
    pub ai_agent_status: &'static str,
    pub supported_validations: &'static [&'static str],
    pub validation_categories: &'static [&'static str],
}

const SUPPORTED_VALIDATIONS: &[&str] = &["事實一致性校驗", "關鍵資訊高亮", "潛在遺漏提醒", "異常數值標記"];

const VALIDATION_CATEGORIES: &[&str] = &[
    "symptom_mismatch",
    "value_error",
    "diagnosis_inconsistency",
    "treatment_unfounded",
    "vital_signs",
    "lab_values",
    "medications",
    "symptoms",
    "diagnosis",
    "treatment",
];

/// `GET /api/validation/validation-stats`: static capability listing.
pub async fn stats() -> Json<ValidationStats> {
    Json(ValidationStats {
        ai_agent_status: "active",
        supported_validations: SUPPORTED_VALIDATIONS,
        validation_categories: VALIDATION_CATEGORIES,
    })
}
