//! Transcript generation endpoints: visit summary and SOAP note.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SoapRequest, SummarizeRequest, SummarizeResponse};
use crate::pipeline::generation::{generate_soap_note, generate_visit_summary, SoapNote};

/// `POST /api/summarize`: patient-facing visit summary.
pub async fn summarize(
    State(ctx): State<ApiContext>,
    Json(req): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let summary = generate_visit_summary(ctx.llm.as_ref(), &ctx.retry, &req.text).await?;
    Ok(Json(SummarizeResponse { summary }))
}

/// `POST /api/soap-summary`
pub async fn soap_summary(
    State(ctx): State<ApiContext>,
    Json(req): Json<SoapRequest>,
) -> Result<Json<SoapNote>, ApiError> {
    let note = generate_soap_note(ctx.llm.as_ref(), &ctx.retry, &req.transcript).await?;
    Ok(Json(note))
}
