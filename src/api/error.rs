//! JSON error responses for the HTTP API.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::summary::SummaryError;

/// Seconds a client is told to wait after the provider quota is exhausted.
pub const QUOTA_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Model quota exhausted, retry after {retry_after}s")]
    RateLimited { retry_after: u64 },
    #[error("Upstream AI service error: {0}")]
    Upstream(String),
    #[error("Internal failure: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::Upstream(_) => "UPSTREAM",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Message shown to the client. Upstream and internal details stay in
    /// the log since they can echo provider bodies.
    fn client_message(&self) -> String {
        match self {
            Self::BadRequest(detail) => detail.clone(),
            Self::RateLimited { .. } => self.to_string(),
            Self::Upstream(detail) => {
                tracing::warn!(detail, "Upstream AI service failed");
                "The AI service could not complete the request".to_string()
            }
            Self::Internal(detail) => {
                tracing::error!(detail, "Request failed internally");
                "An internal error occurred".to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code(),
                message: self.client_message(),
            },
        };
        let mut response = (self.status(), Json(body)).into_response();

        if let Self::RateLimited { retry_after } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
        }
        response
    }
}

impl From<SummaryError> for ApiError {
    fn from(err: SummaryError) -> Self {
        if err.is_quota() {
            return Self::RateLimited {
                retry_after: QUOTA_RETRY_AFTER_SECS,
            };
        }
        match err {
            SummaryError::EmptyTranscript => Self::BadRequest(err.to_string()),
            SummaryError::ValidationFailed(detail) => Self::Internal(detail),
            other => Self::Upstream(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn into_parts(err: ApiError) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), 4096).await.unwrap();
        (status, headers, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn bad_request_echoes_detail() {
        let (status, _, json) = into_parts(ApiError::BadRequest("summary must not be empty".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert_eq!(json["error"]["message"], "summary must not be empty");
    }

    #[tokio::test]
    async fn quota_sets_retry_after_header() {
        let (status, headers, json) = into_parts(ApiError::RateLimited { retry_after: 60 }).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(headers.get(header::RETRY_AFTER).unwrap(), "60");
        assert_eq!(json["error"]["code"], "RATE_LIMITED");
    }

    #[tokio::test]
    async fn upstream_hides_provider_body() {
        let (status, _, json) = into_parts(ApiError::Upstream("status 500: secret body".into())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "UPSTREAM");
        assert!(!json["error"]["message"].as_str().unwrap().contains("secret"));
    }

    #[tokio::test]
    async fn internal_hides_detail() {
        let (status, headers, json) = into_parts(ApiError::Internal("all checkers failed".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(headers.get(header::RETRY_AFTER).is_none());
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[test]
    fn summary_errors_map_to_api_errors() {
        assert!(matches!(
            ApiError::from(SummaryError::QuotaExceeded("x".into())),
            ApiError::RateLimited { retry_after: QUOTA_RETRY_AFTER_SECS }
        ));
        assert!(matches!(
            ApiError::from(SummaryError::LlmStatus { status: 429, body: String::new() }),
            ApiError::RateLimited { .. }
        ));
        assert!(matches!(
            ApiError::from(SummaryError::EmptyTranscript),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(SummaryError::ValidationFailed("all failed".into())),
            ApiError::Internal(_)
        ));
        assert!(matches!(
            ApiError::from(SummaryError::LlmConnection("http://localhost:11434".into())),
            ApiError::Upstream(_)
        ));
    }
}
