//! HTTP API router.
//!
//! Routes are nested under `/api/`. Every route passes through the audit
//! logger; CORS is the outermost layer so preflight requests are answered
//! before routing.

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the API router with CORS restricted to `cors_origins`.
pub fn api_router(ctx: ApiContext, cors_origins: &[String]) -> Router {
    let validation = Router::new()
        .route(
            "/validate-summary",
            post(endpoints::validation::validate_summary),
        )
        .route("/smart-modify", post(endpoints::validation::smart_modify))
        .route("/validation-stats", get(endpoints::validation::stats));

    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/summarize", post(endpoints::generation::summarize))
        .route("/soap-summary", post(endpoints::generation::soap_summary))
        .nest("/validation", validation)
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access));

    Router::new()
        .nest("/api", routes)
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .max_age(Duration::from_secs(3600))
}
