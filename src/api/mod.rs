//! HTTP API.
//!
//! Exposes visit-summary generation and validation as JSON endpoints
//! under `/api/`. Every request passes through the audit logger.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ApiSession};
pub use types::ApiContext;
