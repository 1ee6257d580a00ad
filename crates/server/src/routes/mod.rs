//! API route handlers
//!
//! - `health`: liveness and Prometheus metrics
//! - `appeal`: appeal strength assessment
//! - `extract`: fine-notice field extraction from an uploaded photo

pub mod appeal;
pub mod extract;
pub mod health;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Service name and available endpoints (GET /)
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Finecheck Server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/health",
            "/metrics",
            "/api/appeal-check",
            "/api/extract-fine"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
