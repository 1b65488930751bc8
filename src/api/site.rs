//! Site status endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::middleware::AppState;
use crate::api::responses::ApiResponse;

/// Health check payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: &'static str,
    pub timestamp: String,
}

/// `GET /api/v1/health`
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok",
        backend: state.driver.as_str(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
