//! Cache administration endpoints
//!
//! Stats, refresh, and clear operations over the content cache, all
//! behind the admin middleware.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::ApiResponse;
use crate::cache::{CacheBucket, CacheStatsSnapshot};

fn parse_bucket(name: &str) -> Result<CacheBucket, ApiError> {
    CacheBucket::from_str(name)
        .ok_or_else(|| ApiError::validation_error(format!("Unknown cache bucket: {}", name)))
}

/// `GET /api/v1/cache/stats` (admin)
pub async fn stats(State(state): State<AppState>) -> Json<ApiResponse<CacheStatsSnapshot>> {
    Json(ApiResponse::ok(state.cache.stats()))
}

/// `POST /api/v1/cache/refresh` (admin)
pub async fn refresh_all(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    state
        .cache
        .refresh_all()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(ApiResponse::ok(serde_json::json!({ "refreshed": "all" }))))
}

/// `POST /api/v1/cache/refresh/{bucket}` (admin)
pub async fn refresh_bucket(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let bucket = parse_bucket(&bucket)?;
    state
        .cache
        .refresh(bucket)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(ApiResponse::ok(
        serde_json::json!({ "refreshed": bucket.as_str() }),
    )))
}

/// `DELETE /api/v1/cache` (admin)
pub async fn clear_all(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    state
        .cache
        .clear_all()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(ApiResponse::ok(serde_json::json!({ "cleared": "all" }))))
}

/// `DELETE /api/v1/cache/{bucket}` (admin)
pub async fn clear_bucket(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let bucket = parse_bucket(&bucket)?;
    state
        .cache
        .clear(bucket)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(ApiResponse::ok(
        serde_json::json!({ "cleared": bucket.as_str() }),
    )))
}
