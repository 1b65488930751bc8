//! User preferences API endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::ApiResponse;
use crate::models::{Theme, UserPreferences};

/// Request body for the preferences upsert
#[derive(Debug, Deserialize)]
pub struct UpsertPreferencesRequest {
    pub user_id: String,
    pub theme: Theme,
}

/// `GET /api/v1/user_preferences/{user_id}`
///
/// A user without stored preferences answers with a null `data`;
/// clients fall back to the default theme.
pub async fn get_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserPreferences>>, ApiError> {
    match state.preferences_service.get(&user_id).await? {
        Some(prefs) => Ok(Json(ApiResponse::ok(prefs))),
        None => Ok(Json(ApiResponse::null())),
    }
}

/// `POST /api/v1/user_preferences`
///
/// Creates or updates the row for the user.
pub async fn upsert_preferences(
    State(state): State<AppState>,
    Json(body): Json<UpsertPreferencesRequest>,
) -> Result<Json<ApiResponse<UserPreferences>>, ApiError> {
    if body.user_id.trim().is_empty() {
        return Err(ApiError::validation_error("user_id cannot be empty"));
    }

    let prefs = state
        .preferences_service
        .set_theme(&body.user_id, body.theme)
        .await?;
    Ok(Json(ApiResponse::ok(prefs)))
}
