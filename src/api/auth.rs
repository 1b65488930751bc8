//! Admin authentication API endpoints

use axum::{
    extract::{Request, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{extract_session_token, ApiError, AppState};
use crate::api::responses::ApiResponse;

/// Request body for admin login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Response payload for a successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// `POST /api/v1/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let token = state.auth_service.login(&body.password).await?;
    Ok(Json(ApiResponse::ok(LoginResponse { token })))
}

/// `POST /api/v1/auth/logout`
///
/// Always answers 200; an unknown token is already logged out.
pub async fn logout(
    State(state): State<AppState>,
    request: Request,
) -> Json<ApiResponse<serde_json::Value>> {
    if let Some(token) = extract_session_token(&request) {
        state.auth_service.logout(&token).await;
    }
    Json(ApiResponse::ok(serde_json::json!({ "logged_out": true })))
}
