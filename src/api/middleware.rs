//! API middleware
//!
//! Shared application state, the API error type, and the admin session
//! middleware. Admin endpoints accept the session token either as a
//! `Bearer` authorization header or a `session` cookie.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::responses::ApiResponse;
use crate::cache::ContentCache;
use crate::config::StoreDriver;
use crate::services::{
    AdminAuthService, AuthError, PostService, PostServiceError, PreferencesService,
    PreferencesServiceError, ResumeLinkService, ResumeLinkServiceError,
};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub driver: StoreDriver,
    pub cache: Arc<ContentCache>,
    pub post_service: Arc<PostService>,
    pub preferences_service: Arc<PreferencesService>,
    pub resume_service: Arc<ResumeLinkService>,
    pub auth_service: Arc<AdminAuthService>,
}

/// Marker extension inserted once a request carries a valid admin
/// session
#[derive(Debug, Clone)]
pub struct AdminSession;

/// API error carrying a code and message.
///
/// The code selects the HTTP status; the body keeps the response
/// envelope with `data: null` and the message as `error`.
#[derive(Debug)]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.code {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "FORBIDDEN" => StatusCode::FORBIDDEN,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}

impl From<PostServiceError> for ApiError {
    fn from(err: PostServiceError) -> Self {
        match err {
            PostServiceError::NotFound(_) => ApiError::not_found(err.to_string()),
            PostServiceError::ValidationError(_) => ApiError::validation_error(err.to_string()),
            PostServiceError::DuplicateSlug(_) => ApiError::conflict(err.to_string()),
            PostServiceError::InternalError(inner) => {
                tracing::error!("Post service error: {:#}", inner);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl From<PreferencesServiceError> for ApiError {
    fn from(err: PreferencesServiceError) -> Self {
        match err {
            PreferencesServiceError::InternalError(inner) => {
                tracing::error!("Preferences service error: {:#}", inner);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl From<ResumeLinkServiceError> for ApiError {
    fn from(err: ResumeLinkServiceError) -> Self {
        match err {
            ResumeLinkServiceError::NotFound(_) => ApiError::not_found(err.to_string()),
            ResumeLinkServiceError::ValidationError(_) => {
                ApiError::validation_error(err.to_string())
            }
            ResumeLinkServiceError::InternalError(inner) => {
                tracing::error!("Resume link service error: {:#}", inner);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::LoginDisabled => ApiError::forbidden(err.to_string()),
            AuthError::InvalidCredentials => ApiError::unauthorized(err.to_string()),
            AuthError::InternalError(inner) => {
                tracing::error!("Auth service error: {:#}", inner);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

/// Extract the session token from a request
pub fn extract_session_token(request: &Request) -> Option<String> {
    if let Some(auth_header) = request.headers().get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    if let Some(cookie_header) = request.headers().get(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                if let Some(token) = cookie.trim().strip_prefix("session=") {
                    return Some(token.to_string());
                }
            }
        }
    }

    None
}

/// Admin authorization middleware.
///
/// Rejects requests without a live admin session.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(&request)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    if !state.auth_service.validate(&token).await {
        return Err(ApiError::unauthorized("Invalid or expired session"));
    }

    request.extensions_mut().insert(AdminSession);
    Ok(next.run(request).await)
}

/// Optional admin middleware.
///
/// Marks the request when it carries a valid admin session; public
/// handlers use the marker to unlock admin-only query options.
pub async fn optional_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_session_token(&request) {
        if state.auth_service.validate(&token).await {
            request.extensions_mut().insert(AdminSession);
        }
    }
    next.run(request).await
}
