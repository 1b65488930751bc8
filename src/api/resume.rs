//! Resume link API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;

use crate::api::middleware::{AdminSession, ApiError, AppState};
use crate::api::responses::ApiResponse;
use crate::models::{CreateResumeLinkInput, ResumeLink, UpdateResumeLinkInput};

/// Query parameters for the link listing
#[derive(Debug, Deserialize)]
pub struct ListLinksQuery {
    /// Include inactive links (admin only)
    #[serde(default)]
    pub include_inactive: bool,
}

/// `GET /api/v1/resume_links`
///
/// Active links ordered by display order. With
/// `?include_inactive=true` and an admin session, inactive links are
/// included.
pub async fn list_links(
    State(state): State<AppState>,
    admin: Option<Extension<AdminSession>>,
    Query(query): Query<ListLinksQuery>,
) -> Result<Json<ApiResponse<Vec<ResumeLink>>>, ApiError> {
    let links = if query.include_inactive {
        if admin.is_none() {
            return Err(ApiError::forbidden(
                "Inactive link listing requires admin access",
            ));
        }
        state.resume_service.all_links().await?
    } else {
        state.resume_service.active_links().await?
    };

    Ok(Json(ApiResponse::ok(links)))
}

/// `POST /api/v1/resume_links` (admin)
pub async fn create_link(
    State(state): State<AppState>,
    Json(input): Json<CreateResumeLinkInput>,
) -> Result<impl IntoResponse, ApiError> {
    let link = state.resume_service.create_link(&input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(link))))
}

/// `PUT /api/v1/resume_links/{id}` (admin)
pub async fn update_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateResumeLinkInput>,
) -> Result<Json<ApiResponse<ResumeLink>>, ApiError> {
    let link = state.resume_service.update_link(&id, &input).await?;
    Ok(Json(ApiResponse::ok(link)))
}
