//! Blog post API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;

use crate::api::middleware::{AdminSession, ApiError, AppState};
use crate::api::responses::ApiResponse;
use crate::models::{BlogPost, CreatePostInput, UpdatePostInput};

/// Query parameters for the post listing
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    /// Include drafts in the listing (admin only)
    #[serde(default)]
    pub include_drafts: bool,
}

/// Request body for like and unlike operations
#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub user_id: String,
}

/// `GET /api/v1/blog_posts`
///
/// Published posts newest first. With `?include_drafts=true` and an
/// admin session, drafts are included.
pub async fn list_posts(
    State(state): State<AppState>,
    admin: Option<Extension<AdminSession>>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<ApiResponse<Vec<BlogPost>>>, ApiError> {
    let posts = if query.include_drafts {
        if admin.is_none() {
            return Err(ApiError::forbidden("Draft listing requires admin access"));
        }
        state.post_service.list_all().await?
    } else {
        state.post_service.list_published().await?
    };

    Ok(Json(ApiResponse::ok(posts)))
}

/// `GET /api/v1/blog_posts/{slug}`
///
/// A missing slug answers 200 with `{data: null, error: null}`. A hit
/// records a read; counter failures never affect the response.
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<BlogPost>>, ApiError> {
    match state.post_service.get_by_slug(&slug).await? {
        Some(post) => {
            state.post_service.record_read(&post.id).await;
            Ok(Json(ApiResponse::ok(post)))
        }
        None => Ok(Json(ApiResponse::null())),
    }
}

/// `POST /api/v1/blog_posts` (admin)
pub async fn create_post(
    State(state): State<AppState>,
    Json(input): Json<CreatePostInput>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.post_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(post))))
}

/// `PUT /api/v1/blog_posts/{id}` (admin)
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePostInput>,
) -> Result<Json<ApiResponse<BlogPost>>, ApiError> {
    let post = state.post_service.update(&id, &input).await?;
    Ok(Json(ApiResponse::ok(post)))
}

/// `DELETE /api/v1/blog_posts/{id}` (admin)
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    state.post_service.delete(&id).await?;
    Ok(Json(ApiResponse::ok(serde_json::json!({ "deleted": true }))))
}

/// `POST /api/v1/blog_posts/{id}/like`
///
/// One like per (post, user); a repeated like reports `liked: false`
/// without failing.
pub async fn like_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<LikeRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let liked = state.post_service.like(&id, &body.user_id).await?;
    let like_count = state.post_service.like_count(&id).await?;
    Ok(Json(ApiResponse::ok(serde_json::json!({
        "liked": liked,
        "like_count": like_count,
    }))))
}

/// `DELETE /api/v1/blog_posts/{id}/like`
pub async fn unlike_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<LikeRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let removed = state.post_service.unlike(&id, &body.user_id).await?;
    let like_count = state.post_service.like_count(&id).await?;
    Ok(Json(ApiResponse::ok(serde_json::json!({
        "removed": removed,
        "like_count": like_count,
    }))))
}
