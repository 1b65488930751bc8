//! API layer - HTTP handlers and routing
//!
//! All endpoints live under `/api/v1` and answer with the
//! `{data, error}` envelope. Write endpoints sit behind the admin
//! session middleware; public listings unlock extra query options when
//! the request carries an admin session.

pub mod auth;
pub mod cache;
pub mod middleware;
pub mod posts;
pub mod preferences;
pub mod responses;
pub mod resume;
pub mod site;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use middleware::{ApiError, AppState};
pub use responses::ApiResponse;

/// Build the main API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Admin routes (need a live admin session)
    let admin_routes = Router::new()
        .route("/blog_posts", post(posts::create_post))
        .route("/blog_posts/{id}", put(posts::update_post))
        .route("/blog_posts/{id}", delete(posts::delete_post))
        .route("/resume_links", post(resume::create_link))
        .route("/resume_links/{id}", put(resume::update_link))
        .route("/cache/stats", get(cache::stats))
        .route("/cache/refresh", post(cache::refresh_all))
        .route("/cache/refresh/{bucket}", post(cache::refresh_bucket))
        .route("/cache", delete(cache::clear_all))
        .route("/cache/{bucket}", delete(cache::clear_bucket))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ));

    // Public routes
    Router::new()
        .route("/health", get(site::health))
        .route("/blog_posts", get(posts::list_posts))
        .route("/blog_posts/{id}", get(posts::get_post))
        .route("/blog_posts/{id}/like", post(posts::like_post))
        .route("/blog_posts/{id}/like", delete(posts::unlike_post))
        .route("/user_preferences/{user_id}", get(preferences::get_preferences))
        .route("/user_preferences", post(preferences::upsert_preferences))
        .route("/resume_links", get(resume::list_links))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::optional_admin,
        ))
        .merge(admin_routes)
}

/// Build the complete router with CORS and request tracing
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            cors_origin
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000")),
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);

    Router::new()
        .nest("/api/v1", build_api_router(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
