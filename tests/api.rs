//! HTTP API integration tests
//!
//! Each test stands up the full router over an in-memory SQLite store
//! and exercises the endpoints through axum-test.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use folio::api::{self, AppState};
use folio::cache::ContentCache;
use folio::config::{AdminConfig, CacheConfig, StoreDriver};
use folio::services::password::hash_password;
use folio::services::{AdminAuthService, PostService, PreferencesService, ResumeLinkService};
use folio::store::repositories::{
    StorePostRepository, StorePreferencesRepository, StoreResumeLinkRepository,
};
use folio::store::{create_test_store, migrations, DynTableStore};

const ADMIN_PASSWORD: &str = "hunter2";

async fn test_server() -> (TestServer, DynTableStore) {
    let store = create_test_store().await.unwrap();
    migrations::run_migrations(&store).await.unwrap();

    let cache = Arc::new(ContentCache::new(&CacheConfig::default()));
    let admin = AdminConfig {
        password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
        session_ttl_hours: 1,
    };

    let state = AppState {
        driver: StoreDriver::Sqlite,
        cache: cache.clone(),
        post_service: Arc::new(PostService::new(
            StorePostRepository::boxed(store.clone()),
            cache.clone(),
        )),
        preferences_service: Arc::new(PreferencesService::new(
            StorePreferencesRepository::boxed(store.clone()),
            cache.clone(),
        )),
        resume_service: Arc::new(ResumeLinkService::new(
            StoreResumeLinkRepository::boxed(store.clone()),
            cache,
        )),
        auth_service: Arc::new(AdminAuthService::new(&admin)),
    };

    let app = api::build_router(state, "http://localhost:3000");
    (TestServer::new(app).unwrap(), store)
}

async fn login(server: &TestServer) -> String {
    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "password": ADMIN_PASSWORD }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_reports_backend() {
    let (server, _store) = test_server().await;

    let response = server.get("/api/v1/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["backend"], "sqlite");
    assert!(body["error"].is_null());
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let (server, _store) = test_server().await;

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "password": "wrong" }))
        .await;
    response.assert_status_unauthorized();

    let body: Value = response.json();
    assert!(body["data"].is_null());
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_create_post_requires_admin() {
    let (server, _store) = test_server().await;

    let response = server
        .post("/api/v1/blog_posts")
        .json(&json!({ "title": "Hello", "content": "<p>hi</p>" }))
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_create_and_fetch_post_by_slug() {
    let (server, _store) = test_server().await;
    let token = login(&server).await;

    let response = server
        .post("/api/v1/blog_posts")
        .authorization_bearer(&token)
        .json(&json!({
            "title": "Hello World",
            "content": "<p>first post</p>",
            "status": "published",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let created: Value = response.json();
    assert_eq!(created["data"]["slug"], "hello-world");

    let response = server.get("/api/v1/blog_posts/hello-world").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["title"], "Hello World");
    assert_eq!(body["data"]["content"], "<p>first post</p>");
}

#[tokio::test]
async fn test_missing_slug_answers_null_envelope() {
    let (server, _store) = test_server().await;

    let response = server.get("/api/v1/blog_posts/no-such-post").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["data"].is_null());
    assert!(body["error"].is_null());
}

#[tokio::test]
async fn test_listing_excludes_drafts_without_admin() {
    let (server, _store) = test_server().await;
    let token = login(&server).await;

    server
        .post("/api/v1/blog_posts")
        .authorization_bearer(&token)
        .json(&json!({ "title": "Published", "content": "x", "status": "published" }))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post("/api/v1/blog_posts")
        .authorization_bearer(&token)
        .json(&json!({ "title": "Draft", "content": "y", "status": "draft" }))
        .await
        .assert_status(StatusCode::CREATED);

    let body: Value = server.get("/api/v1/blog_posts").await.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "Published");

    // Drafts need an admin session
    server
        .get("/api/v1/blog_posts?include_drafts=true")
        .await
        .assert_status_forbidden();

    let body: Value = server
        .get("/api/v1/blog_posts?include_drafts=true")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_fetching_post_records_reads() {
    let (server, store) = test_server().await;
    let token = login(&server).await;

    let created: Value = server
        .post("/api/v1/blog_posts")
        .authorization_bearer(&token)
        .json(&json!({ "title": "Counted", "content": "x", "status": "published" }))
        .await
        .json();
    let id = created["data"]["id"].as_str().unwrap().to_string();

    for _ in 0..3 {
        server.get("/api/v1/blog_posts/counted").await.assert_status_ok();
    }

    let repo = StorePostRepository::new(store);
    use folio::store::repositories::PostRepository;
    let post = repo.get_by_id(&id).await.unwrap().unwrap();
    assert_eq!(post.read_count, 3);
}

#[tokio::test]
async fn test_like_and_unlike_post() {
    let (server, _store) = test_server().await;
    let token = login(&server).await;

    let created: Value = server
        .post("/api/v1/blog_posts")
        .authorization_bearer(&token)
        .json(&json!({ "title": "Likeable", "content": "x", "status": "published" }))
        .await
        .json();
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let body: Value = server
        .post(&format!("/api/v1/blog_posts/{}/like", id))
        .json(&json!({ "user_id": "user-1" }))
        .await
        .json();
    assert_eq!(body["data"]["liked"], true);
    assert_eq!(body["data"]["like_count"], 1);

    // Second like from the same user is reported, not an error
    let body: Value = server
        .post(&format!("/api/v1/blog_posts/{}/like", id))
        .json(&json!({ "user_id": "user-1" }))
        .await
        .json();
    assert_eq!(body["data"]["liked"], false);
    assert_eq!(body["data"]["like_count"], 1);

    let body: Value = server
        .delete(&format!("/api/v1/blog_posts/{}/like", id))
        .json(&json!({ "user_id": "user-1" }))
        .await
        .json();
    assert_eq!(body["data"]["removed"], true);
    assert_eq!(body["data"]["like_count"], 0);
}

#[tokio::test]
async fn test_preferences_round_trip() {
    let (server, _store) = test_server().await;

    let response = server.get("/api/v1/user_preferences/visitor-1").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["data"].is_null());

    let body: Value = server
        .post("/api/v1/user_preferences")
        .json(&json!({ "user_id": "visitor-1", "theme": "ocean" }))
        .await
        .json();
    assert_eq!(body["data"]["theme"], "ocean");

    let body: Value = server.get("/api/v1/user_preferences/visitor-1").await.json();
    assert_eq!(body["data"]["theme"], "ocean");
}

#[tokio::test]
async fn test_resume_links_listing_and_update() {
    let (server, _store) = test_server().await;
    let token = login(&server).await;

    let created: Value = server
        .post("/api/v1/resume_links")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Resume", "file_url": "/files/resume.pdf" }))
        .await
        .json();
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let body: Value = server.get("/api/v1/resume_links").await.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    server
        .put(&format!("/api/v1/resume_links/{}", id))
        .authorization_bearer(&token)
        .json(&json!({ "is_active": false }))
        .await
        .assert_status_ok();

    let body: Value = server.get("/api/v1/resume_links").await.json();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cache_admin_endpoints() {
    let (server, _store) = test_server().await;
    let token = login(&server).await;

    server.get("/api/v1/cache/stats").await.assert_status_unauthorized();

    let body: Value = server
        .get("/api/v1/cache/stats")
        .authorization_bearer(&token)
        .await
        .json();
    assert!(body["data"]["hits"].is_u64());

    server
        .post("/api/v1/cache/refresh/blog_posts")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    server
        .delete("/api/v1/cache/bogus")
        .authorization_bearer(&token)
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_duplicate_slug_conflicts() {
    let (server, _store) = test_server().await;
    let token = login(&server).await;

    server
        .post("/api/v1/blog_posts")
        .authorization_bearer(&token)
        .json(&json!({ "title": "Hello World", "content": "x" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/v1/blog_posts")
        .authorization_bearer(&token)
        .json(&json!({ "title": "Other", "content": "y", "slug": "hello-world" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}
