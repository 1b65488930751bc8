//! Folio - A personal portfolio and blog backend

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::{
    api::{self, AppState},
    cache::{spawn_stats_logger, ContentCache},
    config::Config,
    services::{
        spawn_session_sweeper, AdminAuthService, PostService, PreferencesService,
        ResumeLinkService,
    },
    store::{
        self,
        repositories::{StorePostRepository, StorePreferencesRepository, StoreResumeLinkRepository},
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Folio backend...");

    // Load configuration (FOLIO_CONFIG overrides the path)
    let config_path =
        std::env::var("FOLIO_CONFIG").unwrap_or_else(|_| "config.yml".to_string());
    let config = Config::load_with_env(Path::new(&config_path))?;
    tracing::info!("Configuration loaded from {}", config_path);

    // Initialize the table store
    let table_store = store::create_store(&config.store).await?;
    tracing::info!("Table store connected: {:?}", config.store.driver);

    // Run migrations (SQLite only; the hosted service manages its own schema)
    store::migrations::run_migrations(&table_store).await?;
    tracing::info!("Migrations completed");

    if config.seed_demo_data {
        store::migrations::seed_demo_data(&table_store).await?;
        tracing::info!("Demo data seeded");
    }

    // Initialize the content cache
    let cache = Arc::new(ContentCache::new(&config.cache));
    tracing::info!("Cache initialized");

    // Create repositories
    let post_repo = StorePostRepository::boxed(table_store.clone());
    let preferences_repo = StorePreferencesRepository::boxed(table_store.clone());
    let resume_repo = StoreResumeLinkRepository::boxed(table_store.clone());

    // Initialize services
    let post_service = Arc::new(PostService::new(post_repo, cache.clone()));
    let preferences_service = Arc::new(PreferencesService::new(preferences_repo, cache.clone()));
    let resume_service = Arc::new(ResumeLinkService::new(resume_repo, cache.clone()));
    let auth_service = Arc::new(AdminAuthService::new(&config.admin));

    if !auth_service.enabled() {
        tracing::warn!("No admin password hash configured; admin endpoints are disabled");
    }

    // Build application state
    let state = AppState {
        driver: config.store.driver,
        cache: cache.clone(),
        post_service,
        preferences_service,
        resume_service,
        auth_service: auth_service.clone(),
    };

    // Background tasks
    spawn_stats_logger(cache.clone());
    spawn_session_sweeper(auth_service);

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
