//! User preferences service

use crate::cache::{CacheBucket, CacheLookup, ContentCache};
use crate::models::{Theme, UserPreferences};
use crate::store::repositories::PreferencesRepository;
use anyhow::Context;
use std::sync::Arc;

/// Error types for preferences service operations
#[derive(Debug, thiserror::Error)]
pub enum PreferencesServiceError {
    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Per-user theme preferences service
pub struct PreferencesService {
    repository: Arc<dyn PreferencesRepository>,
    cache: Arc<ContentCache>,
}

impl PreferencesService {
    /// Create a new preferences service
    pub fn new(repository: Arc<dyn PreferencesRepository>, cache: Arc<ContentCache>) -> Self {
        Self { repository, cache }
    }

    /// Get a user's preferences (cached).
    ///
    /// A user without stored preferences is `Ok(None)`; callers fall
    /// back to the default theme.
    pub async fn get(
        &self,
        user_id: &str,
    ) -> Result<Option<UserPreferences>, PreferencesServiceError> {
        let lookup = self
            .cache
            .get::<UserPreferences>(CacheBucket::UserPreferences, user_id)
            .await
            .unwrap_or(CacheLookup::Miss);

        match lookup {
            CacheLookup::Fresh(prefs) => Ok(Some(prefs)),
            CacheLookup::Stale(cached) => match self.repository.get_by_user(user_id).await {
                Ok(Some(prefs)) => {
                    let _ = self
                        .cache
                        .put(CacheBucket::UserPreferences, user_id, &prefs)
                        .await;
                    Ok(Some(prefs))
                }
                Ok(None) => {
                    let _ = self
                        .cache
                        .evict(CacheBucket::UserPreferences, user_id)
                        .await;
                    Ok(None)
                }
                Err(err) => {
                    tracing::warn!(
                        user_id,
                        "Serving stale preferences, backend read failed: {:#}",
                        err
                    );
                    Ok(Some(cached))
                }
            },
            CacheLookup::Miss => {
                let prefs = self
                    .repository
                    .get_by_user(user_id)
                    .await
                    .context("Failed to get user preferences")?;
                if let Some(ref prefs) = prefs {
                    let _ = self
                        .cache
                        .put(CacheBucket::UserPreferences, user_id, prefs)
                        .await;
                }
                Ok(prefs)
            }
        }
    }

    /// Set a user's theme, creating the preferences row when absent
    pub async fn set_theme(
        &self,
        user_id: &str,
        theme: Theme,
    ) -> Result<UserPreferences, PreferencesServiceError> {
        let prefs = self
            .repository
            .upsert(user_id, theme)
            .await
            .context("Failed to upsert user preferences")?;

        let _ = self
            .cache
            .put(CacheBucket::UserPreferences, user_id, &prefs)
            .await;
        Ok(prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::store::repositories::StorePreferencesRepository;
    use crate::store::{create_test_store, migrations};

    async fn test_service() -> PreferencesService {
        let store = create_test_store().await.unwrap();
        migrations::run_migrations(&store).await.unwrap();
        PreferencesService::new(
            StorePreferencesRepository::boxed(store),
            Arc::new(ContentCache::new(&CacheConfig::default())),
        )
    }

    #[tokio::test]
    async fn test_get_missing_user_is_none() {
        let service = test_service().await;
        assert!(service.get("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_theme_then_get() {
        let service = test_service().await;

        service.set_theme("user-1", Theme::Sunset).await.unwrap();

        let prefs = service.get("user-1").await.unwrap().unwrap();
        assert_eq!(prefs.theme, Theme::Sunset);
    }

    #[tokio::test]
    async fn test_set_theme_updates_cached_value() {
        let service = test_service().await;

        service.set_theme("user-1", Theme::Ocean).await.unwrap();
        // Prime the cache
        service.get("user-1").await.unwrap();

        service.set_theme("user-1", Theme::Light).await.unwrap();

        let prefs = service.get("user-1").await.unwrap().unwrap();
        assert_eq!(prefs.theme, Theme::Light);
    }
}
