//! Resume link service

use crate::cache::{CacheBucket, CacheLookup, ContentCache};
use crate::models::{CreateResumeLinkInput, ResumeLink, UpdateResumeLinkInput};
use crate::store::repositories::ResumeLinkRepository;
use anyhow::Context;
use std::sync::Arc;

/// Cache key for the active link listing
const CACHE_KEY_ACTIVE: &str = "active";

/// Error types for resume link service operations
#[derive(Debug, thiserror::Error)]
pub enum ResumeLinkServiceError {
    /// Link not found
    #[error("Resume link not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Resume download link service
pub struct ResumeLinkService {
    repository: Arc<dyn ResumeLinkRepository>,
    cache: Arc<ContentCache>,
}

impl ResumeLinkService {
    /// Create a new resume link service
    pub fn new(repository: Arc<dyn ResumeLinkRepository>, cache: Arc<ContentCache>) -> Self {
        Self { repository, cache }
    }

    /// List active links ordered by display order (cached)
    pub async fn active_links(&self) -> Result<Vec<ResumeLink>, ResumeLinkServiceError> {
        let lookup = self
            .cache
            .get::<Vec<ResumeLink>>(CacheBucket::ResumeLinks, CACHE_KEY_ACTIVE)
            .await
            .unwrap_or(CacheLookup::Miss);

        match lookup {
            CacheLookup::Fresh(links) => Ok(links),
            CacheLookup::Stale(cached) => match self.repository.list_active().await {
                Ok(links) => {
                    let _ = self
                        .cache
                        .put(CacheBucket::ResumeLinks, CACHE_KEY_ACTIVE, &links)
                        .await;
                    Ok(links)
                }
                Err(err) => {
                    tracing::warn!(
                        "Serving stale resume links, backend read failed: {:#}",
                        err
                    );
                    Ok(cached)
                }
            },
            CacheLookup::Miss => {
                let links = self
                    .repository
                    .list_active()
                    .await
                    .context("Failed to list active resume links")?;
                let _ = self
                    .cache
                    .put(CacheBucket::ResumeLinks, CACHE_KEY_ACTIVE, &links)
                    .await;
                Ok(links)
            }
        }
    }

    /// List every link, inactive ones included (admin view, uncached)
    pub async fn all_links(&self) -> Result<Vec<ResumeLink>, ResumeLinkServiceError> {
        let links = self
            .repository
            .list_all()
            .await
            .context("Failed to list resume links")?;
        Ok(links)
    }

    /// Create a new link
    pub async fn create_link(
        &self,
        input: &CreateResumeLinkInput,
    ) -> Result<ResumeLink, ResumeLinkServiceError> {
        if input.name.trim().is_empty() {
            return Err(ResumeLinkServiceError::ValidationError(
                "Resume link name cannot be empty".to_string(),
            ));
        }
        if input.file_url.trim().is_empty() {
            return Err(ResumeLinkServiceError::ValidationError(
                "Resume link URL cannot be empty".to_string(),
            ));
        }

        let link = self
            .repository
            .create(input)
            .await
            .context("Failed to create resume link")?;

        let _ = self.cache.clear(CacheBucket::ResumeLinks).await;
        Ok(link)
    }

    /// Update an existing link
    pub async fn update_link(
        &self,
        id: &str,
        input: &UpdateResumeLinkInput,
    ) -> Result<ResumeLink, ResumeLinkServiceError> {
        if let Some(ref name) = input.name {
            if name.trim().is_empty() {
                return Err(ResumeLinkServiceError::ValidationError(
                    "Resume link name cannot be empty".to_string(),
                ));
            }
        }

        let existing = self
            .repository
            .list_all()
            .await
            .context("Failed to load resume links for update")?;
        if !existing.iter().any(|link| link.id == id) {
            return Err(ResumeLinkServiceError::NotFound(id.to_string()));
        }

        let link = self
            .repository
            .update(id, input)
            .await
            .context("Failed to update resume link")?;

        let _ = self.cache.clear(CacheBucket::ResumeLinks).await;
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::store::repositories::StoreResumeLinkRepository;
    use crate::store::{create_test_store, migrations};

    async fn test_service() -> ResumeLinkService {
        let store = create_test_store().await.unwrap();
        migrations::run_migrations(&store).await.unwrap();
        ResumeLinkService::new(
            StoreResumeLinkRepository::boxed(store),
            Arc::new(ContentCache::new(&CacheConfig::default())),
        )
    }

    #[tokio::test]
    async fn test_create_and_list_active() {
        let service = test_service().await;

        service
            .create_link(&CreateResumeLinkInput::new("Resume", "/files/resume.pdf"))
            .await
            .unwrap();

        let links = service.active_links().await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].name, "Resume");
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let service = test_service().await;

        let result = service
            .create_link(&CreateResumeLinkInput::new("  ", "/files/resume.pdf"))
            .await;
        assert!(matches!(
            result,
            Err(ResumeLinkServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_deactivating_refreshes_active_listing() {
        let service = test_service().await;

        let link = service
            .create_link(&CreateResumeLinkInput::new("Resume", "/files/resume.pdf"))
            .await
            .unwrap();
        // Prime the cache
        assert_eq!(service.active_links().await.unwrap().len(), 1);

        service
            .update_link(&link.id, &UpdateResumeLinkInput::new().with_is_active(false))
            .await
            .unwrap();

        assert!(service.active_links().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_link_is_not_found() {
        let service = test_service().await;

        let result = service
            .update_link(
                "no-such-id",
                &UpdateResumeLinkInput::new().with_is_active(false),
            )
            .await;
        assert!(matches!(result, Err(ResumeLinkServiceError::NotFound(_))));
    }
}
