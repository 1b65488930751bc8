//! Blog post service
//!
//! Validation, slug handling, and cached reads for blog posts. List and
//! single-post reads go through the content cache; stale entries are
//! refetched and served as a fallback when the backend read fails.
//! Writes invalidate both post buckets.

use crate::cache::{CacheBucket, CacheLookup, ContentCache};
use crate::models::{BlogPost, CreatePostInput, UpdatePostInput};
use crate::store::repositories::PostRepository;
use anyhow::Context;
use std::sync::Arc;

/// Cache key for the published post listing
const CACHE_KEY_PUBLISHED: &str = "published";

/// Cache key for the full post listing (drafts included)
const CACHE_KEY_ALL: &str = "all";

/// Error types for post service operations
#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    /// Post not found
    #[error("Post not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Duplicate slug
    #[error("Post slug already exists: {0}")]
    DuplicateSlug(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Blog post service
pub struct PostService {
    repository: Arc<dyn PostRepository>,
    cache: Arc<ContentCache>,
}

impl PostService {
    /// Create a new post service
    pub fn new(repository: Arc<dyn PostRepository>, cache: Arc<ContentCache>) -> Self {
        Self { repository, cache }
    }

    /// List published posts, newest first (cached)
    pub async fn list_published(&self) -> Result<Vec<BlogPost>, PostServiceError> {
        let lookup = self
            .cache
            .get::<Vec<BlogPost>>(CacheBucket::BlogPosts, CACHE_KEY_PUBLISHED)
            .await
            .unwrap_or(CacheLookup::Miss);

        match lookup {
            CacheLookup::Fresh(posts) => Ok(posts),
            CacheLookup::Stale(cached) => match self.repository.list_published().await {
                Ok(posts) => {
                    let _ = self
                        .cache
                        .put(CacheBucket::BlogPosts, CACHE_KEY_PUBLISHED, &posts)
                        .await;
                    Ok(posts)
                }
                Err(err) => {
                    tracing::warn!("Serving stale post listing, backend read failed: {:#}", err);
                    Ok(cached)
                }
            },
            CacheLookup::Miss => {
                let posts = self
                    .repository
                    .list_published()
                    .await
                    .context("Failed to list published posts")?;
                let _ = self
                    .cache
                    .put(CacheBucket::BlogPosts, CACHE_KEY_PUBLISHED, &posts)
                    .await;
                Ok(posts)
            }
        }
    }

    /// List all posts including drafts, newest first (cached)
    pub async fn list_all(&self) -> Result<Vec<BlogPost>, PostServiceError> {
        let lookup = self
            .cache
            .get::<Vec<BlogPost>>(CacheBucket::BlogPosts, CACHE_KEY_ALL)
            .await
            .unwrap_or(CacheLookup::Miss);

        match lookup {
            CacheLookup::Fresh(posts) => Ok(posts),
            CacheLookup::Stale(cached) => match self.repository.list().await {
                Ok(posts) => {
                    let _ = self
                        .cache
                        .put(CacheBucket::BlogPosts, CACHE_KEY_ALL, &posts)
                        .await;
                    Ok(posts)
                }
                Err(err) => {
                    tracing::warn!("Serving stale post listing, backend read failed: {:#}", err);
                    Ok(cached)
                }
            },
            CacheLookup::Miss => {
                let posts = self
                    .repository
                    .list()
                    .await
                    .context("Failed to list posts")?;
                let _ = self
                    .cache
                    .put(CacheBucket::BlogPosts, CACHE_KEY_ALL, &posts)
                    .await;
                Ok(posts)
            }
        }
    }

    /// Get a post by slug (cached).
    ///
    /// A missing slug is `Ok(None)`, never an error.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, PostServiceError> {
        let lookup = self
            .cache
            .get::<BlogPost>(CacheBucket::BlogPost, slug)
            .await
            .unwrap_or(CacheLookup::Miss);

        match lookup {
            CacheLookup::Fresh(post) => Ok(Some(post)),
            CacheLookup::Stale(cached) => match self.repository.get_by_slug(slug).await {
                Ok(Some(post)) => {
                    let _ = self.cache.put(CacheBucket::BlogPost, slug, &post).await;
                    Ok(Some(post))
                }
                Ok(None) => {
                    let _ = self.cache.evict(CacheBucket::BlogPost, slug).await;
                    Ok(None)
                }
                Err(err) => {
                    tracing::warn!(slug, "Serving stale post, backend read failed: {:#}", err);
                    Ok(Some(cached))
                }
            },
            CacheLookup::Miss => {
                let post = self
                    .repository
                    .get_by_slug(slug)
                    .await
                    .context("Failed to get post by slug")?;
                if let Some(ref post) = post {
                    let _ = self.cache.put(CacheBucket::BlogPost, slug, post).await;
                }
                Ok(post)
            }
        }
    }

    /// Get a post by id, bypassing the cache
    pub async fn get_by_id(&self, id: &str) -> Result<Option<BlogPost>, PostServiceError> {
        let post = self
            .repository
            .get_by_id(id)
            .await
            .context("Failed to get post by id")?;
        Ok(post)
    }

    /// Record a read of a post.
    ///
    /// Failures are logged and never surfaced; a broken counter must
    /// not take down the page view.
    pub async fn record_read(&self, id: &str) {
        if let Err(err) = self.repository.increment_read_count(id).await {
            tracing::warn!(post_id = id, "Failed to record read: {:#}", err);
        }
    }

    /// Create a new post.
    ///
    /// The slug is generated from the title when absent and must be
    /// unique either way.
    pub async fn create(&self, mut input: CreatePostInput) -> Result<BlogPost, PostServiceError> {
        if input.title.trim().is_empty() {
            return Err(PostServiceError::ValidationError(
                "Post title cannot be empty".to_string(),
            ));
        }
        if input.content.trim().is_empty() {
            return Err(PostServiceError::ValidationError(
                "Post content cannot be empty".to_string(),
            ));
        }

        let slug = match input.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => generate_slug(&input.title),
        };
        if slug.is_empty() {
            return Err(PostServiceError::ValidationError(
                "Post slug cannot be derived from the title".to_string(),
            ));
        }

        if self
            .repository
            .exists_by_slug(&slug)
            .await
            .context("Failed to check slug uniqueness")?
        {
            return Err(PostServiceError::DuplicateSlug(slug));
        }

        input.slug = Some(slug);
        let post = self
            .repository
            .create(&input)
            .await
            .context("Failed to create post")?;

        self.invalidate_post_caches(None).await;
        Ok(post)
    }

    /// Update an existing post
    pub async fn update(
        &self,
        id: &str,
        input: &UpdatePostInput,
    ) -> Result<BlogPost, PostServiceError> {
        let existing = self
            .repository
            .get_by_id(id)
            .await
            .context("Failed to load post for update")?
            .ok_or_else(|| PostServiceError::NotFound(id.to_string()))?;

        if let Some(ref title) = input.title {
            if title.trim().is_empty() {
                return Err(PostServiceError::ValidationError(
                    "Post title cannot be empty".to_string(),
                ));
            }
        }
        if let Some(ref content) = input.content {
            if content.trim().is_empty() {
                return Err(PostServiceError::ValidationError(
                    "Post content cannot be empty".to_string(),
                ));
            }
        }

        if let Some(ref new_slug) = input.slug {
            if new_slug != &existing.slug
                && self
                    .repository
                    .exists_by_slug(new_slug)
                    .await
                    .context("Failed to check slug uniqueness")?
            {
                return Err(PostServiceError::DuplicateSlug(new_slug.clone()));
            }
        }

        let updated = self
            .repository
            .update(id, input)
            .await
            .context("Failed to update post")?;

        self.invalidate_post_caches(Some(&existing.slug)).await;
        if let Some(ref new_slug) = input.slug {
            let _ = self.cache.evict(CacheBucket::BlogPost, new_slug).await;
        }
        Ok(updated)
    }

    /// Delete a post
    pub async fn delete(&self, id: &str) -> Result<(), PostServiceError> {
        let existing = self
            .repository
            .get_by_id(id)
            .await
            .context("Failed to load post for delete")?
            .ok_or_else(|| PostServiceError::NotFound(id.to_string()))?;

        self.repository
            .delete(id)
            .await
            .context("Failed to delete post")?;

        self.invalidate_post_caches(Some(&existing.slug)).await;
        Ok(())
    }

    /// Like a post for a user.
    ///
    /// Returns `false` when the user had already liked the post.
    pub async fn like(&self, post_id: &str, user_id: &str) -> Result<bool, PostServiceError> {
        let existing = self
            .repository
            .get_by_id(post_id)
            .await
            .context("Failed to load post for like")?
            .ok_or_else(|| PostServiceError::NotFound(post_id.to_string()))?;

        let liked = self
            .repository
            .like(post_id, user_id)
            .await
            .context("Failed to like post")?;

        if liked {
            self.invalidate_post_caches(Some(&existing.slug)).await;
        }
        Ok(liked)
    }

    /// Remove a like from a post for a user.
    ///
    /// Returns `false` when the user had not liked the post.
    pub async fn unlike(&self, post_id: &str, user_id: &str) -> Result<bool, PostServiceError> {
        let existing = self
            .repository
            .get_by_id(post_id)
            .await
            .context("Failed to load post for unlike")?
            .ok_or_else(|| PostServiceError::NotFound(post_id.to_string()))?;

        let removed = self
            .repository
            .unlike(post_id, user_id)
            .await
            .context("Failed to unlike post")?;

        if removed {
            self.invalidate_post_caches(Some(&existing.slug)).await;
        }
        Ok(removed)
    }

    /// Current like count of a post
    pub async fn like_count(&self, post_id: &str) -> Result<i64, PostServiceError> {
        let count = self
            .repository
            .like_count(post_id)
            .await
            .context("Failed to get like count")?;
        Ok(count)
    }

    async fn invalidate_post_caches(&self, slug: Option<&str>) {
        let _ = self.cache.clear(CacheBucket::BlogPosts).await;
        match slug {
            Some(slug) => {
                let _ = self.cache.evict(CacheBucket::BlogPost, slug).await;
            }
            None => {
                let _ = self.cache.clear(CacheBucket::BlogPost).await;
            }
        }
    }
}

/// Generate a URL slug from a title.
///
/// Lowercases, maps runs of non-alphanumeric ASCII to single hyphens,
/// and keeps non-ASCII characters as they are.
pub fn generate_slug(title: &str) -> String {
    let mapped: String = title
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || !c.is_ascii() {
                c
            } else {
                '-'
            }
        })
        .collect();

    let mut slug = String::with_capacity(mapped.len());
    let mut prev_hyphen = false;
    for c in mapped.chars() {
        if c == '-' {
            if !prev_hyphen && !slug.is_empty() {
                slug.push('-');
                prev_hyphen = true;
            }
        } else {
            slug.push(c);
            prev_hyphen = false;
        }
    }

    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ContentCache;
    use crate::config::CacheConfig;
    use crate::store::repositories::StorePostRepository;
    use crate::store::{create_test_store, migrations};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn test_service() -> PostService {
        let store = create_test_store().await.unwrap();
        migrations::run_migrations(&store).await.unwrap();
        PostService::new(
            StorePostRepository::boxed(store),
            Arc::new(ContentCache::new(&CacheConfig::default())),
        )
    }

    #[test]
    fn test_generate_slug() {
        assert_eq!(generate_slug("Hello World"), "hello-world");
        assert_eq!(generate_slug("  Rust & Axum!  "), "rust-axum");
        assert_eq!(generate_slug("Already-Slugged"), "already-slugged");
        assert_eq!(generate_slug("!!!"), "");
    }

    #[tokio::test]
    async fn test_create_generates_slug_from_title() {
        let service = test_service().await;

        let post = service
            .create(CreatePostInput::new("Hello World", "<p>content</p>"))
            .await
            .unwrap();
        assert_eq!(post.slug, "hello-world");

        let fetched = service.get_by_slug("hello-world").await.unwrap().unwrap();
        assert_eq!(fetched.title, "Hello World");
        assert_eq!(fetched.content, "<p>content</p>");
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let service = test_service().await;

        let result = service.create(CreatePostInput::new("  ", "content")).await;
        assert!(matches!(result, Err(PostServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_slug() {
        let service = test_service().await;

        service
            .create(CreatePostInput::new("Hello World", "one"))
            .await
            .unwrap();
        let result = service
            .create(CreatePostInput::new("Other Title", "two").with_slug("hello-world"))
            .await;
        assert!(matches!(result, Err(PostServiceError::DuplicateSlug(_))));
    }

    #[tokio::test]
    async fn test_get_missing_slug_is_none() {
        let service = test_service().await;
        assert!(service.get_by_slug("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_post_is_not_found() {
        let service = test_service().await;
        let result = service
            .update("no-such-id", &UpdatePostInput::new().with_title("New"))
            .await;
        assert!(matches!(result, Err(PostServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_post() {
        let service = test_service().await;

        let post = service
            .create(CreatePostInput::new("Hello World", "content"))
            .await
            .unwrap();
        service.delete(&post.id).await.unwrap();

        assert!(service.get_by_slug("hello-world").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_like_is_once_per_user() {
        let service = test_service().await;

        let post = service
            .create(CreatePostInput::new("Hello World", "content"))
            .await
            .unwrap();

        assert!(service.like(&post.id, "user-1").await.unwrap());
        assert!(!service.like(&post.id, "user-1").await.unwrap());
        assert!(service.like(&post.id, "user-2").await.unwrap());
        assert_eq!(service.like_count(&post.id).await.unwrap(), 2);

        assert!(service.unlike(&post.id, "user-1").await.unwrap());
        assert!(!service.unlike(&post.id, "user-1").await.unwrap());
        assert_eq!(service.like_count(&post.id).await.unwrap(), 1);
    }

    /// Repository stub that counts backend reads, so cache behavior is
    /// observable.
    struct CountingRepository {
        list_calls: AtomicUsize,
    }

    impl CountingRepository {
        fn new() -> Self {
            Self {
                list_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PostRepository for CountingRepository {
        async fn create(&self, _input: &CreatePostInput) -> anyhow::Result<BlogPost> {
            unimplemented!()
        }

        async fn get_by_id(&self, _id: &str) -> anyhow::Result<Option<BlogPost>> {
            Ok(None)
        }

        async fn get_by_slug(&self, _slug: &str) -> anyhow::Result<Option<BlogPost>> {
            Ok(None)
        }

        async fn list(&self) -> anyhow::Result<Vec<BlogPost>> {
            Ok(vec![])
        }

        async fn list_published(&self) -> anyhow::Result<Vec<BlogPost>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }

        async fn update(&self, _id: &str, _input: &UpdatePostInput) -> anyhow::Result<BlogPost> {
            unimplemented!()
        }

        async fn delete(&self, _id: &str) -> anyhow::Result<()> {
            Ok(())
        }

        async fn exists_by_slug(&self, _slug: &str) -> anyhow::Result<bool> {
            Ok(false)
        }

        async fn increment_read_count(&self, _id: &str) -> anyhow::Result<()> {
            Ok(())
        }

        async fn like(&self, _post_id: &str, _user_id: &str) -> anyhow::Result<bool> {
            Ok(true)
        }

        async fn unlike(&self, _post_id: &str, _user_id: &str) -> anyhow::Result<bool> {
            Ok(true)
        }

        async fn like_count(&self, _post_id: &str) -> anyhow::Result<i64> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_list_is_cached_and_clear_forces_refetch() {
        let repository = Arc::new(CountingRepository::new());
        let cache = Arc::new(ContentCache::new(&CacheConfig::default()));
        let service = PostService::new(repository.clone(), cache.clone());

        service.list_published().await.unwrap();
        service.list_published().await.unwrap();
        assert_eq!(repository.list_calls.load(Ordering::SeqCst), 1);

        cache.clear(CacheBucket::BlogPosts).await.unwrap();
        service.list_published().await.unwrap();
        assert_eq!(repository.list_calls.load(Ordering::SeqCst), 2);
    }
}
