//! Blog post repository
//!
//! Table access for blog posts and likes.
//!
//! This module provides:
//! - `PostRepository` trait defining the interface for post data access
//! - `StorePostRepository` implementing the trait for SQLite and the
//!   remote table service
//!
//! Read counts are incremented atomically on SQLite. The remote service
//! has no atomic increment, so the remote implementation reads the
//! current value and writes it back; concurrent reads may lose an
//! increment there.

use crate::config::StoreDriver;
use crate::models::{BlogPost, CreatePostInput, PostStatus, UpdatePostInput};
use crate::store::remote::{eq, order, RemoteTables};
use crate::store::DynTableStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

/// Blog post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a new post (the input slug must be resolved by the caller)
    async fn create(&self, input: &CreatePostInput) -> Result<BlogPost>;

    /// Get post by ID
    async fn get_by_id(&self, id: &str) -> Result<Option<BlogPost>>;

    /// Get post by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogPost>>;

    /// List all posts ordered by creation time (newest first)
    async fn list(&self) -> Result<Vec<BlogPost>>;

    /// List only published posts ordered by creation time (newest first)
    async fn list_published(&self) -> Result<Vec<BlogPost>>;

    /// Update a post
    async fn update(&self, id: &str, input: &UpdatePostInput) -> Result<BlogPost>;

    /// Delete a post
    async fn delete(&self, id: &str) -> Result<()>;

    /// Check if a slug already exists
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    /// Increment the read count of a post
    async fn increment_read_count(&self, id: &str) -> Result<()>;

    /// Record a like for a post.
    ///
    /// Returns `true` when the like was newly recorded and `false`
    /// when the user had already liked the post.
    async fn like(&self, post_id: &str, user_id: &str) -> Result<bool>;

    /// Remove a like from a post.
    ///
    /// Returns `true` when a like was removed.
    async fn unlike(&self, post_id: &str, user_id: &str) -> Result<bool>;

    /// Get the current like count of a post
    async fn like_count(&self, post_id: &str) -> Result<i64>;
}

/// Store-backed post repository implementation
///
/// Supports both the SQLite store and the remote table service.
pub struct StorePostRepository {
    store: DynTableStore,
}

impl StorePostRepository {
    /// Create a new post repository
    pub fn new(store: DynTableStore) -> Self {
        Self { store }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(store: DynTableStore) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(store))
    }
}

#[async_trait]
impl PostRepository for StorePostRepository {
    async fn create(&self, input: &CreatePostInput) -> Result<BlogPost> {
        match self.store.driver() {
            StoreDriver::Sqlite => create_post_sqlite(self.store.as_sqlite().unwrap(), input).await,
            StoreDriver::Remote => create_post_remote(self.store.as_remote().unwrap(), input).await,
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<BlogPost>> {
        match self.store.driver() {
            StoreDriver::Sqlite => {
                get_post_by_id_sqlite(self.store.as_sqlite().unwrap(), id).await
            }
            StoreDriver::Remote => {
                get_post_by_id_remote(self.store.as_remote().unwrap(), id).await
            }
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        match self.store.driver() {
            StoreDriver::Sqlite => {
                get_post_by_slug_sqlite(self.store.as_sqlite().unwrap(), slug).await
            }
            StoreDriver::Remote => {
                get_post_by_slug_remote(self.store.as_remote().unwrap(), slug).await
            }
        }
    }

    async fn list(&self) -> Result<Vec<BlogPost>> {
        match self.store.driver() {
            StoreDriver::Sqlite => list_posts_sqlite(self.store.as_sqlite().unwrap()).await,
            StoreDriver::Remote => list_posts_remote(self.store.as_remote().unwrap()).await,
        }
    }

    async fn list_published(&self) -> Result<Vec<BlogPost>> {
        match self.store.driver() {
            StoreDriver::Sqlite => {
                list_published_posts_sqlite(self.store.as_sqlite().unwrap()).await
            }
            StoreDriver::Remote => {
                list_published_posts_remote(self.store.as_remote().unwrap()).await
            }
        }
    }

    async fn update(&self, id: &str, input: &UpdatePostInput) -> Result<BlogPost> {
        match self.store.driver() {
            StoreDriver::Sqlite => {
                update_post_sqlite(self.store.as_sqlite().unwrap(), id, input).await
            }
            StoreDriver::Remote => {
                update_post_remote(self.store.as_remote().unwrap(), id, input).await
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        match self.store.driver() {
            StoreDriver::Sqlite => delete_post_sqlite(self.store.as_sqlite().unwrap(), id).await,
            StoreDriver::Remote => delete_post_remote(self.store.as_remote().unwrap(), id).await,
        }
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        match self.store.driver() {
            StoreDriver::Sqlite => {
                exists_by_slug_sqlite(self.store.as_sqlite().unwrap(), slug).await
            }
            StoreDriver::Remote => {
                Ok(get_post_by_slug_remote(self.store.as_remote().unwrap(), slug)
                    .await?
                    .is_some())
            }
        }
    }

    async fn increment_read_count(&self, id: &str) -> Result<()> {
        match self.store.driver() {
            StoreDriver::Sqlite => {
                increment_read_count_sqlite(self.store.as_sqlite().unwrap(), id).await
            }
            StoreDriver::Remote => {
                increment_read_count_remote(self.store.as_remote().unwrap(), id).await
            }
        }
    }

    async fn like(&self, post_id: &str, user_id: &str) -> Result<bool> {
        match self.store.driver() {
            StoreDriver::Sqlite => {
                like_post_sqlite(self.store.as_sqlite().unwrap(), post_id, user_id).await
            }
            StoreDriver::Remote => {
                like_post_remote(self.store.as_remote().unwrap(), post_id, user_id).await
            }
        }
    }

    async fn unlike(&self, post_id: &str, user_id: &str) -> Result<bool> {
        match self.store.driver() {
            StoreDriver::Sqlite => {
                unlike_post_sqlite(self.store.as_sqlite().unwrap(), post_id, user_id).await
            }
            StoreDriver::Remote => {
                unlike_post_remote(self.store.as_remote().unwrap(), post_id, user_id).await
            }
        }
    }

    async fn like_count(&self, post_id: &str) -> Result<i64> {
        match self.store.driver() {
            StoreDriver::Sqlite => {
                like_count_sqlite(self.store.as_sqlite().unwrap(), post_id).await
            }
            StoreDriver::Remote => {
                like_count_remote(self.store.as_remote().unwrap(), post_id).await
            }
        }
    }
}

const POST_COLUMNS: &str = "id, title, content, excerpt, slug, tags, author, featured, read_count, like_count, status, created_at, updated_at";

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_post_sqlite(pool: &SqlitePool, input: &CreatePostInput) -> Result<BlogPost> {
    let now = Utc::now();
    let id = Uuid::new_v4().to_string();
    let slug = input
        .slug
        .as_deref()
        .context("Post slug must be resolved before create")?;
    let status = input.status.unwrap_or_default();
    let author = input
        .author
        .clone()
        .unwrap_or_else(|| "Software Engineer".to_string());
    let tags_json = serde_json::to_string(&input.tags).context("Failed to encode post tags")?;

    sqlx::query(
        r#"
        INSERT INTO blog_posts (id, title, content, excerpt, slug, tags, author, featured, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&input.title)
    .bind(&input.content)
    .bind(&input.excerpt)
    .bind(slug)
    .bind(&tags_json)
    .bind(&author)
    .bind(input.featured)
    .bind(status.as_str())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create post")?;

    Ok(BlogPost {
        id,
        title: input.title.clone(),
        content: input.content.clone(),
        excerpt: input.excerpt.clone(),
        slug: slug.to_string(),
        tags: input.tags.clone(),
        author,
        featured: input.featured,
        read_count: 0,
        like_count: 0,
        status,
        created_at: now,
        updated_at: now,
    })
}

async fn get_post_by_id_sqlite(pool: &SqlitePool, id: &str) -> Result<Option<BlogPost>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM blog_posts WHERE id = ?",
        POST_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get post by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_post(&row)?)),
        None => Ok(None),
    }
}

async fn get_post_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<Option<BlogPost>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM blog_posts WHERE slug = ?",
        POST_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await
    .context("Failed to get post by slug")?;

    match row {
        Some(row) => Ok(Some(row_to_post(&row)?)),
        None => Ok(None),
    }
}

async fn list_posts_sqlite(pool: &SqlitePool) -> Result<Vec<BlogPost>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM blog_posts ORDER BY created_at DESC",
        POST_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list posts")?;

    rows.iter().map(row_to_post).collect()
}

async fn list_published_posts_sqlite(pool: &SqlitePool) -> Result<Vec<BlogPost>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM blog_posts WHERE status = 'published' ORDER BY created_at DESC",
        POST_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list published posts")?;

    rows.iter().map(row_to_post).collect()
}

async fn update_post_sqlite(
    pool: &SqlitePool,
    id: &str,
    input: &UpdatePostInput,
) -> Result<BlogPost> {
    let existing = get_post_by_id_sqlite(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Post not found: {}", id))?;

    let now = Utc::now();
    let new_title = input.title.as_ref().unwrap_or(&existing.title);
    let new_content = input.content.as_ref().unwrap_or(&existing.content);
    let new_excerpt = input.excerpt.clone().or(existing.excerpt.clone());
    let new_slug = input.slug.as_ref().unwrap_or(&existing.slug);
    let new_tags = input.tags.as_ref().unwrap_or(&existing.tags);
    let new_author = input.author.as_ref().unwrap_or(&existing.author);
    let new_featured = input.featured.unwrap_or(existing.featured);
    let new_status = input.status.unwrap_or(existing.status);
    let tags_json = serde_json::to_string(new_tags).context("Failed to encode post tags")?;

    sqlx::query(
        r#"
        UPDATE blog_posts
        SET title = ?, content = ?, excerpt = ?, slug = ?, tags = ?, author = ?, featured = ?, status = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(new_title)
    .bind(new_content)
    .bind(&new_excerpt)
    .bind(new_slug)
    .bind(&tags_json)
    .bind(new_author)
    .bind(new_featured)
    .bind(new_status.as_str())
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update post")?;

    get_post_by_id_sqlite(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Post not found after update: {}", id))
}

async fn delete_post_sqlite(pool: &SqlitePool, id: &str) -> Result<()> {
    // post_likes rows are removed via ON DELETE CASCADE
    sqlx::query("DELETE FROM blog_posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete post")?;

    Ok(())
}

async fn exists_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM blog_posts WHERE slug = ?")
        .bind(slug)
        .fetch_one(pool)
        .await
        .context("Failed to check post slug existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

async fn increment_read_count_sqlite(pool: &SqlitePool, id: &str) -> Result<()> {
    // Single-statement increment, safe under concurrent reads
    sqlx::query("UPDATE blog_posts SET read_count = read_count + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to increment read count")?;

    Ok(())
}

async fn like_post_sqlite(pool: &SqlitePool, post_id: &str, user_id: &str) -> Result<bool> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO post_likes (id, post_id, user_id, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(post_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to record like")?;

    if result.rows_affected() == 0 {
        // Unique constraint hit: already liked
        return Ok(false);
    }

    sqlx::query("UPDATE blog_posts SET like_count = like_count + 1 WHERE id = ?")
        .bind(post_id)
        .execute(pool)
        .await
        .context("Failed to update like count")?;

    Ok(true)
}

async fn unlike_post_sqlite(pool: &SqlitePool, post_id: &str, user_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND user_id = ?")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to remove like")?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query("UPDATE blog_posts SET like_count = MAX(like_count - 1, 0) WHERE id = ?")
        .bind(post_id)
        .execute(pool)
        .await
        .context("Failed to update like count")?;

    Ok(true)
}

async fn like_count_sqlite(pool: &SqlitePool, post_id: &str) -> Result<i64> {
    let row = sqlx::query("SELECT like_count FROM blog_posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get like count")?;

    Ok(row.map(|r| r.get("like_count")).unwrap_or(0))
}

fn row_to_post(row: &sqlx::sqlite::SqliteRow) -> Result<BlogPost> {
    let status_str: String = row.get("status");
    let status = PostStatus::from_str(&status_str)
        .ok_or_else(|| anyhow::anyhow!("Invalid post status: {}", status_str))?;

    let tags_json: String = row.get("tags");
    let tags: Vec<String> =
        serde_json::from_str(&tags_json).context("Failed to decode post tags")?;

    Ok(BlogPost {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        excerpt: row.try_get("excerpt").ok(),
        slug: row.get("slug"),
        tags,
        author: row.get("author"),
        featured: row.get("featured"),
        read_count: row.try_get("read_count").unwrap_or(0),
        like_count: row.try_get("like_count").unwrap_or(0),
        status,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// Remote implementations
// ============================================================================

async fn create_post_remote(tables: &RemoteTables, input: &CreatePostInput) -> Result<BlogPost> {
    let now = Utc::now();
    let slug = input
        .slug
        .as_deref()
        .context("Post slug must be resolved before create")?;
    let post = BlogPost {
        id: Uuid::new_v4().to_string(),
        title: input.title.clone(),
        content: input.content.clone(),
        excerpt: input.excerpt.clone(),
        slug: slug.to_string(),
        tags: input.tags.clone(),
        author: input
            .author
            .clone()
            .unwrap_or_else(|| "Software Engineer".to_string()),
        featured: input.featured,
        read_count: 0,
        like_count: 0,
        status: input.status.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    let rows: Vec<BlogPost> = tables.insert("blog_posts", &post).await?;
    rows.into_iter()
        .next()
        .context("Remote insert returned no representation")
}

async fn get_post_by_id_remote(tables: &RemoteTables, id: &str) -> Result<Option<BlogPost>> {
    let rows: Vec<BlogPost> = tables.select("blog_posts", &[eq("id", id)]).await?;
    Ok(rows.into_iter().next())
}

async fn get_post_by_slug_remote(tables: &RemoteTables, slug: &str) -> Result<Option<BlogPost>> {
    let rows: Vec<BlogPost> = tables.select("blog_posts", &[eq("slug", slug)]).await?;
    Ok(rows.into_iter().next())
}

async fn list_posts_remote(tables: &RemoteTables) -> Result<Vec<BlogPost>> {
    tables
        .select("blog_posts", &[order("created_at", true)])
        .await
}

async fn list_published_posts_remote(tables: &RemoteTables) -> Result<Vec<BlogPost>> {
    tables
        .select(
            "blog_posts",
            &[eq("status", "published"), order("created_at", true)],
        )
        .await
}

async fn update_post_remote(
    tables: &RemoteTables,
    id: &str,
    input: &UpdatePostInput,
) -> Result<BlogPost> {
    let mut patch = serde_json::Map::new();
    if let Some(title) = &input.title {
        patch.insert("title".to_string(), json!(title));
    }
    if let Some(content) = &input.content {
        patch.insert("content".to_string(), json!(content));
    }
    if let Some(excerpt) = &input.excerpt {
        patch.insert("excerpt".to_string(), json!(excerpt));
    }
    if let Some(slug) = &input.slug {
        patch.insert("slug".to_string(), json!(slug));
    }
    if let Some(tags) = &input.tags {
        patch.insert("tags".to_string(), json!(tags));
    }
    if let Some(author) = &input.author {
        patch.insert("author".to_string(), json!(author));
    }
    if let Some(featured) = input.featured {
        patch.insert("featured".to_string(), json!(featured));
    }
    if let Some(status) = input.status {
        patch.insert("status".to_string(), json!(status.as_str()));
    }
    patch.insert("updated_at".to_string(), json!(Utc::now()));

    let rows: Vec<BlogPost> = tables
        .update("blog_posts", &[eq("id", id)], &patch)
        .await?;
    rows.into_iter()
        .next()
        .with_context(|| format!("Post not found: {}", id))
}

async fn delete_post_remote(tables: &RemoteTables, id: &str) -> Result<()> {
    tables.delete("blog_posts", &[eq("id", id)]).await
}

async fn increment_read_count_remote(tables: &RemoteTables, id: &str) -> Result<()> {
    // Read-modify-write: the service exposes no atomic increment, so a
    // concurrent read in this window can lose one count.
    let post = get_post_by_id_remote(tables, id)
        .await?
        .with_context(|| format!("Post not found: {}", id))?;

    let patch = json!({ "read_count": post.read_count + 1 });
    let _: Vec<BlogPost> = tables.update("blog_posts", &[eq("id", id)], &patch).await?;

    Ok(())
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct PostLikeRow {
    id: String,
    post_id: String,
    user_id: String,
    created_at: chrono::DateTime<Utc>,
}

async fn like_post_remote(tables: &RemoteTables, post_id: &str, user_id: &str) -> Result<bool> {
    let existing: Vec<PostLikeRow> = tables
        .select("post_likes", &[eq("post_id", post_id), eq("user_id", user_id)])
        .await?;
    if !existing.is_empty() {
        return Ok(false);
    }

    let like = PostLikeRow {
        id: Uuid::new_v4().to_string(),
        post_id: post_id.to_string(),
        user_id: user_id.to_string(),
        created_at: Utc::now(),
    };
    let _: Vec<PostLikeRow> = tables.insert("post_likes", &like).await?;

    let count = like_count_remote(tables, post_id).await?;
    let patch = json!({ "like_count": count.max(1) });
    let _: Vec<BlogPost> = tables
        .update("blog_posts", &[eq("id", post_id)], &patch)
        .await?;

    Ok(true)
}

async fn unlike_post_remote(tables: &RemoteTables, post_id: &str, user_id: &str) -> Result<bool> {
    let existing: Vec<PostLikeRow> = tables
        .select("post_likes", &[eq("post_id", post_id), eq("user_id", user_id)])
        .await?;
    if existing.is_empty() {
        return Ok(false);
    }

    tables
        .delete("post_likes", &[eq("post_id", post_id), eq("user_id", user_id)])
        .await?;

    let count = like_count_remote(tables, post_id).await?;
    let patch = json!({ "like_count": count });
    let _: Vec<BlogPost> = tables
        .update("blog_posts", &[eq("id", post_id)], &patch)
        .await?;

    Ok(true)
}

async fn like_count_remote(tables: &RemoteTables, post_id: &str) -> Result<i64> {
    let likes: Vec<PostLikeRow> = tables
        .select("post_likes", &[eq("post_id", post_id)])
        .await?;
    Ok(likes.len() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{create_test_store, migrations};

    async fn test_repo() -> StorePostRepository {
        let store = create_test_store().await.unwrap();
        migrations::run_migrations(&store).await.unwrap();
        StorePostRepository::new(store)
    }

    fn published_input(title: &str, slug: &str) -> CreatePostInput {
        CreatePostInput::new(title, format!("<p>{}</p>", title))
            .with_slug(slug)
            .with_status(PostStatus::Published)
    }

    #[tokio::test]
    async fn test_create_and_get_by_slug() {
        let repo = test_repo().await;

        let created = repo
            .create(
                &published_input("Hello World", "hello-world")
                    .with_tags(vec!["rust".to_string(), "web".to_string()]),
            )
            .await
            .unwrap();

        let fetched = repo.get_by_slug("hello-world").await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.title, "Hello World");
        assert_eq!(fetched.content, "<p>Hello World</p>");
        assert_eq!(fetched.tags, vec!["rust", "web"]);
        assert_eq!(fetched.author, "Software Engineer");
        assert_eq!(fetched.read_count, 0);
    }

    #[tokio::test]
    async fn test_get_by_missing_slug_returns_none() {
        let repo = test_repo().await;
        let result = repo.get_by_slug("no-such-post").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create_requires_resolved_slug() {
        let repo = test_repo().await;
        let result = repo.create(&CreatePostInput::new("No slug", "body")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected_by_store() {
        let repo = test_repo().await;
        repo.create(&published_input("First", "same-slug"))
            .await
            .unwrap();
        let result = repo.create(&published_input("Second", "same-slug")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_published_excludes_drafts() {
        let repo = test_repo().await;
        repo.create(&published_input("Published", "published-post"))
            .await
            .unwrap();
        repo.create(
            &CreatePostInput::new("Draft", "<p>Draft</p>").with_slug("draft-post"),
        )
        .await
        .unwrap();

        let published = repo.list_published().await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].slug, "published-post");

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_update_changes_fields_and_timestamp() {
        let repo = test_repo().await;
        let created = repo
            .create(&published_input("Original", "original"))
            .await
            .unwrap();

        let updated = repo
            .update(
                &created.id,
                &UpdatePostInput::new()
                    .with_title("Updated")
                    .with_featured(true),
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Updated");
        assert!(updated.featured);
        assert_eq!(updated.slug, "original");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_delete_removes_post() {
        let repo = test_repo().await;
        let created = repo
            .create(&published_input("Doomed", "doomed"))
            .await
            .unwrap();

        repo.delete(&created.id).await.unwrap();

        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
        assert!(!repo.exists_by_slug("doomed").await.unwrap());
    }

    #[tokio::test]
    async fn test_increment_read_count_is_cumulative() {
        let repo = test_repo().await;
        let created = repo
            .create(&published_input("Counted", "counted"))
            .await
            .unwrap();

        for _ in 0..5 {
            repo.increment_read_count(&created.id).await.unwrap();
        }

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.read_count, 5);
    }

    #[tokio::test]
    async fn test_concurrent_read_increments_are_not_lost() {
        let repo = Arc::new(test_repo().await);
        let created = repo
            .create(&published_input("Hot", "hot-post"))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let repo = repo.clone();
            let id = created.id.clone();
            handles.push(tokio::spawn(async move {
                repo.increment_read_count(&id).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.read_count, 10);
    }

    #[tokio::test]
    async fn test_like_is_unique_per_user() {
        let repo = test_repo().await;
        let created = repo
            .create(&published_input("Likeable", "likeable"))
            .await
            .unwrap();

        assert!(repo.like(&created.id, "user-1").await.unwrap());
        // Second like from the same user is reported, not an error
        assert!(!repo.like(&created.id, "user-1").await.unwrap());
        assert!(repo.like(&created.id, "user-2").await.unwrap());

        assert_eq!(repo.like_count(&created.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unlike_removes_like() {
        let repo = test_repo().await;
        let created = repo
            .create(&published_input("Fickle", "fickle"))
            .await
            .unwrap();

        repo.like(&created.id, "user-1").await.unwrap();
        assert!(repo.unlike(&created.id, "user-1").await.unwrap());
        assert!(!repo.unlike(&created.id, "user-1").await.unwrap());
        assert_eq!(repo.like_count(&created.id).await.unwrap(), 0);
    }
}
