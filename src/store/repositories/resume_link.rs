//! Resume link repository
//!
//! Table access for resume download links.

use crate::config::StoreDriver;
use crate::models::{CreateResumeLinkInput, ResumeLink, UpdateResumeLinkInput};
use crate::store::remote::{eq, order, RemoteTables};
use crate::store::DynTableStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

/// Resume link repository trait
#[async_trait]
pub trait ResumeLinkRepository: Send + Sync {
    /// List active links ordered by display order
    async fn list_active(&self) -> Result<Vec<ResumeLink>>;

    /// List all links ordered by display order
    async fn list_all(&self) -> Result<Vec<ResumeLink>>;

    /// Create a new link
    async fn create(&self, input: &CreateResumeLinkInput) -> Result<ResumeLink>;

    /// Update an existing link
    async fn update(&self, id: &str, input: &UpdateResumeLinkInput) -> Result<ResumeLink>;
}

/// Store-backed resume link repository implementation
pub struct StoreResumeLinkRepository {
    store: DynTableStore,
}

impl StoreResumeLinkRepository {
    /// Create a new resume link repository
    pub fn new(store: DynTableStore) -> Self {
        Self { store }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(store: DynTableStore) -> Arc<dyn ResumeLinkRepository> {
        Arc::new(Self::new(store))
    }
}

#[async_trait]
impl ResumeLinkRepository for StoreResumeLinkRepository {
    async fn list_active(&self) -> Result<Vec<ResumeLink>> {
        match self.store.driver() {
            StoreDriver::Sqlite => list_active_sqlite(self.store.as_sqlite().unwrap()).await,
            StoreDriver::Remote => list_active_remote(self.store.as_remote().unwrap()).await,
        }
    }

    async fn list_all(&self) -> Result<Vec<ResumeLink>> {
        match self.store.driver() {
            StoreDriver::Sqlite => list_all_sqlite(self.store.as_sqlite().unwrap()).await,
            StoreDriver::Remote => list_all_remote(self.store.as_remote().unwrap()).await,
        }
    }

    async fn create(&self, input: &CreateResumeLinkInput) -> Result<ResumeLink> {
        match self.store.driver() {
            StoreDriver::Sqlite => create_sqlite(self.store.as_sqlite().unwrap(), input).await,
            StoreDriver::Remote => create_remote(self.store.as_remote().unwrap(), input).await,
        }
    }

    async fn update(&self, id: &str, input: &UpdateResumeLinkInput) -> Result<ResumeLink> {
        match self.store.driver() {
            StoreDriver::Sqlite => update_sqlite(self.store.as_sqlite().unwrap(), id, input).await,
            StoreDriver::Remote => update_remote(self.store.as_remote().unwrap(), id, input).await,
        }
    }
}

const LINK_COLUMNS: &str = "id, name, description, file_url, file_type, file_size, is_active, display_order, created_at, updated_at";

// ============================================================================
// SQLite implementations
// ============================================================================

async fn list_active_sqlite(pool: &SqlitePool) -> Result<Vec<ResumeLink>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM resume_links WHERE is_active = 1 ORDER BY display_order ASC",
        LINK_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list active resume links")?;

    rows.iter().map(row_to_link).collect()
}

async fn list_all_sqlite(pool: &SqlitePool) -> Result<Vec<ResumeLink>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM resume_links ORDER BY display_order ASC",
        LINK_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list resume links")?;

    rows.iter().map(row_to_link).collect()
}

async fn create_sqlite(pool: &SqlitePool, input: &CreateResumeLinkInput) -> Result<ResumeLink> {
    let now = Utc::now();
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO resume_links (id, name, description, file_url, file_type, file_size, is_active, display_order, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(&input.file_url)
    .bind(&input.file_type)
    .bind(input.file_size)
    .bind(input.is_active)
    .bind(input.display_order)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create resume link")?;

    Ok(ResumeLink {
        id,
        name: input.name.clone(),
        description: input.description.clone(),
        file_url: input.file_url.clone(),
        file_type: input.file_type.clone(),
        file_size: input.file_size,
        is_active: input.is_active,
        display_order: input.display_order,
        created_at: now,
        updated_at: now,
    })
}

async fn update_sqlite(
    pool: &SqlitePool,
    id: &str,
    input: &UpdateResumeLinkInput,
) -> Result<ResumeLink> {
    let existing = get_by_id_sqlite(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Resume link not found: {}", id))?;

    let now = Utc::now();
    let new_name = input.name.as_ref().unwrap_or(&existing.name);
    let new_description = input.description.clone().or(existing.description.clone());
    let new_file_url = input.file_url.as_ref().unwrap_or(&existing.file_url);
    let new_file_type = input.file_type.as_ref().unwrap_or(&existing.file_type);
    let new_file_size = input.file_size.or(existing.file_size);
    let new_is_active = input.is_active.unwrap_or(existing.is_active);
    let new_display_order = input.display_order.unwrap_or(existing.display_order);

    sqlx::query(
        r#"
        UPDATE resume_links
        SET name = ?, description = ?, file_url = ?, file_type = ?, file_size = ?, is_active = ?, display_order = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(new_name)
    .bind(&new_description)
    .bind(new_file_url)
    .bind(new_file_type)
    .bind(new_file_size)
    .bind(new_is_active)
    .bind(new_display_order)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update resume link")?;

    get_by_id_sqlite(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Resume link not found after update: {}", id))
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: &str) -> Result<Option<ResumeLink>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM resume_links WHERE id = ?",
        LINK_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get resume link")?;

    match row {
        Some(row) => Ok(Some(row_to_link(&row)?)),
        None => Ok(None),
    }
}

fn row_to_link(row: &sqlx::sqlite::SqliteRow) -> Result<ResumeLink> {
    Ok(ResumeLink {
        id: row.get("id"),
        name: row.get("name"),
        description: row.try_get("description").ok(),
        file_url: row.get("file_url"),
        file_type: row.get("file_type"),
        file_size: row.try_get("file_size").ok(),
        is_active: row.get("is_active"),
        display_order: row.get("display_order"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// Remote implementations
// ============================================================================

async fn list_active_remote(tables: &RemoteTables) -> Result<Vec<ResumeLink>> {
    tables
        .select(
            "resume_links",
            &[eq("is_active", "true"), order("display_order", false)],
        )
        .await
}

async fn list_all_remote(tables: &RemoteTables) -> Result<Vec<ResumeLink>> {
    tables
        .select("resume_links", &[order("display_order", false)])
        .await
}

async fn create_remote(tables: &RemoteTables, input: &CreateResumeLinkInput) -> Result<ResumeLink> {
    let now = Utc::now();
    let link = ResumeLink {
        id: Uuid::new_v4().to_string(),
        name: input.name.clone(),
        description: input.description.clone(),
        file_url: input.file_url.clone(),
        file_type: input.file_type.clone(),
        file_size: input.file_size,
        is_active: input.is_active,
        display_order: input.display_order,
        created_at: now,
        updated_at: now,
    };

    let rows: Vec<ResumeLink> = tables.insert("resume_links", &link).await?;
    rows.into_iter()
        .next()
        .context("Remote insert returned no representation")
}

async fn update_remote(
    tables: &RemoteTables,
    id: &str,
    input: &UpdateResumeLinkInput,
) -> Result<ResumeLink> {
    let mut patch = serde_json::Map::new();
    if let Some(name) = &input.name {
        patch.insert("name".to_string(), json!(name));
    }
    if let Some(description) = &input.description {
        patch.insert("description".to_string(), json!(description));
    }
    if let Some(file_url) = &input.file_url {
        patch.insert("file_url".to_string(), json!(file_url));
    }
    if let Some(file_type) = &input.file_type {
        patch.insert("file_type".to_string(), json!(file_type));
    }
    if let Some(file_size) = input.file_size {
        patch.insert("file_size".to_string(), json!(file_size));
    }
    if let Some(is_active) = input.is_active {
        patch.insert("is_active".to_string(), json!(is_active));
    }
    if let Some(display_order) = input.display_order {
        patch.insert("display_order".to_string(), json!(display_order));
    }
    patch.insert("updated_at".to_string(), json!(Utc::now()));

    let rows: Vec<ResumeLink> = tables
        .update("resume_links", &[eq("id", id)], &patch)
        .await?;
    rows.into_iter()
        .next()
        .with_context(|| format!("Resume link not found: {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{create_test_store, migrations};

    async fn test_repo() -> StoreResumeLinkRepository {
        let store = create_test_store().await.unwrap();
        migrations::run_migrations(&store).await.unwrap();
        StoreResumeLinkRepository::new(store)
    }

    #[tokio::test]
    async fn test_create_and_list_active() {
        let repo = test_repo().await;

        repo.create(
            &CreateResumeLinkInput::new("Resume", "/files/resume.pdf").with_display_order(1),
        )
        .await
        .unwrap();
        repo.create(
            &CreateResumeLinkInput::new("CV (short)", "/files/cv.pdf").with_display_order(0),
        )
        .await
        .unwrap();

        let links = repo.list_active().await.unwrap();
        assert_eq!(links.len(), 2);
        // Ordered by display_order ascending
        assert_eq!(links[0].name, "CV (short)");
        assert_eq!(links[1].name, "Resume");
    }

    #[tokio::test]
    async fn test_inactive_links_are_hidden_from_active_list() {
        let repo = test_repo().await;

        let link = repo
            .create(&CreateResumeLinkInput::new("Old resume", "/files/old.pdf"))
            .await
            .unwrap();

        repo.update(&link.id, &UpdateResumeLinkInput::new().with_is_active(false))
            .await
            .unwrap();

        assert!(repo.list_active().await.unwrap().is_empty());
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_changes_url() {
        let repo = test_repo().await;

        let link = repo
            .create(&CreateResumeLinkInput::new("Resume", "/files/resume-v1.pdf"))
            .await
            .unwrap();

        let updated = repo
            .update(
                &link.id,
                &UpdateResumeLinkInput::new().with_file_url("/files/resume-v2.pdf"),
            )
            .await
            .unwrap();

        assert_eq!(updated.file_url, "/files/resume-v2.pdf");
        assert_eq!(updated.name, "Resume");
    }

    #[tokio::test]
    async fn test_update_missing_link_fails() {
        let repo = test_repo().await;
        let result = repo
            .update("no-such-id", &UpdateResumeLinkInput::new().with_is_active(false))
            .await;
        assert!(result.is_err());
    }
}
