//! User preferences repository
//!
//! Table access for per-user theme preferences. The upsert updates the
//! existing row first and only inserts when no row was affected, so a
//! user id never owns more than one row and repeated identical upserts
//! are idempotent.

use crate::config::StoreDriver;
use crate::models::{Theme, UserPreferences};
use crate::store::remote::{eq, RemoteTables};
use crate::store::DynTableStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

/// User preferences repository trait
#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    /// Get preferences for a user
    async fn get_by_user(&self, user_id: &str) -> Result<Option<UserPreferences>>;

    /// Create or update the preferences for a user
    async fn upsert(&self, user_id: &str, theme: Theme) -> Result<UserPreferences>;
}

/// Store-backed preferences repository implementation
pub struct StorePreferencesRepository {
    store: DynTableStore,
}

impl StorePreferencesRepository {
    /// Create a new preferences repository
    pub fn new(store: DynTableStore) -> Self {
        Self { store }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(store: DynTableStore) -> Arc<dyn PreferencesRepository> {
        Arc::new(Self::new(store))
    }
}

#[async_trait]
impl PreferencesRepository for StorePreferencesRepository {
    async fn get_by_user(&self, user_id: &str) -> Result<Option<UserPreferences>> {
        match self.store.driver() {
            StoreDriver::Sqlite => {
                get_by_user_sqlite(self.store.as_sqlite().unwrap(), user_id).await
            }
            StoreDriver::Remote => {
                get_by_user_remote(self.store.as_remote().unwrap(), user_id).await
            }
        }
    }

    async fn upsert(&self, user_id: &str, theme: Theme) -> Result<UserPreferences> {
        match self.store.driver() {
            StoreDriver::Sqlite => {
                upsert_sqlite(self.store.as_sqlite().unwrap(), user_id, theme).await
            }
            StoreDriver::Remote => {
                upsert_remote(self.store.as_remote().unwrap(), user_id, theme).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn get_by_user_sqlite(pool: &SqlitePool, user_id: &str) -> Result<Option<UserPreferences>> {
    let row = sqlx::query(
        "SELECT id, user_id, theme, created_at, updated_at FROM user_preferences WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get user preferences")?;

    match row {
        Some(row) => Ok(Some(row_to_preferences(&row)?)),
        None => Ok(None),
    }
}

async fn upsert_sqlite(pool: &SqlitePool, user_id: &str, theme: Theme) -> Result<UserPreferences> {
    let now = Utc::now();

    // Update first, insert only when no row exists
    let result = sqlx::query(
        "UPDATE user_preferences SET theme = ?, updated_at = ? WHERE user_id = ?",
    )
    .bind(theme.as_str())
    .bind(now)
    .bind(user_id)
    .execute(pool)
    .await
    .context("Failed to update user preferences")?;

    if result.rows_affected() == 0 {
        sqlx::query(
            "INSERT INTO user_preferences (id, user_id, theme, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(theme.as_str())
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to insert user preferences")?;
    }

    get_by_user_sqlite(pool, user_id)
        .await?
        .context("User preferences missing after upsert")
}

fn row_to_preferences(row: &sqlx::sqlite::SqliteRow) -> Result<UserPreferences> {
    let theme_str: String = row.get("theme");
    let theme = Theme::from_str(&theme_str)
        .ok_or_else(|| anyhow::anyhow!("Invalid theme: {}", theme_str))?;

    Ok(UserPreferences {
        id: row.get("id"),
        user_id: row.get("user_id"),
        theme,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// Remote implementations
// ============================================================================

async fn get_by_user_remote(
    tables: &RemoteTables,
    user_id: &str,
) -> Result<Option<UserPreferences>> {
    let rows: Vec<UserPreferences> = tables
        .select("user_preferences", &[eq("user_id", user_id)])
        .await?;
    Ok(rows.into_iter().next())
}

async fn upsert_remote(
    tables: &RemoteTables,
    user_id: &str,
    theme: Theme,
) -> Result<UserPreferences> {
    let now = Utc::now();

    if get_by_user_remote(tables, user_id).await?.is_some() {
        let patch = json!({ "theme": theme.as_str(), "updated_at": now });
        let rows: Vec<UserPreferences> = tables
            .update("user_preferences", &[eq("user_id", user_id)], &patch)
            .await?;
        return rows
            .into_iter()
            .next()
            .context("User preferences missing after update");
    }

    let prefs = UserPreferences {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        theme,
        created_at: now,
        updated_at: now,
    };
    let rows: Vec<UserPreferences> = tables.insert("user_preferences", &prefs).await?;
    rows.into_iter()
        .next()
        .context("Remote insert returned no representation")
}
