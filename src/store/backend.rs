//! Store backend abstraction
//!
//! This module provides a unified interface for table storage that works
//! with both a local SQLite database and a hosted REST table service.
//! The appropriate backend is created based on the configuration.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;

use crate::config::{StoreConfig, StoreDriver};
use crate::store::remote::RemoteTables;

/// Table store trait that abstracts over storage backends.
///
/// This trait provides a unified interface for storage access,
/// allowing repositories to work with either SQLite or the hosted
/// table service without knowing the specific backend.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Check if the backend is reachable
    async fn ping(&self) -> Result<()>;

    /// Close the backend connection
    async fn close(&self);

    /// Get the store driver type
    fn driver(&self) -> StoreDriver;

    /// Get the underlying SQLite pool if this is a SQLite store
    fn as_sqlite(&self) -> Option<&SqlitePool>;

    /// Get the remote table client if this is a remote store
    fn as_remote(&self) -> Option<&RemoteTables>;
}

/// SQLite store implementation
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store
    pub async fn new(path: &str) -> Result<Self> {
        // Ensure the database directory exists for file-based SQLite
        if !path.starts_with(":memory:") && !path.starts_with("sqlite::memory:") {
            let file_path = if path.starts_with("sqlite:") {
                path.trim_start_matches("sqlite:")
            } else {
                path
            };

            if let Some(parent) = std::path::Path::new(file_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create database directory: {:?}", parent)
                    })?;
                }
            }
        }

        // Build the connection URL with create=true for file-based databases
        let connection_url = if path.starts_with("sqlite:") {
            if path.contains('?') {
                path.to_string()
            } else {
                format!("{}?mode=rwc", path)
            }
        } else if path == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite:{}?mode=rwc", path)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(20)
            .connect(&connection_url)
            .await
            .with_context(|| format!("Failed to connect to SQLite database: {}", path))?;

        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .context("Failed to enable foreign keys")?;

        Ok(Self { pool })
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TableStore for SqliteStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn driver(&self) -> StoreDriver {
        StoreDriver::Sqlite
    }

    fn as_sqlite(&self) -> Option<&SqlitePool> {
        Some(&self.pool)
    }

    fn as_remote(&self) -> Option<&RemoteTables> {
        None
    }
}

/// Remote table service store implementation
pub struct RemoteStore {
    tables: RemoteTables,
}

impl RemoteStore {
    /// Create a new remote store from configuration
    pub fn new(base_url: &str, api_key: Option<&str>, read_retries: u32) -> Result<Self> {
        let tables = RemoteTables::new(base_url, api_key, read_retries)?;
        Ok(Self { tables })
    }
}

#[async_trait]
impl TableStore for RemoteStore {
    async fn ping(&self) -> Result<()> {
        self.tables.ping().await
    }

    async fn close(&self) {
        // reqwest clients hold no connection state worth draining
    }

    fn driver(&self) -> StoreDriver {
        StoreDriver::Remote
    }

    fn as_sqlite(&self) -> Option<&SqlitePool> {
        None
    }

    fn as_remote(&self) -> Option<&RemoteTables> {
        Some(&self.tables)
    }
}

/// Type alias for a shared table store
pub type DynTableStore = Arc<dyn TableStore>;

/// Create a table store based on configuration.
///
/// This factory function reads the store configuration and creates
/// the appropriate backend (SQLite or remote).
///
/// # Errors
///
/// Returns an error if the SQLite connection cannot be established or
/// the remote configuration is incomplete.
pub async fn create_store(config: &StoreConfig) -> Result<DynTableStore> {
    match config.driver {
        StoreDriver::Sqlite => {
            let store = SqliteStore::new(&config.sqlite_path).await?;
            Ok(Arc::new(store))
        }
        StoreDriver::Remote => {
            let base_url = config
                .remote_url
                .as_deref()
                .context("store.remote_url is required for the remote driver")?;
            let store = RemoteStore::new(base_url, config.remote_api_key.as_deref(), config.read_retries)?;
            Ok(Arc::new(store))
        }
    }
}

/// Create an in-memory SQLite store for testing
///
/// This is a convenience function for creating an in-memory SQLite store,
/// useful for unit tests and integration tests.
pub async fn create_test_store() -> Result<DynTableStore> {
    let config = StoreConfig {
        driver: StoreDriver::Sqlite,
        sqlite_path: ":memory:".to_string(),
        ..StoreConfig::default()
    };
    create_store(&config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_store_creation() {
        let config = StoreConfig {
            driver: StoreDriver::Sqlite,
            sqlite_path: ":memory:".to_string(),
            ..StoreConfig::default()
        };

        let store = create_store(&config).await.expect("Failed to create store");
        assert_eq!(store.driver(), StoreDriver::Sqlite);
        assert!(store.as_sqlite().is_some());
        assert!(store.as_remote().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_store_ping() {
        let store = create_test_store().await.expect("Failed to create store");
        store.ping().await.expect("Ping should succeed");
    }

    #[tokio::test]
    async fn test_sqlite_file_store_creation() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = StoreConfig {
            driver: StoreDriver::Sqlite,
            sqlite_path: db_path.to_string_lossy().to_string(),
            ..StoreConfig::default()
        };

        let store = create_store(&config).await.expect("Failed to create store");
        store.ping().await.expect("Ping should succeed");

        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_sqlite_nested_directory_creation() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("nested").join("dir").join("test.db");

        let config = StoreConfig {
            driver: StoreDriver::Sqlite,
            sqlite_path: db_path.to_string_lossy().to_string(),
            ..StoreConfig::default()
        };

        let store = create_store(&config).await.expect("Failed to create store");
        store.ping().await.expect("Ping should succeed");

        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_remote_store_requires_url() {
        let config = StoreConfig {
            driver: StoreDriver::Remote,
            remote_url: None,
            ..StoreConfig::default()
        };

        let result = create_store(&config).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_remote_store_creation() {
        let config = StoreConfig {
            driver: StoreDriver::Remote,
            remote_url: Some("https://tables.example.com".to_string()),
            remote_api_key: Some("anon".to_string()),
            ..StoreConfig::default()
        };

        let store = create_store(&config).await.expect("Failed to create store");
        assert_eq!(store.driver(), StoreDriver::Remote);
        assert!(store.as_remote().is_some());
        assert!(store.as_sqlite().is_none());
    }

    // Ping against a live table service is skipped by default.
    // Set FOLIO_REMOTE_TEST_URL to run it.
    #[tokio::test]
    #[ignore = "Requires remote table service"]
    async fn test_remote_store_ping() {
        let url = std::env::var("FOLIO_REMOTE_TEST_URL")
            .unwrap_or_else(|_| "http://localhost:54321".to_string());
        let key = std::env::var("FOLIO_REMOTE_TEST_KEY").ok();

        let config = StoreConfig {
            driver: StoreDriver::Remote,
            remote_url: Some(url),
            remote_api_key: key,
            ..StoreConfig::default()
        };

        let store = create_store(&config).await.expect("Failed to create store");
        store.ping().await.expect("Ping should succeed");
    }
}
