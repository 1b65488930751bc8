//! Cache layer
//!
//! In-memory caching for read-heavy content. The layer is organized as
//! named buckets, each with its own staleness and expiry windows, in
//! front of the table store.
//!
//! # Usage
//!
//! ```rust,ignore
//! use folio::cache::{CacheBucket, CacheLookup, ContentCache};
//! use folio::config::CacheConfig;
//!
//! let cache = ContentCache::new(&CacheConfig::default());
//! cache.put(CacheBucket::BlogPosts, "published", &posts).await?;
//! match cache.get::<Vec<BlogPost>>(CacheBucket::BlogPosts, "published").await? {
//!     CacheLookup::Fresh(posts) => { /* serve */ }
//!     CacheLookup::Stale(posts) => { /* refetch, fall back to these */ }
//!     CacheLookup::Miss => { /* fetch */ }
//! }
//! ```

pub mod buckets;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

pub use buckets::{
    spawn_stats_logger, CacheBucket, CacheLookup, CacheStats, CacheStatsSnapshot, ContentCache,
};
pub use memory::MemoryCache;

/// Cache layer trait
///
/// Due to the generic methods this trait is not object safe. Use the
/// `Cache` enum for runtime polymorphism.
#[async_trait]
pub trait CacheLayer: Send + Sync {
    /// Get a value from cache
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>>;

    /// Set a value in cache with TTL
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<()>;

    /// Delete a value from cache
    async fn delete(&self, key: &str) -> Result<()>;

    /// Clear all cache entries
    async fn clear(&self) -> Result<()>;
}

/// Unified cache enum wrapping the concrete implementations
#[derive(Debug)]
pub enum Cache {
    /// In-memory cache using moka
    Memory(MemoryCache),
}

#[async_trait]
impl CacheLayer for Cache {
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>> {
        match self {
            Cache::Memory(cache) => cache.get(key).await,
        }
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        match self {
            Cache::Memory(cache) => cache.set(key, value, ttl).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match self {
            Cache::Memory(cache) => cache.delete(key).await,
        }
    }

    async fn clear(&self) -> Result<()> {
        match self {
            Cache::Memory(cache) => cache.clear().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_enum_set_and_get() {
        let cache = Cache::Memory(MemoryCache::new());

        cache
            .set("key", &"value".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        let result: Option<String> = cache.get("key").await.unwrap();
        assert_eq!(result, Some("value".to_string()));
    }
}
