//! Named cache buckets with staleness windows
//!
//! Content reads go through a fixed set of buckets, each with its own
//! staleness window and expiry TTL. A lookup distinguishes three
//! states: fresh (within the staleness window), stale (present but past
//! it, the caller should refetch and may fall back to the stale value
//! when the backend is down), and miss.

use super::{Cache, CacheLayer, MemoryCache};
use crate::config::CacheConfig;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Interval between aggregate stats log lines
const STATS_LOG_INTERVAL: Duration = Duration::from_secs(30);

/// Named cache bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBucket {
    /// Published post listings
    BlogPosts,
    /// Individual posts by slug
    BlogPost,
    /// Per-user theme preferences
    UserPreferences,
    /// Resume download links
    ResumeLinks,
}

impl CacheBucket {
    /// All buckets, in index order
    pub const ALL: [CacheBucket; 4] = [
        CacheBucket::BlogPosts,
        CacheBucket::BlogPost,
        CacheBucket::UserPreferences,
        CacheBucket::ResumeLinks,
    ];

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheBucket::BlogPosts => "blog_posts",
            CacheBucket::BlogPost => "blog_post",
            CacheBucket::UserPreferences => "user_preferences",
            CacheBucket::ResumeLinks => "resume_links",
        }
    }

    /// Parse from a string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "blog_posts" => Some(CacheBucket::BlogPosts),
            "blog_post" => Some(CacheBucket::BlogPost),
            "user_preferences" => Some(CacheBucket::UserPreferences),
            "resume_links" => Some(CacheBucket::ResumeLinks),
            _ => None,
        }
    }

    /// Window after which a cached entry is served as stale
    pub fn stale_after(&self) -> Duration {
        let minutes = match self {
            CacheBucket::BlogPosts => 5,
            CacheBucket::BlogPost => 10,
            CacheBucket::UserPreferences => 10,
            CacheBucket::ResumeLinks => 15,
        };
        Duration::from_secs(minutes * 60)
    }

    /// Window after which a cached entry is dropped entirely
    pub fn expires_after(&self) -> Duration {
        let minutes = match self {
            CacheBucket::BlogPosts => 30,
            CacheBucket::BlogPost => 30,
            CacheBucket::UserPreferences => 60,
            CacheBucket::ResumeLinks => 60,
        };
        Duration::from_secs(minutes * 60)
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for CacheBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a bucket lookup
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    /// Entry present and within the staleness window
    Fresh(T),
    /// Entry present but past the staleness window
    Stale(T),
    /// No entry
    Miss,
}

/// Cached value plus its insert time
#[derive(Debug, Serialize, Deserialize)]
struct CachedRecord<T> {
    value: T,
    stored_at: DateTime<Utc>,
}

/// Aggregate cache counters
///
/// Shared across buckets; counters are monotonic for the process
/// lifetime.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    stale_hits: AtomicU64,
    misses: AtomicU64,
    refreshes: AtomicU64,
    last_refresh: RwLock<Option<DateTime<Utc>>>,
}

impl CacheStats {
    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_stale_hit(&self) {
        self.stale_hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_refresh.write() {
            *last = Some(Utc::now());
        }
    }

    /// Take a point-in-time snapshot of the counters
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let stale_hits = self.stale_hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + stale_hits + misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            (hits + stale_hits) as f64 / lookups as f64
        };

        CacheStatsSnapshot {
            hits,
            stale_hits,
            misses,
            refreshes: self.refreshes.load(Ordering::Relaxed),
            hit_rate,
            last_refresh: self.last_refresh.read().ok().and_then(|l| *l),
        }
    }
}

/// Serializable snapshot of cache counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatsSnapshot {
    /// Fresh hits
    pub hits: u64,
    /// Hits served past the staleness window
    pub stale_hits: u64,
    /// Misses
    pub misses: u64,
    /// Explicit refresh operations
    pub refreshes: u64,
    /// (hits + stale_hits) / total lookups
    pub hit_rate: f64,
    /// Time of the most recent refresh, if any
    pub last_refresh: Option<DateTime<Utc>>,
}

/// Bucketed content cache
///
/// One underlying cache per bucket, with the bucket's expiry window as
/// the TTL. Entries carry their insert time so lookups can report
/// staleness.
#[derive(Debug)]
pub struct ContentCache {
    caches: [Cache; 4],
    stats: CacheStats,
}

impl ContentCache {
    /// Create a content cache from configuration
    pub fn new(config: &CacheConfig) -> Self {
        let caches = CacheBucket::ALL.map(|bucket| {
            Cache::Memory(MemoryCache::with_capacity_and_ttl(
                config.capacity,
                bucket.expires_after(),
            ))
        });

        Self {
            caches,
            stats: CacheStats::default(),
        }
    }

    fn bucket_cache(&self, bucket: CacheBucket) -> &Cache {
        &self.caches[bucket.index()]
    }

    /// Look up a key in a bucket
    pub async fn get<T: DeserializeOwned + Send>(
        &self,
        bucket: CacheBucket,
        key: &str,
    ) -> Result<CacheLookup<T>> {
        let record: Option<CachedRecord<T>> = self.bucket_cache(bucket).get(key).await?;

        match record {
            Some(record) => {
                let age = Utc::now().signed_duration_since(record.stored_at);
                let stale_after = chrono::Duration::from_std(bucket.stale_after())
                    .unwrap_or_else(|_| chrono::Duration::zero());
                if age <= stale_after {
                    self.stats.record_hit();
                    Ok(CacheLookup::Fresh(record.value))
                } else {
                    self.stats.record_stale_hit();
                    Ok(CacheLookup::Stale(record.value))
                }
            }
            None => {
                self.stats.record_miss();
                Ok(CacheLookup::Miss)
            }
        }
    }

    /// Store a value in a bucket
    pub async fn put<T: Serialize + Send + Sync>(
        &self,
        bucket: CacheBucket,
        key: &str,
        value: &T,
    ) -> Result<()> {
        let record = CachedRecord {
            value,
            stored_at: Utc::now(),
        };
        self.bucket_cache(bucket)
            .set(key, &record, bucket.expires_after())
            .await
    }

    /// Drop a single key from a bucket
    pub async fn evict(&self, bucket: CacheBucket, key: &str) -> Result<()> {
        self.bucket_cache(bucket).delete(key).await
    }

    /// Invalidate a bucket so the next read refetches
    pub async fn refresh(&self, bucket: CacheBucket) -> Result<()> {
        self.bucket_cache(bucket).clear().await?;
        self.stats.record_refresh();
        Ok(())
    }

    /// Invalidate every bucket
    pub async fn refresh_all(&self) -> Result<()> {
        for bucket in CacheBucket::ALL {
            self.bucket_cache(bucket).clear().await?;
        }
        self.stats.record_refresh();
        Ok(())
    }

    /// Clear a bucket without counting it as a refresh
    pub async fn clear(&self, bucket: CacheBucket) -> Result<()> {
        self.bucket_cache(bucket).clear().await
    }

    /// Clear every bucket
    pub async fn clear_all(&self) -> Result<()> {
        for bucket in CacheBucket::ALL {
            self.bucket_cache(bucket).clear().await?;
        }
        Ok(())
    }

    /// Snapshot the aggregate counters
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }
}

/// Spawn a background task that logs aggregate cache stats periodically
pub fn spawn_stats_logger(cache: Arc<ContentCache>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STATS_LOG_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            let stats = cache.stats();
            tracing::info!(
                hits = stats.hits,
                stale_hits = stats.stale_hits,
                misses = stats.misses,
                refreshes = stats.refreshes,
                hit_rate = format!("{:.2}", stats.hit_rate),
                "cache stats"
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cache() -> ContentCache {
        ContentCache::new(&CacheConfig::default())
    }

    #[tokio::test]
    async fn test_miss_then_fresh_hit() {
        let cache = test_cache();

        let lookup: CacheLookup<String> = cache
            .get(CacheBucket::BlogPosts, "published")
            .await
            .unwrap();
        assert_eq!(lookup, CacheLookup::Miss);

        cache
            .put(CacheBucket::BlogPosts, "published", &"posts".to_string())
            .await
            .unwrap();

        let lookup: CacheLookup<String> = cache
            .get(CacheBucket::BlogPosts, "published")
            .await
            .unwrap();
        assert_eq!(lookup, CacheLookup::Fresh("posts".to_string()));
    }

    #[tokio::test]
    async fn test_buckets_are_isolated() {
        let cache = test_cache();

        cache
            .put(CacheBucket::BlogPost, "hello-world", &"post".to_string())
            .await
            .unwrap();

        let other: CacheLookup<String> = cache
            .get(CacheBucket::ResumeLinks, "hello-world")
            .await
            .unwrap();
        assert_eq!(other, CacheLookup::Miss);
    }

    #[tokio::test]
    async fn test_clear_forces_miss() {
        let cache = test_cache();

        cache
            .put(CacheBucket::ResumeLinks, "active", &vec!["r1".to_string()])
            .await
            .unwrap();
        cache.clear(CacheBucket::ResumeLinks).await.unwrap();

        let lookup: CacheLookup<Vec<String>> = cache
            .get(CacheBucket::ResumeLinks, "active")
            .await
            .unwrap();
        assert_eq!(lookup, CacheLookup::Miss);
    }

    #[tokio::test]
    async fn test_refresh_invalidates_and_counts() {
        let cache = test_cache();

        cache
            .put(CacheBucket::BlogPosts, "published", &"posts".to_string())
            .await
            .unwrap();
        cache.refresh(CacheBucket::BlogPosts).await.unwrap();

        let lookup: CacheLookup<String> = cache
            .get(CacheBucket::BlogPosts, "published")
            .await
            .unwrap();
        assert_eq!(lookup, CacheLookup::Miss);

        let stats = cache.stats();
        assert_eq!(stats.refreshes, 1);
        assert!(stats.last_refresh.is_some());
    }

    #[tokio::test]
    async fn test_refresh_does_not_touch_other_buckets() {
        let cache = test_cache();

        cache
            .put(CacheBucket::UserPreferences, "user-1", &"ocean".to_string())
            .await
            .unwrap();
        cache.refresh(CacheBucket::BlogPosts).await.unwrap();

        let lookup: CacheLookup<String> = cache
            .get(CacheBucket::UserPreferences, "user-1")
            .await
            .unwrap();
        assert_eq!(lookup, CacheLookup::Fresh("ocean".to_string()));
    }

    #[tokio::test]
    async fn test_stats_counts_hits_and_misses() {
        let cache = test_cache();

        let _: CacheLookup<String> = cache.get(CacheBucket::BlogPost, "a").await.unwrap();
        cache
            .put(CacheBucket::BlogPost, "a", &"v".to_string())
            .await
            .unwrap();
        let _: CacheLookup<String> = cache.get(CacheBucket::BlogPost, "a").await.unwrap();
        let _: CacheLookup<String> = cache.get(CacheBucket::BlogPost, "a").await.unwrap();

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 2);
        assert!((stats.hit_rate - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_bucket_round_trip() {
        for bucket in CacheBucket::ALL {
            assert_eq!(CacheBucket::from_str(bucket.as_str()), Some(bucket));
        }
        assert_eq!(CacheBucket::from_str("bogus"), None);
    }

    #[test]
    fn test_bucket_windows() {
        assert!(CacheBucket::BlogPosts.stale_after() < CacheBucket::BlogPosts.expires_after());
        assert_eq!(
            CacheBucket::BlogPosts.stale_after(),
            Duration::from_secs(300)
        );
        assert_eq!(
            CacheBucket::UserPreferences.expires_after(),
            Duration::from_secs(3600)
        );
    }
}
