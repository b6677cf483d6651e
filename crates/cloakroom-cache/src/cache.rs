//! Concurrent cache with absolute expiration and capacity-bounded eviction.

use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lru::LruCache;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::expiry::{Expiry, ExpiryTracker};

/// Inner state protected by RwLock.
struct CacheInner<V> {
    /// Bounded map of live entries, kept in recency order.
    entries: LruCache<String, V>,

    /// Deadline bookkeeping for entries that expire by time.
    expiry: ExpiryTracker,
}

/// Concurrent key-value cache with per-entry absolute expiration and a
/// hard capacity bound.
///
/// The cache provides:
/// - Lazy expiration: an entry past its deadline is a miss on the very
///   first read after the deadline, and is removed on that read
/// - Eviction under capacity pressure: expired entries first, then the
///   entry closest to its deadline, then the least recently used entry
///   when nothing carries a deadline
/// - Thread-safe access via RwLock; handles are cheap to clone and all
///   clones share one store
///
/// Evicting a still-valid entry to satisfy the capacity bound is
/// accepted behavior; the evicted key simply misses on its next read.
pub struct ExpiringCache<V> {
    inner: Arc<RwLock<CacheInner<V>>>,
    config: CacheConfig,
}

impl<V: Clone + Send + Sync + 'static> ExpiringCache<V> {
    /// Create a new cache.
    ///
    /// Fails with [`Error::ZeroCapacity`] when the configured capacity
    /// is zero; a cache that can hold nothing is a wiring mistake and
    /// must stop startup rather than degrade silently.
    pub fn new(config: CacheConfig) -> Result<Self> {
        let cap = NonZeroUsize::new(config.capacity).ok_or(Error::ZeroCapacity)?;

        let inner = CacheInner {
            entries: LruCache::new(cap),
            expiry: ExpiryTracker::new(),
        };

        Ok(Self {
            inner: Arc::new(RwLock::new(inner)),
            config,
        })
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get the current number of entries, expired ones included until
    /// they are touched or purged.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }

    /// Insert or overwrite an entry.
    ///
    /// Overwriting an existing key replaces its value and deadline
    /// together under one write lock. When a new key would push the
    /// cache past its capacity, room is made first (see [`ExpiringCache`]
    /// for the eviction order), so the cache never holds more than
    /// `capacity` entries.
    pub async fn insert(&self, key: &str, value: V, expiry: Option<Expiry>) {
        let now = Utc::now();
        let deadline = expiry.map(|e| e.deadline(now));
        let mut inner = self.inner.write().await;

        if inner.entries.len() >= self.config.capacity && !inner.entries.contains(key) {
            self.make_room(&mut inner, now);
        }

        inner.entries.put(key.to_string(), value);
        inner.expiry.set(key, deadline);

        trace!(
            key = %key,
            deadline = ?deadline,
            size = inner.entries.len(),
            "Entry inserted into cache"
        );
    }

    /// Look up an entry.
    ///
    /// Misses when the key is absent or its deadline has passed; an
    /// expired entry is removed by the read that finds it expired. A
    /// hit marks the entry recently used.
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = Utc::now();
        let mut inner = self.inner.write().await;

        if inner.expiry.is_expired(key, now) {
            debug!(key = %key, "Entry expired, removing from cache");
            inner.entries.pop(key);
            inner.expiry.remove(key);
            return None;
        }

        let value = inner.entries.get(key).cloned();
        if value.is_some() {
            trace!(key = %key, "Cache hit");
        }
        value
    }

    /// Check for a live entry without touching recency order.
    pub async fn contains(&self, key: &str) -> bool {
        let now = Utc::now();
        let inner = self.inner.read().await;
        inner.entries.contains(key) && !inner.expiry.is_expired(key, now)
    }

    /// Remove an entry, returning its value if it was present.
    ///
    /// Removing an absent key is a no-op.
    pub async fn remove(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.write().await;

        inner.expiry.remove(key);
        let removed = inner.entries.pop(key);

        if removed.is_some() {
            trace!(key = %key, "Entry removed from cache");
        }
        removed
    }

    /// Drop every entry whose deadline has passed.
    ///
    /// This is driven periodically by the cleanup task (see
    /// [`spawn_cleanup_task`](Self::spawn_cleanup_task)) but can also
    /// be called manually. Returns the number of entries dropped.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut inner = self.inner.write().await;

        let expired = inner.expiry.drain_expired(now);
        let count = expired.len();
        for key in expired {
            inner.entries.pop(&key);
        }

        if count > 0 {
            debug!(count = count, "Purged expired cache entries");
        }
        count
    }

    /// Get cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let inner = self.inner.read().await;
        CacheStats {
            size: inner.entries.len(),
            capacity: self.config.capacity,
            with_deadline: inner.expiry.len(),
        }
    }

    /// Spawn the periodic purge task if the configuration enables it.
    ///
    /// The task holds a clone of this handle and runs until the
    /// returned handle is aborted or the runtime shuts down.
    pub fn spawn_cleanup_task(&self) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enable_cleanup_task {
            return None;
        }

        let cache = self.clone();
        let interval = self.config.cleanup_interval;
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick is immediate
            loop {
                ticker.tick().await;
                cache.purge_expired().await;
            }
        }))
    }

    /// Evict until at least one slot is free.
    ///
    /// Expired entries go first. If the cache is still full, the entry
    /// with the soonest deadline goes; entries with no deadline are
    /// only chosen (in least-recently-used order) when nothing tracks
    /// a deadline at all.
    fn make_room(&self, inner: &mut CacheInner<V>, now: DateTime<Utc>) {
        for key in inner.expiry.drain_expired(now) {
            inner.entries.pop(&key);
            debug!(key = %key, "Dropped expired entry to make room");
        }

        if inner.entries.len() < self.config.capacity {
            return;
        }

        let victim = match inner.expiry.soonest() {
            Some((key, _)) => key.to_string(),
            None => match inner.entries.peek_lru() {
                Some((key, _)) => key.clone(),
                None => return,
            },
        };
        inner.entries.pop(&victim);
        inner.expiry.remove(&victim);
        debug!(key = %victim, "Evicted live entry under capacity pressure");
    }
}

impl<V> Clone for ExpiringCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config.clone(),
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Current number of entries.
    pub size: usize,

    /// Maximum capacity.
    pub capacity: usize,

    /// Number of entries tracked for expiration.
    pub with_deadline: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    fn cache_with_capacity(capacity: usize) -> ExpiringCache<String> {
        let config = CacheConfig::new()
            .with_capacity(capacity)
            .with_cleanup_task(false);
        ExpiringCache::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = cache_with_capacity(10);

        cache.insert("key-1", "value-1".to_string(), None).await;

        assert_eq!(cache.get("key-1").await, Some("value-1".to_string()));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_miss_on_absent_key() {
        let cache = cache_with_capacity(10);
        assert_eq!(cache.get("nonexistent").await, None);
    }

    #[tokio::test]
    async fn test_zero_capacity_rejected() {
        let config = CacheConfig::new().with_capacity(0);
        let result = ExpiringCache::<String>::new(config);
        assert!(matches!(result, Err(Error::ZeroCapacity)));
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value_and_deadline() {
        let cache = cache_with_capacity(10);

        cache
            .insert(
                "key-1",
                "old".to_string(),
                Some(Expiry::After(Duration::from_millis(40))),
            )
            .await;
        cache
            .insert(
                "key-1",
                "new".to_string(),
                Some(Expiry::After(Duration::from_millis(500))),
            )
            .await;

        // Past the old deadline, before the new one.
        sleep(Duration::from_millis(80)).await;

        assert_eq!(cache.get("key-1").await, Some("new".to_string()));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_miss_and_removed() {
        let cache = cache_with_capacity(10);

        cache
            .insert(
                "key-1",
                "value-1".to_string(),
                Some(Expiry::After(Duration::from_millis(40))),
            )
            .await;

        assert_eq!(cache.get("key-1").await, Some("value-1".to_string()));

        sleep(Duration::from_millis(80)).await;

        // First read past the deadline is a miss and drops the entry.
        assert_eq!(cache.get("key-1").await, None);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_absolute_expiry() {
        let cache = cache_with_capacity(10);

        let deadline = Utc::now() + chrono::TimeDelta::milliseconds(40);
        cache
            .insert("key-1", "value-1".to_string(), Some(Expiry::At(deadline)))
            .await;

        assert!(cache.contains("key-1").await);

        sleep(Duration::from_millis(80)).await;

        assert!(!cache.contains("key-1").await);
        assert_eq!(cache.get("key-1").await, None);
    }

    #[tokio::test]
    async fn test_no_expiry_never_times_out() {
        let cache = cache_with_capacity(10);

        cache.insert("key-1", "value-1".to_string(), None).await;

        sleep(Duration::from_millis(60)).await;

        assert_eq!(cache.get("key-1").await, Some("value-1".to_string()));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let cache = cache_with_capacity(10);

        cache.insert("key-1", "value-1".to_string(), None).await;

        assert_eq!(cache.remove("key-1").await, Some("value-1".to_string()));
        assert_eq!(cache.remove("key-1").await, None);
        assert_eq!(cache.get("key-1").await, None);
    }

    #[tokio::test]
    async fn test_eviction_prefers_expired_entries() {
        let cache = cache_with_capacity(3);

        cache
            .insert(
                "stale",
                "v".to_string(),
                Some(Expiry::After(Duration::from_millis(20))),
            )
            .await;
        cache.insert("live-1", "v".to_string(), None).await;
        cache.insert("live-2", "v".to_string(), None).await;

        sleep(Duration::from_millis(50)).await;

        cache.insert("live-3", "v".to_string(), None).await;

        assert!(!cache.contains("stale").await);
        assert!(cache.contains("live-1").await);
        assert!(cache.contains("live-2").await);
        assert!(cache.contains("live-3").await);
        assert_eq!(cache.len().await, 3);
    }

    #[tokio::test]
    async fn test_eviction_picks_soonest_deadline() {
        let cache = cache_with_capacity(3);
        let now = Utc::now();

        cache
            .insert(
                "soon",
                "v".to_string(),
                Some(Expiry::At(now + chrono::TimeDelta::hours(1))),
            )
            .await;
        cache
            .insert(
                "later",
                "v".to_string(),
                Some(Expiry::At(now + chrono::TimeDelta::hours(2))),
            )
            .await;
        cache.insert("unbounded", "v".to_string(), None).await;

        cache.insert("new", "v".to_string(), None).await;

        assert!(!cache.contains("soon").await);
        assert!(cache.contains("later").await);
        assert!(cache.contains("unbounded").await);
        assert!(cache.contains("new").await);
    }

    #[tokio::test]
    async fn test_eviction_falls_back_to_lru() {
        let cache = cache_with_capacity(3);

        cache.insert("a", "v".to_string(), None).await;
        cache.insert("b", "v".to_string(), None).await;
        cache.insert("c", "v".to_string(), None).await;

        // Touch "a" so "b" becomes least recently used.
        let _ = cache.get("a").await;

        cache.insert("d", "v".to_string(), None).await;

        assert!(cache.contains("a").await);
        assert!(!cache.contains("b").await);
        assert!(cache.contains("c").await);
        assert!(cache.contains("d").await);
    }

    #[tokio::test]
    async fn test_never_exceeds_capacity() {
        let cache = cache_with_capacity(5);

        for i in 0..20 {
            cache.insert(&format!("key-{}", i), "v".to_string(), None).await;
            assert!(cache.len().await <= 5);
        }
        assert_eq!(cache.len().await, 5);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let cache = cache_with_capacity(10);

        for i in 0..3 {
            cache
                .insert(
                    &format!("stale-{}", i),
                    "v".to_string(),
                    Some(Expiry::After(Duration::from_millis(20))),
                )
                .await;
        }
        cache.insert("live", "v".to_string(), None).await;

        sleep(Duration::from_millis(50)).await;

        let purged = cache.purge_expired().await;
        assert_eq!(purged, 3);
        assert_eq!(cache.len().await, 1);
        assert!(cache.contains("live").await);
    }

    #[tokio::test]
    async fn test_stats() {
        let cache = cache_with_capacity(100);

        cache.insert("a", "v".to_string(), None).await;
        cache
            .insert(
                "b",
                "v".to_string(),
                Some(Expiry::After(Duration::from_secs(60))),
            )
            .await;

        let stats = cache.stats().await;
        assert_eq!(stats.size, 2);
        assert_eq!(stats.capacity, 100);
        assert_eq!(stats.with_deadline, 1);
    }

    #[tokio::test]
    async fn test_cleanup_task_purges_in_background() {
        let config = CacheConfig::new()
            .with_capacity(10)
            .with_cleanup_interval(Duration::from_millis(30));
        let cache: ExpiringCache<String> = ExpiringCache::new(config).unwrap();

        cache
            .insert(
                "stale",
                "v".to_string(),
                Some(Expiry::After(Duration::from_millis(20))),
            )
            .await;

        let task = cache.spawn_cleanup_task().expect("cleanup task enabled");

        sleep(Duration::from_millis(120)).await;

        // Purged by the task, not by a read.
        assert_eq!(cache.len().await, 0);
        task.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_disabled() {
        let config = CacheConfig::new().with_cleanup_task(false);
        let cache: ExpiringCache<String> = ExpiringCache::new(config).unwrap();
        assert!(cache.spawn_cleanup_task().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let cache = cache_with_capacity(10);
        let clone = cache.clone();

        cache.insert("key-1", "value-1".to_string(), None).await;

        assert_eq!(clone.get("key-1").await, Some("value-1".to_string()));
    }
}
