//! Backing stores for the quote cache.
//!
//! Values are stored serialized so any key/value backend can sit behind
//! [`CacheStore`]. [`MemoryCacheStore`] is the in-process implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;

/// Default maximum number of entries kept by [`MemoryCacheStore`].
pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Key/value backend with per-entry time-to-live.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Serialized value for `key`, if present and not expired.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`. `ttl: None` keeps the entry until evicted.
    async fn set(&self, key: &str, value: String, ttl: Option<Duration>);

    async fn delete(&self, key: &str);

    async fn clear(&self);
}

#[derive(Clone, Debug)]
struct StoredValue {
    payload: String,
    ttl: Option<Duration>,
}

/// Expiry policy reading the TTL carried by each entry.
struct PerEntryTtl;

impl Expiry<String, StoredValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// In-memory cache store backed by moka, with per-entry TTL
pub struct MemoryCacheStore {
    entries: Cache<String, StoredValue>,
}

impl MemoryCacheStore {
    /// Create a store with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    /// Approximate number of live entries.
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).await.map(|value| value.payload)
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) {
        self.entries
            .insert(
                key.to_string(),
                StoredValue {
                    payload: value,
                    ttl,
                },
            )
            .await;
    }

    async fn delete(&self, key: &str) {
        self.entries.invalidate(key).await;
    }

    async fn clear(&self) {
        self.entries.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get() {
        let store = MemoryCacheStore::new();
        store.set("k", "v".to_string(), None).await;
        assert_eq!(store.get("k").await.as_deref(), Some("v"));
        assert_eq!(store.entry_count().await, 1);
    }

    #[tokio::test]
    async fn test_miss() {
        let store = MemoryCacheStore::new();
        assert!(store.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let store = MemoryCacheStore::new();
        store.set("a", "1".to_string(), None).await;
        store.set("b", "2".to_string(), None).await;

        store.delete("a").await;
        assert!(store.get("a").await.is_none());
        assert!(store.get("b").await.is_some());

        store.clear().await;
        assert!(store.get("b").await.is_none());
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let store = MemoryCacheStore::new();
        store
            .set("short", "v".to_string(), Some(Duration::from_millis(50)))
            .await;
        store.set("forever", "v".to_string(), None).await;

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(store.get("short").await.is_none());
        assert!(store.get("forever").await.is_some());
    }

    #[tokio::test]
    async fn test_overwrite_resets_ttl() {
        let store = MemoryCacheStore::new();
        store
            .set("k", "old".to_string(), Some(Duration::from_millis(50)))
            .await;
        store.set("k", "new".to_string(), None).await;

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(store.get("k").await.as_deref(), Some("new"));
    }
}
