//! Process-local result cache

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use super::ResultCache;
use crate::error::AdminResult;
use crate::query::Record;

#[derive(Debug, Clone)]
struct CacheEntry {
    records: Vec<Record>,
    expires_at: Instant,
}

/// In-memory [`ResultCache`] with per-entry expiry
///
/// Expired entries are ignored on read and dropped on the next write, so
/// the map never outgrows the set of keys written within one TTL.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl MemoryCache {
    /// Empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop expired entries, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();

        let removed = {
            let mut entries = self.entries.write();
            let before = entries.len();
            entries.retain(|_, entry| entry.expires_at > now);
            before - entries.len()
        };

        if removed > 0 {
            debug!(removed = removed, "Purged expired related values");
        }

        removed
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn get(&self, key: &str) -> AdminResult<Option<Vec<Record>>> {
        let now = Instant::now();
        let entries = self.entries.read();
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.records.clone()))
    }

    async fn put(&self, key: &str, records: &[Record], ttl: Duration) -> AdminResult<()> {
        self.purge_expired();

        let entry = CacheEntry {
            records: records.to_vec(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<Record> {
        vec![
            Record::from_json("id", json!({"id": 1, "name": "Chile"})),
            Record::from_json("id", json!({"id": 2, "name": "Norway"})),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let cache = MemoryCache::new();
        cache.put("k", &records(), Duration::from_secs(4)).await.unwrap();

        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(cache.get("k").await.unwrap(), Some(records()));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_missing_key() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let cache = MemoryCache::new();
        cache.put("k", &records(), Duration::from_secs(4)).await.unwrap();
        cache.put("k", &records()[..1], Duration::from_secs(4)).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().map(|r| r.len()), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_drops_expired_entries() {
        let cache = MemoryCache::new();
        cache.put("first", &records(), Duration::from_secs(4)).await.unwrap();
        cache.put("second", &records(), Duration::from_secs(10)).await.unwrap();

        tokio::time::advance(Duration::from_secs(5)).await;
        cache.put("third", &records(), Duration::from_secs(4)).await.unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("first").await.unwrap(), None);
        assert!(cache.get("second").await.unwrap().is_some());
        assert!(cache.get("third").await.unwrap().is_some());
    }
}
