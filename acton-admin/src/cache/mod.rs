//! Short-lived result caching
//!
//! Related-value lookups are cached by query [`Fingerprint`] for a few
//! seconds, so a burst of identical lookups (one per row of a listing, or
//! several fields pointing at the same entity) executes once. Staleness is
//! bounded by the TTL; concurrent writers of the same key race benignly.
//!
//! Two backends are provided:
//! - [`MemoryCache`]: process-local map with expiring entries
//! - `RedisCache`: shared cache for multi-instance deployments (`redis` feature)

mod memory;
#[cfg(feature = "redis")]
mod redis_cache;

pub use memory::MemoryCache;
#[cfg(feature = "redis")]
pub use redis_cache::RedisCache;

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

use crate::config::{CacheBackend, CacheSettings};
use crate::error::{AdminError, AdminResult};
use crate::query::{Fingerprint, Record};

/// Storage for fetched record sets
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Cached records for `key`, if present and not expired
    async fn get(&self, key: &str) -> AdminResult<Option<Vec<Record>>>;

    /// Store records under `key` for `ttl`
    async fn put(&self, key: &str, records: &[Record], ttl: Duration) -> AdminResult<()>;
}

/// Shared handle to a [`ResultCache`] plus the configured TTL
#[derive(Clone)]
pub struct CacheHandle {
    inner: Arc<dyn ResultCache>,
    ttl: Duration,
    enabled: bool,
}

impl std::fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheHandle")
            .field("ttl", &self.ttl)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl CacheHandle {
    /// Wrap a cache with the given TTL
    #[must_use]
    pub fn new(inner: Arc<dyn ResultCache>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            enabled: true,
        }
    }

    /// In-memory cache with the default 4 second TTL
    #[must_use]
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryCache::new()), Duration::from_secs(4))
    }

    /// Build the cache described by the configuration
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] when the Redis backend is
    /// selected without a URL or without the `redis` feature.
    pub fn from_settings(settings: &CacheSettings) -> AdminResult<Self> {
        let ttl = Duration::from_secs(settings.ttl_secs);

        let inner: Arc<dyn ResultCache> = match settings.backend {
            CacheBackend::Memory => Arc::new(MemoryCache::new()),
            CacheBackend::Redis => Self::redis_backend(settings)?,
        };

        Ok(Self {
            inner,
            ttl,
            enabled: settings.enabled,
        })
    }

    #[cfg(feature = "redis")]
    fn redis_backend(settings: &CacheSettings) -> AdminResult<Arc<dyn ResultCache>> {
        let url = settings
            .redis_url
            .as_deref()
            .ok_or_else(|| AdminError::configuration("cache.redis_url is required for the redis backend"))?;
        Ok(Arc::new(RedisCache::connect(url)?))
    }

    #[cfg(not(feature = "redis"))]
    fn redis_backend(_settings: &CacheSettings) -> AdminResult<Arc<dyn ResultCache>> {
        Err(AdminError::configuration(
            "the redis cache backend requires the `redis` feature",
        ))
    }

    /// Turn caching off; `remember` then always runs the producer
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether lookups go through the cache
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Configured TTL
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether both handles store into the same backend
    #[must_use]
    pub fn shares_backend(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Return the cached records for `key`, or run `producer` and cache its result
    ///
    /// Producer and cache errors propagate unchanged; nothing is cached on error.
    pub async fn remember<F, Fut>(&self, key: &Fingerprint, producer: F) -> AdminResult<Vec<Record>>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = AdminResult<Vec<Record>>> + Send,
    {
        if !self.enabled {
            return producer().await;
        }

        if let Some(records) = self.inner.get(key.as_str()).await? {
            debug!(fingerprint = %key, count = records.len(), "Related values cache hit");
            return Ok(records);
        }

        trace!(fingerprint = %key, "Related values cache miss");
        let records = producer().await?;
        self.inner.put(key.as_str(), &records, self.ttl).await?;
        Ok(records)
    }
}
