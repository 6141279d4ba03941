//! Redis-backed result cache for multi-instance deployments

use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use std::time::Duration;
use tracing::warn;

use super::ResultCache;
use crate::error::{AdminError, AdminResult};
use crate::query::Record;

const KEY_PREFIX: &str = "acton-admin:values:";

/// [`ResultCache`] storing JSON-encoded record sets with `SET EX`
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache").finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Create a pool for `url`; connections are opened lazily
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Cache`] if the pool cannot be created.
    pub fn connect(url: &str) -> AdminResult<Self> {
        let pool = Config::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| AdminError::Cache(format!("Failed to create Redis pool: {e}")))?;
        Ok(Self { pool })
    }

    /// Use an existing pool
    #[must_use]
    pub const fn from_pool(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultCache for RedisCache {
    async fn get(&self, key: &str) -> AdminResult<Option<Vec<Record>>> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AdminError::Cache(format!("Failed to get Redis connection: {e}")))?;

        let payload: Option<String> = redis::cmd("GET")
            .arg(format!("{KEY_PREFIX}{key}"))
            .query_async(&mut *conn)
            .await?;

        match payload {
            Some(json) => match serde_json::from_str(&json) {
                Ok(records) => Ok(Some(records)),
                Err(e) => {
                    // Stale payload from an older record layout; treat as a miss
                    warn!(key = %key, error = %e, "Discarding undecodable cached values");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, records: &[Record], ttl: Duration) -> AdminResult<()> {
        let payload = serde_json::to_string(records)?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AdminError::Cache(format!("Failed to get Redis connection: {e}")))?;

        let _: () = redis::cmd("SET")
            .arg(format!("{KEY_PREFIX}{key}"))
            .arg(payload)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut *conn)
            .await?;

        Ok(())
    }
}
