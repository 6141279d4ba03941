//! Process-wide admin state
//!
//! Holds the handles that must outlive a single request: the store, the
//! related-values cache, URL generation, and configuration. Handlers derive
//! a request-scoped [`AdminContext`] from it, either explicitly through
//! [`AdminState::context`] or by extracting `AdminContext` from a router
//! whose state provides an `AdminState`.
//!
//! # Example
//!
//! ```rust,no_run
//! use acton_admin::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(pool: sqlx::SqlitePool) -> anyhow::Result<()> {
//! let config = AdminConfig::load_for_service("backoffice")?;
//! let state = AdminState::from_config(Arc::new(SqliteStore::new(pool)), config)?;
//!
//! let app: axum::Router = axum::Router::new()
//!     .route(
//!         "/admin/countries",
//!         axum::routing::get(|ctx: AdminContext| async move {
//!             ctx.params().scalar("query-tag").unwrap_or_default().to_string()
//!         }),
//!     )
//!     .with_state(state);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::cache::CacheHandle;
use crate::config::AdminConfig;
use crate::context::AdminContext;
use crate::error::AdminResult;
use crate::query::Store;
use crate::routing::UrlBuilder;

/// Shared state every request context is derived from
#[derive(Debug, Clone)]
pub struct AdminState {
    store: Arc<dyn Store>,
    cache: CacheHandle,
    urls: UrlBuilder,
    config: Arc<AdminConfig>,
}

impl AdminState {
    /// State over `store` with default configuration and an in-memory cache
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        let config = AdminConfig::default();
        Self {
            store,
            cache: CacheHandle::memory(),
            urls: UrlBuilder::new(config.route_prefix.clone()),
            config: Arc::new(config),
        }
    }

    /// State built from configuration (cache backend, TTL, route prefix)
    ///
    /// The cache backend is created once here and shared by every context.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`](crate::error::AdminError::Configuration)
    /// if the configured cache backend is unavailable.
    pub fn from_config(store: Arc<dyn Store>, config: AdminConfig) -> AdminResult<Self> {
        let cache = CacheHandle::from_settings(&config.cache)?;
        Ok(Self {
            store,
            cache,
            urls: UrlBuilder::new(config.route_prefix.clone()),
            config: Arc::new(config),
        })
    }

    /// Replace the shared cache
    #[must_use]
    pub fn with_cache(mut self, cache: CacheHandle) -> Self {
        self.cache = cache;
        self
    }

    /// Fresh request context sharing this state's store and cache
    #[must_use]
    pub fn context(&self) -> AdminContext {
        AdminContext::from_shared(
            Arc::clone(&self.store),
            self.cache.clone(),
            self.urls.clone(),
            Arc::clone(&self.config),
        )
    }

    /// Data store
    #[must_use]
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Shared result cache
    #[must_use]
    pub const fn cache(&self) -> &CacheHandle {
        &self.cache
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.config
    }
}
