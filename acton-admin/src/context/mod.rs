//! Explicit execution context for admin operations
//!
//! Every operation that needs request state, the shared cache, the current
//! resource, or URL generation receives an [`AdminContext`] instead of
//! reaching for process-wide singletons.
//!
//! # Example
//!
//! ```rust,no_run
//! use acton_admin::context::{AdminContext, RequestParams};
//! use acton_admin::query::MemoryStore;
//! use std::sync::Arc;
//!
//! async fn listing(params: RequestParams) -> String {
//!     let ctx = AdminContext::new(Arc::new(MemoryStore::new())).with_params(params);
//!     ctx.params().scalar("query-tag").unwrap_or_default().to_string()
//! }
//! ```

use axum::extract::{rejection::QueryRejection, FromRef, FromRequestParts, Query as QueryString};
use http::request::Parts;
use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::CacheHandle;
use crate::config::AdminConfig;
use crate::query::{EntityDescriptor, Query, Store};
use crate::resource::Resource;
use crate::routing::UrlBuilder;
use crate::state::AdminState;

/// Query-string parameters of the current request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    params: HashMap<String, String>,
}

impl RequestParams {
    /// Empty parameter set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Whether `name` is present with a non-blank value
    #[must_use]
    pub fn filled(&self, name: &str) -> bool {
        self.params
            .get(name)
            .is_some_and(|value| !value.trim().is_empty())
    }

    /// Value of `name`, if present
    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

impl From<HashMap<String, String>> for RequestParams {
    fn from(params: HashMap<String, String>) -> Self {
        Self { params }
    }
}

impl<S> FromRequestParts<S> for RequestParams
where
    S: Send + Sync,
{
    type Rejection = QueryRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let QueryString(params) =
            QueryString::<HashMap<String, String>>::from_request_parts(parts, state).await?;
        Ok(Self { params })
    }
}

impl<S> FromRequestParts<S> for AdminContext
where
    AdminState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = QueryRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = RequestParams::from_request_parts(parts, state).await?;
        Ok(AdminState::from_ref(state).context().with_params(params))
    }
}

/// Request-scoped handles used by fields, query tags, and form assembly
#[derive(Debug, Clone)]
pub struct AdminContext {
    params: RequestParams,
    store: Arc<dyn Store>,
    cache: CacheHandle,
    resource: Option<Arc<dyn Resource>>,
    urls: UrlBuilder,
    config: Arc<AdminConfig>,
}

impl AdminContext {
    /// Context over `store` with default configuration and its own
    /// in-memory cache
    ///
    /// Handlers serving many requests should build contexts from a shared
    /// [`AdminState`] so cached related values outlive a single request.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        AdminState::new(store).context()
    }

    pub(crate) fn from_shared(
        store: Arc<dyn Store>,
        cache: CacheHandle,
        urls: UrlBuilder,
        config: Arc<AdminConfig>,
    ) -> Self {
        Self {
            params: RequestParams::default(),
            store,
            cache,
            resource: None,
            urls,
            config,
        }
    }

    /// Attach the current request's parameters
    #[must_use]
    pub fn with_params(mut self, params: RequestParams) -> Self {
        self.params = params;
        self
    }

    /// Share an existing cache (usually one per process)
    #[must_use]
    pub fn with_cache(mut self, cache: CacheHandle) -> Self {
        self.cache = cache;
        self
    }

    /// Set the resource being rendered
    #[must_use]
    pub fn with_resource(mut self, resource: Arc<dyn Resource>) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Request parameters
    #[must_use]
    pub const fn params(&self) -> &RequestParams {
        &self.params
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

    /// Resource being rendered, if any
    #[must_use]
    pub fn resource(&self) -> Option<&Arc<dyn Resource>> {
        self.resource.as_ref()
    }

    /// URL builder
    #[must_use]
    pub const fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    /// Base query over `entity` bound to this context's store
    #[must_use]
    pub fn new_query(&self, entity: &EntityDescriptor) -> Query {
        Query::new(Arc::clone(&self.store), entity)
    }
}
