//! acton-admin: declarative admin-panel building blocks for axum applications
//!
//! The crate provides the pieces an admin panel assembles its CRUD screens
//! from:
//! - **Fields**: text, select, date range, and relation pickers that fill
//!   from records, preview for listings, and render form controls
//! - **Related values**: option lists of relation fields, memoized per field
//!   and cached briefly across fields by query fingerprint
//! - **Query tags**: named, request-selectable filters of a listing
//! - **Relation forms**: the nested create/update/delete form of a to-one
//!   relation
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use acton_admin::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(pool: sqlx::SqlitePool) -> anyhow::Result<()> {
//! acton_admin::observability::init()?;
//!
//! let config = AdminConfig::load_for_service("backoffice")?;
//! let state = AdminState::from_config(Arc::new(SqliteStore::new(pool)), config)?;
//! let ctx = state.context();
//!
//! let mut country = BelongsTo::new(
//!     "Country",
//!     RelationDescriptor::to_one("country", EntityDescriptor::new("countries").display_column("name")),
//! );
//! let options = country.get_values(&ctx).await?;
//! println!("{} countries", options.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `sqlite` - `SQLite` store via sqlx (default)
//! - `redis` - Redis-backed result cache

// Lint configuration is handled at the workspace level in Cargo.toml

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod fields;
pub mod forms;
pub mod observability;
pub mod query;
pub mod query_tags;
pub mod resource;
pub mod routing;
pub mod state;
pub mod support;

#[cfg(test)]
pub mod testing;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! # Examples
    //!
    //! ```rust
    //! use acton_admin::prelude::*;
    //! ```

    // Fields
    pub use crate::fields::{
        BelongsTo, BelongsToMany, DateRange, Field, FieldCore, FieldExt, HasOne,
        HasRelatedValues, HasRelation, OptionSet, RelationDescriptor, Select, Selected, Text,
    };

    // Forms
    pub use crate::forms::{
        ActionButton, FormAction, FormBuilder, FormField, FormRenderer, InputType,
        RelationForm, RelationFormAssembler,
    };

    // Query building
    pub use crate::query::{EntityDescriptor, MemoryStore, Query, Record, RelationValue, Store};
    #[cfg(feature = "sqlite")]
    pub use crate::query::SqliteStore;

    // Query tags
    pub use crate::query_tags::{QueryTag, QueryTagSet};

    // Request context and resources
    pub use crate::cache::CacheHandle;
    pub use crate::config::AdminConfig;
    pub use crate::context::{AdminContext, RequestParams};
    pub use crate::resource::{ModelResource, Resource};
    pub use crate::routing::UrlBuilder;
    pub use crate::state::AdminState;

    // Error types
    pub use crate::error::{AdminError, AdminResult};

    // Re-export key dependencies
    pub use axum;
    pub use serde_json::json;
}
