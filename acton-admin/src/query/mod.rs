//! Backend-neutral query building
//!
//! A [`Query`] is a plain value describing which records of an entity to
//! load: predicates, ordering, paging, and projected columns. It is bound
//! to the [`Store`] that created it, so callers (relation fields, query
//! tags, listing pages) can keep composing predicates and finally call
//! [`Query::get`].
//!
//! Stores declare whether their compiled query text is stable enough to be
//! used as a cache key through [`Store::supports_fingerprint`].
//!
//! # Example
//!
//! ```rust
//! use acton_admin::query::{EntityDescriptor, MemoryStore, Query, Record, Store};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> acton_admin::error::AdminResult<()> {
//! let store = Arc::new(MemoryStore::new());
//! store.insert("countries", Record::from_json("id", json!({"id": 1, "name": "Chile"})));
//!
//! let countries = EntityDescriptor::new("countries").display_column("name");
//! let records = Query::new(store, &countries)
//!     .where_eq("name", "Chile")
//!     .get()
//!     .await?;
//! assert_eq!(records.len(), 1);
//! # Ok(())
//! # }
//! ```

mod entity;
mod fingerprint;
mod memory;
mod record;
mod sql;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use entity::EntityDescriptor;
pub use fingerprint::Fingerprint;
pub use memory::MemoryStore;
pub use record::{value_to_label, Record, RelationValue};
pub use sql::CompiledQuery;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use sea_query::SelectStatement;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::AdminResult;

/// A data source able to execute [`Query`] values
#[async_trait]
pub trait Store: Send + Sync + fmt::Debug {
    /// Whether compiled queries of this store are stable cache keys
    ///
    /// Stores that cannot render a faithful textual form of a query
    /// (document stores, in-memory fixtures) return `false`; callers then
    /// skip caching and execute directly.
    fn supports_fingerprint(&self) -> bool;

    /// Execute the query and hydrate its records, in result order
    async fn fetch(&self, query: &Query) -> AdminResult<Vec<Record>>;
}

/// Comparison operator of a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `LIKE` with `%` and `_` wildcards
    Like,
    /// `IN (...)`, value is an array
    In,
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    NotNull,
}

/// A single `column op value` condition; conditions are AND-ed
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Column name
    pub column: String,
    /// Operator
    pub operator: Operator,
    /// Right-hand side (ignored by null checks)
    pub value: Value,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

/// A query over one entity, bound to the store that will run it
#[derive(Clone)]
pub struct Query {
    store: Arc<dyn Store>,
    entity: EntityDescriptor,
    columns: Vec<String>,
    predicates: Vec<Predicate>,
    order: Vec<(String, Direction)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("entity", &self.entity.name)
            .field("columns", &self.columns)
            .field("predicates", &self.predicates)
            .field("order", &self.order)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl Query {
    /// Base query selecting every record of `entity`
    #[must_use]
    pub fn new(store: Arc<dyn Store>, entity: &EntityDescriptor) -> Self {
        Self {
            store,
            entity: entity.clone(),
            columns: Vec::new(),
            predicates: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Queried entity
    #[must_use]
    pub const fn entity(&self) -> &EntityDescriptor {
        &self.entity
    }

    /// Projected columns (empty means all)
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Conditions, in the order they were added
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Ordering clauses
    #[must_use]
    pub fn ordering(&self) -> &[(String, Direction)] {
        &self.order
    }

    /// Row limit
    #[must_use]
    pub const fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    /// Row offset
    #[must_use]
    pub const fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    /// Restrict the selected columns (the primary key is always selected)
    #[must_use]
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        if !self.columns.is_empty() && !self.columns.contains(&self.entity.primary_key) {
            self.columns.insert(0, self.entity.primary_key.clone());
        }
        self
    }

    /// Add a `column op value` condition
    #[must_use]
    pub fn where_op(
        mut self,
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Self {
        self.predicates.push(Predicate {
            column: column.into(),
            operator,
            value: value.into(),
        });
        self
    }

    /// `column = value`
    #[must_use]
    pub fn where_eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_op(column, Operator::Eq, value)
    }

    /// `column <> value`
    #[must_use]
    pub fn where_ne(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_op(column, Operator::Ne, value)
    }

    /// `column LIKE pattern`
    #[must_use]
    pub fn where_like(self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.where_op(column, Operator::Like, Value::String(pattern.into()))
    }

    /// `column IN (values...)`
    #[must_use]
    pub fn where_in<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect::<Vec<_>>();
        self.where_op(column, Operator::In, Value::Array(values))
    }

    /// `column IS NULL`
    #[must_use]
    pub fn where_null(self, column: impl Into<String>) -> Self {
        self.where_op(column, Operator::IsNull, Value::Null)
    }

    /// `column IS NOT NULL`
    #[must_use]
    pub fn where_not_null(self, column: impl Into<String>) -> Self {
        self.where_op(column, Operator::NotNull, Value::Null)
    }

    /// Ascending order on `column`
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order.push((column.into(), Direction::Asc));
        self
    }

    /// Descending order on `column`
    #[must_use]
    pub fn order_by_desc(mut self, column: impl Into<String>) -> Self {
        self.order.push((column.into(), Direction::Desc));
        self
    }

    /// Limit the number of rows
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip rows
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Page `page` (1-based) of `per_page` rows
    #[must_use]
    pub const fn for_page(self, page: u64, per_page: u64) -> Self {
        let page = if page == 0 { 1 } else { page };
        self.limit(per_page).offset((page - 1) * per_page)
    }

    /// The `sea-query` statement this query compiles to
    #[must_use]
    pub fn to_statement(&self) -> SelectStatement {
        sql::statement(self)
    }

    /// Compile to SQLite with positional placeholders
    #[must_use]
    pub fn to_sql(&self) -> CompiledQuery {
        sql::compile(self)
    }

    /// Compile to SQLite with values inlined as literals
    #[must_use]
    pub fn to_raw_sql(&self) -> String {
        sql::compile_raw(self)
    }

    /// Stable cache key, if the bound store supports fingerprinting
    #[must_use]
    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.store
            .supports_fingerprint()
            .then(|| Fingerprint::of(&self.to_raw_sql()))
    }

    /// Execute against the bound store
    pub async fn get(&self) -> AdminResult<Vec<Record>> {
        self.store.fetch(self).await
    }
}
