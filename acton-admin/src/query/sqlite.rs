//! SQLite store backed by a `sqlx` pool

use async_trait::async_trait;
use sea_query::SqliteQueryBuilder;
use sea_query_binder::SqlxBinder;
use serde_json::{Map, Number, Value};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tracing::debug;

use super::{Query, Record, Store};
use crate::error::AdminResult;

/// [`Store`] executing compiled queries on SQLite
///
/// Compiled SQL is deterministic, so this store supports fingerprinting.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wrap an existing pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Store for SqliteStore {
    fn supports_fingerprint(&self) -> bool {
        true
    }

    async fn fetch(&self, query: &Query) -> AdminResult<Vec<Record>> {
        let (sql, values) = query.to_statement().build_sqlx(SqliteQueryBuilder);
        debug!(sql = %sql, "Executing related query");

        let rows = sqlx::query_with(&sql, values).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> AdminResult<Record> {
                Ok(Record::persisted(
                    &query.entity().primary_key,
                    decode_row(row)?,
                ))
            })
            .collect()
    }
}

fn decode_row(row: &SqliteRow) -> AdminResult<Map<String, Value>> {
    let mut attributes = Map::new();

    for column in row.columns() {
        let index = column.ordinal();
        let raw = row.try_get_raw(index)?;

        let value = if raw.is_null() {
            Value::Null
        } else {
            let type_name = raw.type_info().name().to_ascii_uppercase();
            match type_name.as_str() {
                "INTEGER" | "INT" | "BIGINT" | "BOOLEAN" => Value::from(row.try_get::<i64, _>(index)?),
                "REAL" | "FLOAT" | "DOUBLE" => Number::from_f64(row.try_get::<f64, _>(index)?)
                    .map_or(Value::Null, Value::Number),
                "BLOB" => Value::String(hex::encode(row.try_get::<Vec<u8>, _>(index)?)),
                _ => Value::String(row.try_get::<String, _>(index)?),
            }
        };

        attributes.insert(column.name().to_string(), value);
    }

    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{EntityDescriptor, Operator};
    use crate::testing::TestDatabase;

    #[tokio::test]
    async fn test_fetch_decodes_columns() {
        let db = TestDatabase::new().await.unwrap();
        let authors = EntityDescriptor::new("authors").display_column("name");

        let records = Query::new(db.store(), &authors).order_by("id").get().await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].key_string(), "1");
        assert_eq!(records[0].get("name"), Some(&Value::from("Le Guin")));
        assert_eq!(records[0].get("rating"), Some(&Value::from(4.5)));
        assert_eq!(records[0].get("avatar"), Some(&Value::from("ff00")));
        assert_eq!(records[1].get("rating"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_fetch_with_bindings() {
        let db = TestDatabase::new().await.unwrap();
        let authors = EntityDescriptor::new("authors");

        let records = Query::new(db.store(), &authors)
            .where_like("name", "B%")
            .where_op("rating", Operator::Gte, 4.0)
            .get()
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key_string(), "3");
    }

    #[tokio::test]
    async fn test_fetch_empty_table() {
        let db = TestDatabase::empty().await.unwrap();
        let records = Query::new(db.store(), &EntityDescriptor::new("countries"))
            .get()
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_fingerprint_supported() {
        let db = TestDatabase::new().await.unwrap();
        let query = Query::new(db.store(), &EntityDescriptor::new("authors"));
        assert!(query.fingerprint().is_some());
    }
}
