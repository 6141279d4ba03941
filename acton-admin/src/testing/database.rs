//! In-memory SQLite databases for tests

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;

use crate::query::SqliteStore;

const SCHEMA: &str = "
    CREATE TABLE countries (id INTEGER PRIMARY KEY, name TEXT NOT NULL, code TEXT, flag TEXT);
    CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT NOT NULL, rating REAL, avatar BLOB);
";

const SEED: &str = "
    INSERT INTO countries (id, name, code, flag) VALUES
        (1, 'Chile', 'CL', '/flags/cl.svg'),
        (2, 'Norway', 'NO', NULL),
        (3, 'Japan', 'JP', '/flags/jp.svg');
    INSERT INTO authors (id, name, rating, avatar) VALUES
        (1, 'Le Guin', 4.5, x'ff00'),
        (2, 'Banks', NULL, NULL),
        (3, 'Butler', 4.8, NULL);
";

/// Seeded in-memory SQLite database
///
/// A single connection keeps the in-memory database alive for the lifetime
/// of the pool.
///
/// # Example
///
/// ```rust,ignore
/// let db = TestDatabase::new().await?;
/// let store = db.store();
/// ```
pub struct TestDatabase {
    pool: SqlitePool,
}

impl TestDatabase {
    /// Create the schema and seed rows
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be opened or a statement fails.
    pub async fn new() -> anyhow::Result<Self> {
        let db = Self::empty().await?;
        db.execute(SEED).await?;
        Ok(db)
    }

    /// Create the schema without rows
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be opened or a statement fails.
    pub async fn empty() -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let db = Self { pool };
        db.execute(SCHEMA).await?;
        Ok(db)
    }

    /// Run raw SQL (several statements allowed)
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails.
    pub async fn execute(&self, sql: &str) -> anyhow::Result<()> {
        sqlx::raw_sql(sql).execute(&self.pool).await?;
        Ok(())
    }

    /// Get the connection pool
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Store over this database
    pub fn store(&self) -> Arc<SqliteStore> {
        Arc::new(SqliteStore::new(self.pool.clone()))
    }
}
