//! Database pool with split reader/writer connections in WAL mode.
//!
//! SQLite allows only one writer at a time. `DatabasePool` keeps a
//! multi-connection reader pool for concurrent reads and a single-connection
//! writer pool for serialized writes. Both use WAL journal mode and enforce
//! foreign keys, which the conversation and message cascades depend on.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::config::resolve_data_dir;

/// File name of the database inside the data directory.
pub const DATABASE_FILE: &str = "threadline.db";

/// Split read/write pool for SQLite with WAL mode.
///
/// - `reader`: Multi-connection pool (up to 8) for concurrent SELECT queries.
/// - `writer`: Single-connection pool for serialized INSERT/UPDATE/DELETE.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open (creating if missing) the database at `database_url`.
    ///
    /// Runs migrations on the writer before the reader pool is opened, so
    /// read-only connections always see the final schema.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let base_opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        let read_opts = base_opts.clone().read_only(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(base_opts)
            .await?;

        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(read_opts)
            .await?;

        debug!(url = database_url, "Database pool ready");
        Ok(Self { reader, writer })
    }
}

/// `sqlite://` URL for the database file inside `data_dir`.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}", data_dir.join(DATABASE_FILE).display())
}

/// Database URL inside the resolved data directory
/// (`THREADLINE_DATA_DIR`, else `~/.threadline`).
pub fn default_database_url() -> String {
    database_url(&resolve_data_dir())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::DatabasePool;

    /// Fresh migrated database in a leaked temp dir.
    pub async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::test_pool;
    use super::*;

    #[tokio::test]
    async fn test_pool_creates_tables() {
        let pool = test_pool().await;

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(&pool.reader)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(table_names, vec!["api_keys", "conversations", "messages", "users"]);
    }

    #[tokio::test]
    async fn test_pool_wal_mode() {
        let pool = test_pool().await;
        let result: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();
        assert_eq!(result.0.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_pool_foreign_keys_enforced() {
        let pool = test_pool().await;
        let result: (i32,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool.writer)
            .await
            .unwrap();
        assert_eq!(result.0, 1, "foreign keys should be enabled");
    }

    #[test]
    fn test_database_url_points_into_data_dir() {
        let url = database_url(Path::new("/var/lib/threadline"));
        assert_eq!(url, "sqlite:///var/lib/threadline/threadline.db");
    }
}
