//! SQLite user and API key repository implementation.
//!
//! Implements `UserRepository` from `threadline-core`. Only key hashes are
//! ever written; the plaintext never reaches this layer.

use chrono::Utc;
use sqlx::Row;
use threadline_core::repository::user::UserRepository;
use threadline_types::error::RepositoryError;
use threadline_types::user::{User, UserId};
use uuid::Uuid;

use super::conversation::{format_datetime, parse_datetime};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch_user(
        &self,
        sql: &str,
        param: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(sql)
            .bind(param)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }
}

fn map_insert_error(e: sqlx::Error, email: &str) -> RepositoryError {
    match e {
        sqlx::Error::Database(db_err) if db_err.message().contains("users.email") => {
            RepositoryError::Conflict(format!("email '{email}' already exists"))
        }
        sqlx::Error::Database(db_err) if db_err.message().contains("UNIQUE") => {
            RepositoryError::Conflict(db_err.message().to_string())
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

struct UserRow {
    id: String,
    email: String,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        let id = self
            .id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;

        Ok(User {
            id,
            email: self.email,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create_user_with_key(
        &self,
        user: &User,
        key_hash: &str,
        key_name: &str,
    ) -> Result<User, RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query("INSERT INTO users (id, email, created_at) VALUES (?, ?, ?)")
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(format_datetime(&user.created_at))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, &user.email))?;

        sqlx::query(
            "INSERT INTO api_keys (id, user_id, name, key_hash, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(user.id.to_string())
        .bind(key_name)
        .bind(key_hash)
        .bind(format_datetime(&user.created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| map_insert_error(e, &user.email))?;

        // Dropping an uncommitted transaction rolls back the user row
        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(user.clone())
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, RepositoryError> {
        self.fetch_user("SELECT * FROM users WHERE id = ?", &user_id.to_string())
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_user("SELECT * FROM users WHERE email = ?", email)
            .await
    }

    async fn find_user_by_key_hash(&self, key_hash: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_user(
            "SELECT u.* FROM users u JOIN api_keys k ON k.user_id = u.id WHERE k.key_hash = ?",
            key_hash,
        )
        .await
    }

    async fn touch_api_key(&self, key_hash: &str) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE api_keys SET last_used_at = ? WHERE key_hash = ?")
            .bind(format_datetime(&Utc::now()))
            .bind(key_hash)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }
}
