//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `threadline-core` using sqlx with
//! split read/write pools: raw queries, private Row structs.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use threadline_core::chat::repository::ConversationRepository;
use threadline_types::chat::{ChatMessage, Conversation, MessageRole};
use threadline_types::error::RepositoryError;
use threadline_types::user::UserId;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ConversationRow {
    id: String,
    user_id: String,
    title: String,
    created_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid conversation id: {e}")))?;
        let user_id = self
            .user_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;

        Ok(Conversation {
            id,
            user_id,
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct MessageRow {
    id: String,
    conversation_id: String,
    role: String,
    content: String,
    model: String,
    token_count: i64,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            model: row.try_get("model")?,
            token_count: row.try_get("token_count")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let conversation_id = Uuid::parse_str(&self.conversation_id)
            .map_err(|e| RepositoryError::Query(format!("invalid conversation_id: {e}")))?;
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChatMessage {
            id,
            conversation_id,
            role,
            content: self.content,
            model: self.model,
            token_count: self.token_count as u32,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width form so `ORDER BY created_at` on the text column is
/// chronological.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversations_from_rows(
    rows: &[sqlx::sqlite::SqliteRow],
) -> Result<Vec<Conversation>, RepositoryError> {
    rows.iter()
        .map(|row| {
            ConversationRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_conversation()
        })
        .collect()
}

impl ConversationRepository for SqliteConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RepositoryError> {
        sqlx::query("INSERT INTO conversations (id, user_id, title, created_at) VALUES (?, ?, ?, ?)")
            .bind(conversation.id.to_string())
            .bind(conversation.user_id.to_string())
            .bind(&conversation.title)
            .bind(format_datetime(&conversation.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(conversation.clone())
    }

    async fn latest_conversation(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        // Read through the writer: the resolver's find-then-create must see
        // its own committed insert immediately.
        let row = sqlx::query(
            "SELECT * FROM conversations WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let conv_row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(conv_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn get_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ?")
            .bind(conversation_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let conv_row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(conv_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn list_conversations(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM conversations WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        conversations_from_rows(&rows)
    }

    async fn delete_conversation(&self, conversation_id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(conversation_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn save_message(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO messages (id, conversation_id, role, content, model, token_count, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(message.id.to_string())
        .bind(message.conversation_id.to_string())
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(&message.model)
        .bind(i64::from(message.token_count))
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("FOREIGN KEY") => {
                Err(RepositoryError::NotFound)
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get_messages(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        // Writer again: the orchestrator re-reads history right after
        // persisting the user message.
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE conversation_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_id.to_string())
        .fetch_all(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }
}
