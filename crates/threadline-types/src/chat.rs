//! Conversation and message types for Threadline.
//!
//! A conversation is a thread owned by exactly one user. Messages are
//! append-only turns within it, ordered by `created_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::UserId;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Title given to conversations created implicitly on first send.
pub const DEFAULT_CONVERSATION_TITLE: &str = "New conversation";

/// A conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: UserId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Build a fresh conversation for `user_id` with a UUID v7 id.
    pub fn new(user_id: UserId, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            title: title.into(),
            created_at: Utc::now(),
        }
    }
}

/// A single persisted turn within a conversation.
///
/// `token_count` is always 0 for user messages and the provider-reported
/// total for assistant messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    /// Effective model identifier the turn was sent with.
    pub model: String,
    pub token_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a successful turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReply {
    pub conversation_id: Uuid,
    pub content: String,
    pub token_count: u32,
}
