//! Writes the two halves of a turn.
//!
//! The user message is written before the provider is called; the assistant
//! message only after a successful reply. The two writes are independent
//! commits, so a failed provider call leaves an unanswered user message.

use std::sync::Arc;

use chrono::Utc;
use threadline_types::chat::{ChatMessage, MessageRole};
use threadline_types::error::RepositoryError;
use uuid::Uuid;

use crate::chat::repository::ConversationRepository;

/// Persists user and assistant turns with token accounting.
pub struct TurnPersister<C: ConversationRepository> {
    repo: Arc<C>,
}

impl<C: ConversationRepository> TurnPersister<C> {
    pub fn new(repo: Arc<C>) -> Self {
        Self { repo }
    }

    /// Record the user's message. Token count is always 0.
    pub async fn record_user_turn(
        &self,
        conversation_id: Uuid,
        content: String,
        model: String,
    ) -> Result<ChatMessage, RepositoryError> {
        self.record(conversation_id, MessageRole::User, content, model, 0)
            .await
    }

    /// Record the provider's reply with its reported token count.
    pub async fn record_assistant_turn(
        &self,
        conversation_id: Uuid,
        content: String,
        model: String,
        token_count: u32,
    ) -> Result<ChatMessage, RepositoryError> {
        self.record(
            conversation_id,
            MessageRole::Assistant,
            content,
            model,
            token_count,
        )
        .await
    }

    async fn record(
        &self,
        conversation_id: Uuid,
        role: MessageRole,
        content: String,
        model: String,
        token_count: u32,
    ) -> Result<ChatMessage, RepositoryError> {
        let message = ChatMessage {
            id: Uuid::now_v7(),
            conversation_id,
            role,
            content,
            model,
            token_count,
            created_at: Utc::now(),
        };

        self.repo.save_message(&message).await?;
        Ok(message)
    }
}
