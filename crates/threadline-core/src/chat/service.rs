//! Owner-scoped read and delete access to conversations.
//!
//! Every operation takes the caller's `UserId`. A conversation owned by
//! someone else is reported as `NotFound`, never as forbidden, so callers
//! cannot probe for other users' conversation ids.

use std::sync::Arc;

use threadline_types::chat::{ChatMessage, Conversation};
use threadline_types::error::{ConversationError, RepositoryError};
use threadline_types::user::UserId;
use tracing::info;
use uuid::Uuid;

use crate::chat::repository::ConversationRepository;

/// Conversation history browsing for a single authenticated user.
pub struct ConversationService<C: ConversationRepository> {
    repo: Arc<C>,
}

impl<C: ConversationRepository> ConversationService<C> {
    pub fn new(repo: Arc<C>) -> Self {
        Self { repo }
    }

    /// All of `user_id`'s conversations, newest first.
    pub async fn list(&self, user_id: &UserId) -> Result<Vec<Conversation>, ConversationError> {
        Ok(self.repo.list_conversations(user_id).await?)
    }

    /// A single conversation owned by `user_id`.
    pub async fn get(
        &self,
        user_id: &UserId,
        conversation_id: &Uuid,
    ) -> Result<Conversation, ConversationError> {
        match self.repo.get_conversation(conversation_id).await? {
            Some(conversation) if conversation.user_id == *user_id => Ok(conversation),
            _ => Err(ConversationError::NotFound),
        }
    }

    /// Full message history of an owned conversation, oldest first.
    pub async fn messages(
        &self,
        user_id: &UserId,
        conversation_id: &Uuid,
    ) -> Result<Vec<ChatMessage>, ConversationError> {
        let conversation = self.get(user_id, conversation_id).await?;
        Ok(self.repo.get_messages(&conversation.id).await?)
    }

    /// Delete an owned conversation together with its messages.
    ///
    /// The next turn for this user resolves to their next most recent
    /// conversation, or creates a fresh one.
    pub async fn delete(
        &self,
        user_id: &UserId,
        conversation_id: &Uuid,
    ) -> Result<(), ConversationError> {
        let conversation = self.get(user_id, conversation_id).await?;
        match self.repo.delete_conversation(&conversation.id).await {
            Ok(()) => {
                info!(conversation_id = %conversation.id, "Conversation deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(ConversationError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}
