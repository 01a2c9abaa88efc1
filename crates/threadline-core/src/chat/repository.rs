//! ConversationRepository trait definition.
//!
//! Provides the storage port for conversations and their messages.
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use threadline_types::chat::{ChatMessage, Conversation};
use threadline_types::error::RepositoryError;
use threadline_types::user::UserId;
use uuid::Uuid;

/// Repository trait for conversation and message persistence.
///
/// Implementations live in threadline-infra (e.g., `SqliteConversationRepository`).
/// Each method is an independent commit; there is no cross-call transaction.
pub trait ConversationRepository: Send + Sync {
    /// Insert a new conversation.
    fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// The user's conversation with the latest `created_at` (ties broken by
    /// the larger id).
    fn latest_conversation(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// Get a conversation by its unique ID, regardless of owner.
    fn get_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// List a user's conversations, newest first.
    fn list_conversations(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Delete a conversation and, by cascade, its messages.
    ///
    /// Returns `RepositoryError::NotFound` when nothing was deleted.
    fn delete_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append a message.
    fn save_message(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All messages of a conversation, ordered by created_at ASC.
    fn get_messages(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;
}
