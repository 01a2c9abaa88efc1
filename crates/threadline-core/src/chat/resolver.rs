//! Get-or-create of a user's current conversation.
//!
//! Find-or-create is serialized per user within this process: concurrent
//! resolves for a user without conversations produce exactly one. Separate
//! processes sharing a database can still race; callers then get *a*
//! conversation for the user, not necessarily the only one.

use std::sync::Arc;

use dashmap::DashMap;
use threadline_types::chat::{Conversation, DEFAULT_CONVERSATION_TITLE};
use threadline_types::error::RepositoryError;
use threadline_types::user::UserId;
use tokio::sync::Mutex;
use tracing::info;

use crate::chat::repository::ConversationRepository;

/// Resolves the conversation a new turn belongs to.
pub struct ConversationResolver<C: ConversationRepository> {
    repo: Arc<C>,
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl<C: ConversationRepository> ConversationResolver<C> {
    pub fn new(repo: Arc<C>) -> Self {
        Self {
            repo,
            locks: DashMap::new(),
        }
    }

    /// Return the user's latest conversation, creating one if none exists.
    pub async fn resolve(&self, user_id: UserId) -> Result<Conversation, RepositoryError> {
        let lock = self.locks.entry(user_id).or_default().clone();
        let result = {
            let _guard = lock.lock().await;
            self.find_or_create(user_id).await
        };

        // Evict the entry once no other resolve holds or waits on it
        drop(lock);
        self.locks
            .remove_if(&user_id, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    async fn find_or_create(&self, user_id: UserId) -> Result<Conversation, RepositoryError> {
        if let Some(conversation) = self.repo.latest_conversation(&user_id).await? {
            return Ok(conversation);
        }

        let conversation = Conversation::new(user_id, DEFAULT_CONVERSATION_TITLE);
        let created = self.repo.create_conversation(&conversation).await?;
        info!(user_id = %user_id, conversation_id = %created.id, "Conversation created");
        Ok(created)
    }

    #[cfg(test)]
    fn lock_entries(&self) -> usize {
        self.locks.len()
    }
}
