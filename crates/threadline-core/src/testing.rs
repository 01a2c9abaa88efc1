//! In-memory fakes shared by the unit tests of this crate.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use threadline_types::chat::{ChatMessage, Conversation};
use threadline_types::error::RepositoryError;
use threadline_types::llm::{CompletionRequest, CompletionResponse, LlmError};
use threadline_types::user::{User, UserId};
use uuid::Uuid;

use crate::chat::repository::ConversationRepository;
use crate::llm::provider::LlmProvider;
use crate::repository::user::UserRepository;
use crate::service::keys::{API_KEY_PREFIX, ApiKeyIssuer};

/// Vec-backed `ConversationRepository`.
///
/// Every read yields to the scheduler first so concurrent callers actually
/// interleave between their read and their write.
#[derive(Default)]
pub struct InMemoryConversationRepository {
    conversations: Mutex<Vec<Conversation>>,
    messages: Mutex<Vec<ChatMessage>>,
    fail_writes: Mutex<bool>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation_count(&self) -> usize {
        self.conversations.lock().unwrap().len()
    }

    pub fn all_messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    fn check_writable(&self) -> Result<(), RepositoryError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(RepositoryError::Query("disk full".to_string()));
        }
        Ok(())
    }
}

impl ConversationRepository for InMemoryConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RepositoryError> {
        self.check_writable()?;
        self.conversations
            .lock()
            .unwrap()
            .push(conversation.clone());
        Ok(conversation.clone())
    }

    async fn latest_conversation(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        tokio::task::yield_now().await;
        let conversations = self.conversations.lock().unwrap();
        Ok(conversations
            .iter()
            .filter(|c| c.user_id == *user_id)
            .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            .cloned())
    }

    async fn get_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let conversations = self.conversations.lock().unwrap();
        Ok(conversations.iter().find(|c| c.id == *conversation_id).cloned())
    }

    async fn list_conversations(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let mut owned: Vec<Conversation> = self
            .conversations
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == *user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(owned)
    }

    async fn delete_conversation(&self, conversation_id: &Uuid) -> Result<(), RepositoryError> {
        self.check_writable()?;
        let mut conversations = self.conversations.lock().unwrap();
        let before = conversations.len();
        conversations.retain(|c| c.id != *conversation_id);
        if conversations.len() == before {
            return Err(RepositoryError::NotFound);
        }
        self.messages
            .lock()
            .unwrap()
            .retain(|m| m.conversation_id != *conversation_id);
        Ok(())
    }

    async fn save_message(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        self.check_writable()?;
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn get_messages(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut messages: Vec<ChatMessage> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.conversation_id == *conversation_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(messages)
    }
}

#[derive(Clone)]
pub enum MockReply {
    Success { content: String, token_count: u32 },
    Empty,
    Http(u16),
    Hang,
}

/// Scripted provider that records every request it receives.
#[derive(Clone)]
pub struct MockProvider {
    name: String,
    reply: MockReply,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    pub fn ok(name: &str, content: &str, token_count: u32) -> Self {
        Self::with_reply(
            name,
            MockReply::Success {
                content: content.to_string(),
                token_count,
            },
        )
    }

    pub fn with_reply(name: &str, reply: MockReply) -> Self {
        Self {
            name: name.to_string(),
            reply,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn recorded(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.reply.clone();
        async move {
            match reply {
                MockReply::Success {
                    content,
                    token_count,
                } => Ok(CompletionResponse {
                    content,
                    token_count,
                }),
                MockReply::Empty => Err(LlmError::EmptyCompletion),
                MockReply::Http(status) => Err(LlmError::Http {
                    status,
                    body: String::new(),
                }),
                MockReply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(LlmError::Transport("unreachable".to_string()))
                }
            }
        }
    }
}

/// Vec-backed `UserRepository`.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    keys: Mutex<Vec<(UserId, String)>>,
    touches: Mutex<usize>,
    fail_key_writes: Mutex<bool>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored_hashes(&self) -> Vec<String> {
        self.keys.lock().unwrap().iter().map(|(_, h)| h.clone()).collect()
    }

    pub fn touch_count(&self) -> usize {
        *self.touches.lock().unwrap()
    }

    pub fn fail_key_writes(&self, fail: bool) {
        *self.fail_key_writes.lock().unwrap() = fail;
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create_user_with_key(
        &self,
        user: &User,
        key_hash: &str,
        _key_name: &str,
    ) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(user.email.clone()));
        }
        if *self.fail_key_writes.lock().unwrap() {
            return Err(RepositoryError::Query("api_keys unavailable".to_string()));
        }
        users.push(user.clone());
        self.keys.lock().unwrap().push((user.id, key_hash.to_string()));
        Ok(user.clone())
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == *user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_key_hash(&self, key_hash: &str) -> Result<Option<User>, RepositoryError> {
        let owner = self
            .keys
            .lock()
            .unwrap()
            .iter()
            .find(|(_, h)| h == key_hash)
            .map(|(id, _)| *id);
        match owner {
            Some(id) => self.get_user(&id).await,
            None => Ok(None),
        }
    }

    async fn touch_api_key(&self, _key_hash: &str) -> Result<(), RepositoryError> {
        *self.touches.lock().unwrap() += 1;
        Ok(())
    }
}

/// Deterministic issuer: sequential keys, reversed-string "hash".
#[derive(Default)]
pub struct PlainKeyIssuer {
    counter: Mutex<u32>,
}

impl ApiKeyIssuer for PlainKeyIssuer {
    fn generate(&self) -> String {
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;
        format!("{API_KEY_PREFIX}{:08}", *counter)
    }

    fn hash(&self, key: &str) -> String {
        format!("h:{}", key.chars().rev().collect::<String>())
    }
}
