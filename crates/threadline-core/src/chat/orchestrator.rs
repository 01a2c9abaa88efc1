//! Turn orchestration: one user message in, one assistant reply out.
//!
//! Single pass per request:
//! validate -> resolve conversation -> persist user message -> read history
//! -> build window -> route provider -> call provider -> persist assistant
//! message -> reply.
//!
//! Any step may fail; everything committed before the failure stays
//! committed. There is no compensating rollback.

use std::sync::Arc;
use std::time::Duration;

use threadline_types::chat::TurnReply;
use threadline_types::error::TurnError;
use threadline_types::llm::{CompletionRequest, CompletionResponse, LlmError, Message};
use threadline_types::user::UserId;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span, warn};

use crate::chat::persister::TurnPersister;
use crate::chat::repository::ConversationRepository;
use crate::chat::resolver::ConversationResolver;
use crate::chat::window::{DEFAULT_CONTEXT_WINDOW, build_window};
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::router::ProviderRouter;

/// Inbound turn as received from a transport.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    /// Requested model; `None` or blank selects the router's default.
    pub model: Option<String>,
    pub message: String,
}

/// Tunables fixed at startup.
#[derive(Debug, Clone)]
pub struct TurnSettings {
    /// Maximum number of messages sent to the provider.
    pub context_window: usize,
    /// Deadline for the provider call.
    pub provider_timeout: Duration,
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
            provider_timeout: Duration::from_secs(120),
        }
    }
}

/// Composes resolver, persister, window builder and router into one turn.
///
/// Generic over `ConversationRepository` so threadline-core never depends on
/// threadline-infra.
pub struct TurnOrchestrator<C: ConversationRepository> {
    repo: Arc<C>,
    resolver: ConversationResolver<C>,
    persister: TurnPersister<C>,
    router: ProviderRouter,
    settings: TurnSettings,
}

impl<C: ConversationRepository> TurnOrchestrator<C> {
    pub fn new(repo: Arc<C>, router: ProviderRouter, settings: TurnSettings) -> Self {
        Self {
            resolver: ConversationResolver::new(repo.clone()),
            persister: TurnPersister::new(repo.clone()),
            repo,
            router,
            settings,
        }
    }

    /// Access the provider router.
    pub fn router(&self) -> &ProviderRouter {
        &self.router
    }

    /// Run one turn for `user_id`.
    ///
    /// `cancel` aborts the provider call when triggered; the provider call is
    /// additionally bounded by `TurnSettings::provider_timeout`.
    pub async fn send(
        &self,
        user_id: UserId,
        request: TurnRequest,
        cancel: &CancellationToken,
    ) -> Result<TurnReply, TurnError> {
        if request.message.is_empty() {
            return Err(TurnError::InvalidInput(
                "message must not be empty".to_string(),
            ));
        }

        let conversation = self.resolver.resolve(user_id).await?;
        let model = self.router.effective_model(request.model.as_deref());

        self.persister
            .record_user_turn(conversation.id, request.message, model.clone())
            .await?;

        let history = self.repo.get_messages(&conversation.id).await?;
        let window = build_window(&history, self.settings.context_window);
        let messages: Vec<Message> = window
            .iter()
            .map(|m| Message {
                role: m.role,
                content: m.content.clone(),
            })
            .collect();

        let provider = self.router.route(&model).inspect_err(|e| {
            warn!(conversation_id = %conversation.id, model = %model, error = %e, "Turn could not be routed");
        })?;

        let completion = CompletionRequest {
            model: model.clone(),
            messages,
        };
        let response = self
            .call_provider(provider, &completion, cancel)
            .await
            .inspect_err(|e| {
                warn!(
                    conversation_id = %conversation.id,
                    provider = provider.name(),
                    error = %e,
                    "Provider call failed; user message left unanswered"
                );
            })?;

        self.persister
            .record_assistant_turn(
                conversation.id,
                response.content.clone(),
                model,
                response.token_count,
            )
            .await?;

        info!(
            conversation_id = %conversation.id,
            provider = provider.name(),
            window = completion.messages.len(),
            token_count = response.token_count,
            "Turn completed"
        );

        Ok(TurnReply {
            conversation_id: conversation.id,
            content: response.content,
            token_count: response.token_count,
        })
    }

    async fn call_provider(
        &self,
        provider: &BoxLlmProvider,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<CompletionResponse, LlmError> {
        // Field names follow the OpenTelemetry GenAI semantic conventions.
        let span = info_span!(
            "gen_ai.complete",
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.usage.total_tokens = tracing::field::Empty,
        );
        let timeout = self.settings.provider_timeout;

        let call = async {
            tokio::select! {
                _ = cancel.cancelled() => Err(LlmError::Cancelled),
                result = tokio::time::timeout(timeout, provider.complete(request)) => {
                    result.unwrap_or(Err(LlmError::Timeout {
                        timeout_ms: timeout.as_millis() as u64,
                    }))
                }
            }
        };

        let result = call.instrument(span.clone()).await;
        if let Ok(response) = &result {
            span.record("gen_ai.usage.total_tokens", response.token_count);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use threadline_types::chat::{ChatMessage, MessageRole};
    use threadline_types::llm::RouteError;

    use super::*;
    use crate::testing::{InMemoryConversationRepository, MockProvider, MockReply};

    fn router_with(provider: Option<MockProvider>) -> ProviderRouter {
        let mut router = ProviderRouter::new("deepseek");
        router.register_with_credential(
            "openai",
            vec!["gpt-4".to_string(), "gpt-3.5-turbo".to_string()],
            "OPENAI_API_KEY",
            &HashMap::<String, String>::new(),
            |_| unreachable!("no openai key configured"),
        );
        router.register("deepseek", vec!["deepseek".to_string()], provider.map(BoxLlmProvider::new));
        router
    }

    fn orchestrator(
        repo: &Arc<InMemoryConversationRepository>,
        provider: Option<MockProvider>,
    ) -> TurnOrchestrator<InMemoryConversationRepository> {
        TurnOrchestrator::new(repo.clone(), router_with(provider), TurnSettings::default())
    }

    fn turn(model: &str, message: &str) -> TurnRequest {
        TurnRequest {
            model: Some(model.to_string()),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_first_message() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let provider = MockProvider::ok("deepseek", "hi there", 7);
        let orch = orchestrator(&repo, Some(provider.clone()));
        let user = UserId::new();

        let reply = orch
            .send(user, turn("deepseek", "hello"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(reply.content, "hi there");
        assert_eq!(reply.token_count, 7);
        assert_eq!(repo.conversation_count(), 1);

        let stored = repo.get_messages(&reply.conversation_id).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].role, MessageRole::User);
        assert_eq!(stored[0].content, "hello");
        assert_eq!(stored[0].token_count, 0);
        assert_eq!(stored[1].role, MessageRole::Assistant);
        assert_eq!(stored[1].content, "hi there");
        assert_eq!(stored[1].token_count, 7);

        let sent = provider.recorded();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].messages,
            vec![Message {
                role: MessageRole::User,
                content: "hello".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_second_turn_reuses_conversation_and_sends_history() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let provider = MockProvider::ok("deepseek", "ok", 3);
        let orch = orchestrator(&repo, Some(provider.clone()));
        let user = UserId::new();
        let cancel = CancellationToken::new();

        let first = orch.send(user, turn("deepseek", "one"), &cancel).await.unwrap();
        let second = orch.send(user, turn("deepseek", "two"), &cancel).await.unwrap();

        assert_eq!(first.conversation_id, second.conversation_id);
        assert_eq!(repo.conversation_count(), 1);
        let contents: Vec<String> = provider.recorded()[1]
            .messages
            .iter()
            .map(|m| m.content.clone())
            .collect();
        assert_eq!(contents, vec!["one", "ok", "two"]);
    }

    #[tokio::test]
    async fn test_window_excludes_oldest_messages() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let provider = MockProvider::ok("deepseek", "reply", 1);
        let orch = orchestrator(&repo, Some(provider.clone()));
        let user = UserId::new();

        let conversation = orch.resolver.resolve(user).await.unwrap();
        let mut prior: Vec<ChatMessage> = Vec::new();
        for i in 0..11 {
            let msg = if i % 2 == 0 {
                orch.persister
                    .record_user_turn(conversation.id, format!("m{i}"), "deepseek".into())
                    .await
            } else {
                orch.persister
                    .record_assistant_turn(conversation.id, format!("m{i}"), "deepseek".into(), 1)
                    .await
            };
            prior.push(msg.unwrap());
        }

        orch.send(user, turn("deepseek", "m11"), &CancellationToken::new())
            .await
            .unwrap();

        let sent = &provider.recorded()[0].messages;
        assert_eq!(sent.len(), 10);
        let contents: Vec<&str> = sent.iter().map(|m| m.content.as_str()).collect();
        let expected: Vec<String> = (2..12).map(|i| format!("m{i}")).collect();
        assert_eq!(contents, expected);
        assert_eq!(sent.last().unwrap().role, MessageRole::User);
    }

    #[tokio::test]
    async fn test_provider_failure_keeps_only_user_message() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let orch = orchestrator(
            &repo,
            Some(MockProvider::with_reply("deepseek", MockReply::Http(503))),
        );

        let err = orch
            .send(UserId::new(), turn("deepseek", "hello"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TurnError::Provider(LlmError::Http { status: 503, .. })));
        let stored = repo.all_messages();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].role, MessageRole::User);
    }

    #[tokio::test]
    async fn test_empty_completion_is_surfaced() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let orch = orchestrator(
            &repo,
            Some(MockProvider::with_reply("deepseek", MockReply::Empty)),
        );

        let err = orch
            .send(UserId::new(), turn("deepseek", "hello"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TurnError::Provider(LlmError::EmptyCompletion)));
        assert_eq!(repo.all_messages().len(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_credential_after_user_message() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let orch = orchestrator(&repo, Some(MockProvider::ok("deepseek", "x", 1)));

        let err = orch
            .send(UserId::new(), turn("gpt-4", "hello"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TurnError::Route(RouteError::UnconfiguredCredential { .. })
        ));
        let stored = repo.all_messages();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].model, "gpt-4");
    }

    #[tokio::test]
    async fn test_unsupported_model() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let orch = orchestrator(&repo, Some(MockProvider::ok("deepseek", "x", 1)));

        let err = orch
            .send(UserId::new(), turn("unknown-model", "hello"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TurnError::Route(RouteError::UnsupportedModel(_))));
    }

    #[tokio::test]
    async fn test_missing_model_uses_default() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let provider = MockProvider::ok("deepseek", "hey", 2);
        let orch = orchestrator(&repo, Some(provider.clone()));

        let request = TurnRequest {
            model: None,
            message: "hello".to_string(),
        };
        orch.send(UserId::new(), request, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(provider.recorded()[0].model, "deepseek");
        assert!(repo.all_messages().iter().all(|m| m.model == "deepseek"));
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected_before_any_write() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let orch = orchestrator(&repo, Some(MockProvider::ok("deepseek", "x", 1)));

        let err = orch
            .send(UserId::new(), turn("deepseek", ""), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TurnError::InvalidInput(_)));
        assert_eq!(repo.conversation_count(), 0);
        assert!(repo.all_messages().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_message_is_sent_verbatim() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let provider = MockProvider::ok("deepseek", "?", 1);
        let orch = orchestrator(&repo, Some(provider.clone()));

        orch.send(UserId::new(), turn("deepseek", "   "), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(provider.recorded()[0].messages[0].content, "   ");
        assert_eq!(repo.all_messages()[0].content, "   ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_provider_hits_deadline() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let settings = TurnSettings {
            context_window: 10,
            provider_timeout: Duration::from_secs(5),
        };
        let orch = TurnOrchestrator::new(
            repo.clone(),
            router_with(Some(MockProvider::with_reply("deepseek", MockReply::Hang))),
            settings,
        );

        let err = orch
            .send(UserId::new(), turn("deepseek", "hello"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TurnError::Provider(LlmError::Timeout { timeout_ms: 5000 })
        ));
        assert_eq!(repo.all_messages().len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_token_aborts_provider_call() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let orch = orchestrator(
            &repo,
            Some(MockProvider::with_reply("deepseek", MockReply::Hang)),
        );
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = orch
            .send(UserId::new(), turn("deepseek", "hello"), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, TurnError::Provider(LlmError::Cancelled)));
        assert_eq!(repo.all_messages().len(), 1);
    }

    #[tokio::test]
    async fn test_storage_failure_is_fatal() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        repo.fail_writes();
        let provider = MockProvider::ok("deepseek", "x", 1);
        let orch = orchestrator(&repo, Some(provider.clone()));

        let err = orch
            .send(UserId::new(), turn("deepseek", "hello"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TurnError::Storage(_)));
        assert!(provider.recorded().is_empty());
    }
}
