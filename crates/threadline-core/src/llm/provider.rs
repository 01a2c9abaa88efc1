//! LlmProvider trait definition.
//!
//! This is the core abstraction that every provider adapter implements.
//! Uses RPITIT for `complete`; [`super::box_provider::BoxLlmProvider`]
//! erases the concrete type for the router.

use threadline_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends (OpenAI-compatible, Deepseek, ...).
///
/// Implementations live in threadline-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai", "deepseek").
    fn name(&self) -> &str;

    /// Send the message list and receive the full reply.
    ///
    /// Only role and content of each message are forwarded upstream.
    /// Dropping the returned future aborts the in-flight request.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
