//! OpenAI-compatible LLM provider implementation.
//!
//! A single [`OpenAiCompatibleProvider`] serves every backend speaking the
//! Chat Completions protocol (OpenAI, Deepseek, and anything registered in
//! `config.toml`) via a configurable base URL, credential, and optional
//! upstream model override.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when the `Authorization` header is built.

pub mod config;
pub mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use threadline_core::llm::provider::LlmProvider;
use threadline_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use self::config::OpenAiCompatConfig;
use self::types::{ChatCompletionMessage, ChatCompletionRequest, ChatCompletionResponse};

/// Upper bound on the upstream error body kept in [`LlmError::Http`].
const MAX_ERROR_BODY: usize = 2048;

/// Unified provider for any OpenAI-compatible API.
///
/// Does NOT derive Debug so the API key cannot leak through `{:?}`.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    provider_name: String,
    base_url: String,
    api_key: SecretString,
    upstream_model: Option<String>,
}

impl OpenAiCompatibleProvider {
    /// Create a provider from its configuration.
    ///
    /// No overall request timeout is set on the client; the turn
    /// orchestrator owns the deadline.
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            provider_name: config.provider_name,
            base_url: config.base_url,
            api_key: config.api_key,
            upstream_model: config.upstream_model,
        }
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Translate a generic request into the wire shape.
    fn build_request(&self, request: &CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self
                .upstream_model
                .clone()
                .unwrap_or_else(|| request.model.clone()),
            messages: request
                .messages
                .iter()
                .map(|m| ChatCompletionMessage {
                    role: m.role.to_string(),
                    content: m.content.clone(),
                })
                .collect(),
        }
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.build_request(request);

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let mut error_body = response.text().await.unwrap_or_default();
            if error_body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| error_body.is_char_boundary(*i))
                    .unwrap_or(0);
                error_body.truncate(cut);
            }
            return Err(LlmError::Http {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let choice = parsed
            .choices
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyCompletion)?;
        let usage = parsed.usage.ok_or_else(|| {
            LlmError::Deserialization("response has no usage.total_tokens".to_string())
        })?;

        debug!(
            provider = %self.provider_name,
            model = %body.model,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "Completion received"
        );

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            token_count: usage.total_tokens,
        })
    }
}
