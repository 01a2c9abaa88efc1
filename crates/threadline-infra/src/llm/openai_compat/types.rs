//! Chat Completions wire types.
//!
//! These are the OpenAI-shaped request/response structures sent over HTTP.
//! They are NOT the generic LLM types from threadline-types -- those are
//! provider-agnostic.

use serde::{Deserialize, Serialize};

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatCompletionMessage>,
}

/// Role/content pair; no other per-message fields are forwarded.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionMessage {
    pub role: String,
    pub content: String,
}

/// Response body of a non-streaming completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Absent and `null` both mean no choices.
    #[serde(default)]
    pub choices: Option<Vec<ChatCompletionChoice>>,
    /// Checked only after a choice is known to exist.
    #[serde(default)]
    pub usage: Option<ChatCompletionUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChoiceMessage {
    /// Null for refusals and tool-only replies.
    #[serde(default)]
    pub content: Option<String>,
}

/// Usage accounting; only `total_tokens` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
