//! LLM request/response types for Threadline.
//!
//! These types model the provider-agnostic data shapes for a completion call:
//! the role/content message list sent upstream, the normalized reply, and the
//! failure taxonomy for routing and provider calls.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in a conversation.
///
/// Only the two conversational roles exist; no system prompt is ever stored
/// or forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single role/content pair as forwarded to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// Request to an LLM provider for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier as requested by the caller (after default substitution).
    pub model: String,
    pub messages: Vec<Message>,
}

/// Normalized provider reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    /// Total tokens reported by the provider's usage accounting.
    pub token_count: u32,
}

/// Errors from a provider call.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider returned HTTP {status}")]
    Http { status: u16, body: String },

    #[error("provider returned no choices")]
    EmptyCompletion,

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("provider call exceeded {timeout_ms}ms deadline")]
    Timeout { timeout_ms: u64 },

    #[error("provider call cancelled")]
    Cancelled,
}

/// Errors from resolving a model identifier to a provider.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("no API key configured for provider '{provider}'")]
    UnconfiguredCredential { provider: String },

    #[error("unsupported model: '{0}'")]
    UnsupportedModel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Assistant] {
            let parsed: MessageRole = role.to_string().parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_rejects_system() {
        assert!("system".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_message_serializes_role_and_content_only() {
        let msg = Message {
            role: MessageRole::Assistant,
            content: "hi".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json, serde_json::json!({"role": "assistant", "content": "hi"}));
    }

    #[test]
    fn test_route_error_display() {
        let err = RouteError::UnconfiguredCredential {
            provider: "openai".to_string(),
        };
        assert_eq!(err.to_string(), "no API key configured for provider 'openai'");
        assert_eq!(
            RouteError::UnsupportedModel("llama".to_string()).to_string(),
            "unsupported model: 'llama'"
        );
    }

    #[test]
    fn test_http_error_display_omits_body() {
        let err = LlmError::Http {
            status: 502,
            body: "upstream exploded".to_string(),
        };
        assert_eq!(err.to_string(), "provider returned HTTP 502");
    }
}
