//! Connection settings for an OpenAI-compatible provider.

use secrecy::SecretString;
use threadline_types::config::ProviderSettings;

/// Configuration used to construct an [`super::OpenAiCompatibleProvider`].
///
/// Does not derive Debug: the API key must never reach log output.
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai", "deepseek").
    pub provider_name: String,
    /// Base URL; `/chat/completions` is appended.
    pub base_url: String,
    /// Bearer credential.
    pub api_key: SecretString,
    /// Model sent upstream in place of the requested identifier, if set.
    pub upstream_model: Option<String>,
}

impl OpenAiCompatConfig {
    /// Build from a registry entry and the credential resolved for it.
    pub fn from_settings(settings: &ProviderSettings, api_key: String) -> Self {
        Self {
            provider_name: settings.name.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: SecretString::from(api_key),
            upstream_model: settings.upstream_model.clone(),
        }
    }
}
