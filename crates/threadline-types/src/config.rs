//! Configuration types for Threadline.
//!
//! `AppConfig` represents the top-level `config.toml` that controls the
//! listener address, turn settings, and the provider registry.

use serde::{Deserialize, Serialize};

/// Top-level configuration, loaded from `~/.threadline/config.toml`.
///
/// All fields have defaults; an empty file yields the same config as no file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Model identifier substituted when a turn request names none.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Maximum number of messages sent to a provider per turn.
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Deadline for a single provider call.
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    /// Additional or overriding provider entries.
    ///
    /// An entry whose `name` matches a built-in provider replaces it;
    /// any other entry is appended to the registry.
    #[serde(default)]
    pub providers: Vec<ProviderSettings>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_model() -> String {
    "deepseek".to_string()
}

fn default_context_window() -> usize {
    10
}

fn default_provider_timeout_secs() -> u64 {
    120
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_model: default_model(),
            context_window: default_context_window(),
            provider_timeout_secs: default_provider_timeout_secs(),
            providers: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Built-in providers merged with the configured entries.
    pub fn effective_providers(&self) -> Vec<ProviderSettings> {
        let mut providers = ProviderSettings::builtin();
        for entry in &self.providers {
            match providers.iter_mut().find(|p| p.name == entry.name) {
                Some(existing) => *existing = entry.clone(),
                None => providers.push(entry.clone()),
            }
        }
        providers
    }
}

/// One OpenAI-shaped provider endpoint and the model identifiers it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Provider name used in logs and error messages (e.g. "openai").
    pub name: String,
    /// API base URL; `/chat/completions` is appended.
    pub base_url: String,
    /// Environment variable holding the bearer credential.
    pub api_key_env: String,
    /// Model identifiers routed to this provider.
    pub models: Vec<String>,
    /// Fixed upstream model sent instead of the requested identifier.
    #[serde(default)]
    pub upstream_model: Option<String>,
}

impl ProviderSettings {
    /// The OpenAI and Deepseek entries every deployment starts with.
    pub fn builtin() -> Vec<ProviderSettings> {
        vec![
            ProviderSettings {
                name: "openai".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
                api_key_env: "OPENAI_API_KEY".to_string(),
                models: vec!["gpt-4".to_string(), "gpt-3.5-turbo".to_string()],
                upstream_model: None,
            },
            ProviderSettings {
                name: "deepseek".to_string(),
                base_url: "https://api.deepseek.com/v1".to_string(),
                api_key_env: "DEEPSEEK_API_KEY".to_string(),
                models: vec!["deepseek".to_string()],
                upstream_model: Some("deepseek-chat".to_string()),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.default_model, "deepseek");
        assert_eq!(config.context_window, 10);
        assert_eq!(config.port, 8080);
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_empty_toml_matches_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_effective_providers_builtin() {
        let providers = AppConfig::default().effective_providers();
        let names: Vec<&str> = providers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["openai", "deepseek"]);
        assert_eq!(providers[1].upstream_model.as_deref(), Some("deepseek-chat"));
    }

    #[test]
    fn test_effective_providers_override_and_append() {
        let config: AppConfig = toml::from_str(
            r#"
[[providers]]
name = "deepseek"
base_url = "http://localhost:9000/v1"
api_key_env = "LOCAL_DEEPSEEK_KEY"
models = ["deepseek", "deepseek-coder"]

[[providers]]
name = "mistral"
base_url = "https://api.mistral.ai/v1"
api_key_env = "MISTRAL_API_KEY"
models = ["mistral-large-latest"]
"#,
        )
        .unwrap();

        let providers = config.effective_providers();
        assert_eq!(providers.len(), 3);
        assert_eq!(providers[1].base_url, "http://localhost:9000/v1");
        assert_eq!(providers[1].upstream_model, None);
        assert_eq!(providers[2].name, "mistral");
    }
}
