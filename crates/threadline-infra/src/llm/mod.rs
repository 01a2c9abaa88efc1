//! LLM provider implementations.
//!
//! Contains the concrete [`LlmProvider`] implementation defined against
//! `threadline-core` and the startup factory ([`build_provider_router`]) that
//! turns the configured provider registry into a [`ProviderRouter`].
//!
//! [`LlmProvider`]: threadline_core::llm::provider::LlmProvider

pub mod openai_compat;

use threadline_core::llm::box_provider::BoxLlmProvider;
use threadline_core::llm::credentials::CredentialLookup;
use threadline_core::llm::router::ProviderRouter;
use threadline_types::config::AppConfig;
use tracing::info;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::OpenAiCompatConfig;

/// Build the router for every effective provider in `config`.
///
/// Credentials are looked up once, here. A provider without a credential is
/// still registered so its models report `UnconfiguredCredential` rather
/// than `UnsupportedModel`.
pub fn build_provider_router<C>(config: &AppConfig, credentials: &C) -> ProviderRouter
where
    C: CredentialLookup + ?Sized,
{
    let mut router = ProviderRouter::new(config.default_model.clone());

    for settings in config.effective_providers() {
        router.register_with_credential(
            settings.name.clone(),
            settings.models.clone(),
            &settings.api_key_env,
            credentials,
            |api_key| {
                BoxLlmProvider::new(OpenAiCompatibleProvider::new(
                    OpenAiCompatConfig::from_settings(&settings, api_key),
                ))
            },
        );
    }

    info!(
        default_model = router.default_model(),
        available = ?router.available_models(),
        "Provider router ready"
    );
    router
}
