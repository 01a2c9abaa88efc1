//! Provider router: model identifier -> provider adapter.
//!
//! A small closed registry built once at startup. Each route claims a set of
//! model identifiers; a route whose credential was missing at startup is kept
//! (so the model is still "known") but yields `UnconfiguredCredential`.

use threadline_types::llm::RouteError;

use super::box_provider::BoxLlmProvider;
use super::credentials::CredentialLookup;

struct ProviderRoute {
    name: String,
    models: Vec<String>,
    provider: Option<BoxLlmProvider>,
}

/// Registry of available providers, indexed by the model ids they serve.
pub struct ProviderRouter {
    default_model: String,
    routes: Vec<ProviderRoute>,
}

impl ProviderRouter {
    /// Create an empty router that substitutes `default_model` for
    /// unspecified models.
    pub fn new(default_model: impl Into<String>) -> Self {
        Self {
            default_model: default_model.into(),
            routes: Vec::new(),
        }
    }

    /// Register a provider for the given model identifiers.
    ///
    /// `None` registers the models as known but unusable (no credential).
    /// Later registrations do not override earlier claims on the same id.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        models: Vec<String>,
        provider: Option<BoxLlmProvider>,
    ) {
        self.routes.push(ProviderRoute {
            name: name.into(),
            models,
            provider,
        });
    }

    /// Register a provider whose construction needs the credential stored
    /// under `api_key_env`.
    ///
    /// `build` is only called when the credential is present and non-empty.
    pub fn register_with_credential<C, F>(
        &mut self,
        name: impl Into<String>,
        models: Vec<String>,
        api_key_env: &str,
        credentials: &C,
        build: F,
    ) where
        C: CredentialLookup + ?Sized,
        F: FnOnce(String) -> BoxLlmProvider,
    {
        let name = name.into();
        let provider = credentials
            .lookup(api_key_env)
            .filter(|key| !key.trim().is_empty())
            .map(build);
        if provider.is_none() {
            tracing::warn!(provider = %name, env = api_key_env, "No API key configured; models registered as unavailable");
        }
        self.register(name, models, provider);
    }

    /// The identifier used when a request names no model.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Substitute the default for a missing or blank model identifier.
    ///
    /// This runs before routing; `route` itself never sees an empty id
    /// coming from the orchestrator.
    pub fn effective_model(&self, requested: Option<&str>) -> String {
        match requested.map(str::trim) {
            Some(model) if !model.is_empty() => model.to_string(),
            _ => self.default_model.clone(),
        }
    }

    /// Look up the provider serving `model`.
    pub fn route(&self, model: &str) -> Result<&BoxLlmProvider, RouteError> {
        let route = self
            .routes
            .iter()
            .find(|r| r.models.iter().any(|m| m == model))
            .ok_or_else(|| RouteError::UnsupportedModel(model.to_string()))?;

        route
            .provider
            .as_ref()
            .ok_or_else(|| RouteError::UnconfiguredCredential {
                provider: route.name.clone(),
            })
    }

    /// All model identifiers with a usable provider.
    pub fn available_models(&self) -> Vec<&str> {
        self.routes
            .iter()
            .filter(|r| r.provider.is_some())
            .flat_map(|r| r.models.iter().map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::testing::MockProvider;

    fn reference_router(credentials: &HashMap<String, String>) -> ProviderRouter {
        let mut router = ProviderRouter::new("deepseek");
        router.register_with_credential(
            "openai",
            vec!["gpt-4".to_string(), "gpt-3.5-turbo".to_string()],
            "OPENAI_API_KEY",
            credentials,
            |_key| BoxLlmProvider::new(MockProvider::ok("openai", "", 0)),
        );
        router.register_with_credential(
            "deepseek",
            vec!["deepseek".to_string()],
            "DEEPSEEK_API_KEY",
            credentials,
            |_key| BoxLlmProvider::new(MockProvider::ok("deepseek", "", 0)),
        );
        router
    }

    fn deepseek_only() -> HashMap<String, String> {
        HashMap::from([("DEEPSEEK_API_KEY".to_string(), "sk-ds".to_string())])
    }

    #[test]
    fn test_gpt4_without_openai_key_is_unconfigured() {
        let router = reference_router(&deepseek_only());
        let err = router.route("gpt-4").err().unwrap();
        assert_eq!(
            err,
            RouteError::UnconfiguredCredential {
                provider: "openai".to_string()
            }
        );
    }

    #[test]
    fn test_blank_key_counts_as_unconfigured() {
        let creds = HashMap::from([("OPENAI_API_KEY".to_string(), "  ".to_string())]);
        let router = reference_router(&creds);
        assert!(matches!(
            router.route("gpt-3.5-turbo"),
            Err(RouteError::UnconfiguredCredential { .. })
        ));
    }

    #[test]
    fn test_unknown_model_is_unsupported() {
        let router = reference_router(&deepseek_only());
        let err = router.route("unknown-model").err().unwrap();
        assert_eq!(err, RouteError::UnsupportedModel("unknown-model".to_string()));
    }

    #[test]
    fn test_empty_model_routes_like_default() {
        let router = reference_router(&deepseek_only());

        let model = router.effective_model(Some(""));
        assert_eq!(model, "deepseek");
        assert_eq!(router.effective_model(None), "deepseek");

        let via_empty = router.route(&model).unwrap().name().to_string();
        let via_default = router.route(router.default_model()).unwrap().name().to_string();
        assert_eq!(via_empty, via_default);
    }

    #[test]
    fn test_explicit_model_is_kept() {
        let router = reference_router(&deepseek_only());
        assert_eq!(router.effective_model(Some(" gpt-4 ")), "gpt-4");
    }

    #[test]
    fn test_configured_openai_routes_to_openai() {
        let creds = HashMap::from([("OPENAI_API_KEY".to_string(), "sk-oa".to_string())]);
        let router = reference_router(&creds);
        assert_eq!(router.route("gpt-3.5-turbo").unwrap().name(), "openai");
        assert_eq!(router.available_models(), vec!["gpt-4", "gpt-3.5-turbo"]);
    }

    #[test]
    fn test_new_provider_extends_registry() {
        let mut router = reference_router(&deepseek_only());
        router.register(
            "mistral",
            vec!["mistral-large-latest".to_string()],
            Some(BoxLlmProvider::new(MockProvider::ok("mistral", "", 0))),
        );
        assert_eq!(router.route("mistral-large-latest").unwrap().name(), "mistral");
    }

    #[test]
    fn test_build_receives_credential() {
        let mut seen = None;
        let mut router = ProviderRouter::new("deepseek");
        router.register_with_credential(
            "deepseek",
            vec!["deepseek".to_string()],
            "DEEPSEEK_API_KEY",
            &deepseek_only(),
            |key| {
                seen = Some(key);
                BoxLlmProvider::new(MockProvider::ok("deepseek", "", 0))
            },
        );
        assert_eq!(seen.as_deref(), Some("sk-ds"));
    }
}
