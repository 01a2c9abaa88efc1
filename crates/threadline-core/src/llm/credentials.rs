//! Credential lookup capability.
//!
//! Provider credentials are resolved once, when the router is built at
//! startup. The environment-backed implementation lives in threadline-infra.

use std::collections::HashMap;

/// Read-only source of provider API keys, keyed by variable name
/// (e.g. "OPENAI_API_KEY").
pub trait CredentialLookup: Send + Sync {
    /// Return the credential, or `None` when it is absent.
    fn lookup(&self, key: &str) -> Option<String>;
}

impl CredentialLookup for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
