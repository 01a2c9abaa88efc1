//! Environment variable credential source.
//!
//! Read once at startup when the provider router is built; later changes
//! to the environment are not observed.

use threadline_core::llm::credentials::CredentialLookup;

/// Reads provider keys (e.g. "OPENAI_API_KEY") from the process environment.
pub struct EnvCredentials;

impl EnvCredentials {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialLookup for EnvCredentials {
    fn lookup(&self, key: &str) -> Option<String> {
        match std::env::var(key) {
            Ok(val) => Some(val),
            Err(std::env::VarError::NotPresent) => None,
            // Present but not valid Unicode: unusable as a bearer token
            Err(std::env::VarError::NotUnicode(_)) => None,
        }
    }
}
