//! Credential sources for provider API keys.

pub mod env;
