//! LLM provider abstractions for Threadline.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider adapters
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `ProviderRouter`: model identifier -> provider registry
//! - `CredentialLookup`: startup-time credential source

pub mod box_provider;
pub mod credentials;
pub mod provider;
pub mod router;
