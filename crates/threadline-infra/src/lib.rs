//! Infrastructure layer for Threadline.
//!
//! Contains implementations of the ports defined in `threadline-core`:
//! SQLite storage, the OpenAI-compatible provider client, environment
//! credentials, API key hashing, and the config file loader.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod secret;
pub mod sqlite;
