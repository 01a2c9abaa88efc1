//! Repository trait definitions (ports) outside the chat module.
//!
//! threadline-infra implements these; the core crate never depends on a
//! specific storage technology.

pub mod user;
