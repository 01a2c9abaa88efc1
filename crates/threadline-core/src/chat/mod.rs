//! Conversations, messages and the single-turn pipeline that ties them
//! to a provider.

pub mod orchestrator;
pub mod persister;
pub mod repository;
pub mod resolver;
pub mod service;
pub mod window;
