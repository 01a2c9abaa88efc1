//! Business logic and repository trait definitions for Threadline.
//!
//! This crate defines the "ports" (repository traits, the provider trait)
//! that the infrastructure layer implements, plus the turn pipeline built on
//! top of them. It depends only on `threadline-types`, never on
//! `threadline-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
