use thiserror::Error;

use crate::llm::{LlmError, RouteError};

/// Errors from repository operations (used by trait definitions in threadline-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Terminal failure of a single turn.
///
/// Side effects committed before the failure (the user message in
/// particular) are never rolled back.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("provider call failed: {0}")]
    Provider(#[from] LlmError),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from owner-scoped conversation operations.
#[derive(Debug, Error)]
pub enum ConversationError {
    /// Missing, or owned by somebody else.
    #[error("conversation not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from user and API key management.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid email address: '{0}'")]
    InvalidEmail(String),

    #[error("email '{0}' is already registered")]
    EmailTaken(String),

    #[error("invalid API key")]
    InvalidKey,

    #[error("user not found")]
    UserNotFound,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}
