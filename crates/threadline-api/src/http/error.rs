//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use threadline_types::error::{ConversationError, IdentityError, TurnError};
use threadline_types::llm::{LlmError, RouteError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Turn pipeline failures.
    Turn(TurnError),
    /// Owner-scoped conversation access failures.
    Conversation(ConversationError),
    /// User and key management failures.
    Identity(IdentityError),
    /// Missing or invalid credentials.
    Unauthorized(String),
    /// Malformed request.
    Validation(String),
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        AppError::Turn(e)
    }
}

impl From<ConversationError> for AppError {
    fn from(e: ConversationError) -> Self {
        AppError::Conversation(e)
    }
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        AppError::Identity(e)
    }
}

impl AppError {
    /// HTTP status, machine-readable code and human-readable message.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Turn(TurnError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Turn(TurnError::Route(e @ RouteError::UnsupportedModel(_))) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_MODEL", e.to_string())
            }
            AppError::Turn(TurnError::Route(e @ RouteError::UnconfiguredCredential { .. })) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PROVIDER_NOT_CONFIGURED",
                e.to_string(),
            ),
            AppError::Turn(TurnError::Provider(e @ LlmError::Timeout { .. })) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PROVIDER_TIMEOUT", e.to_string())
            }
            AppError::Turn(TurnError::Provider(e)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PROVIDER_ERROR", e.to_string())
            }
            AppError::Turn(TurnError::Storage(e)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
            AppError::Conversation(ConversationError::NotFound) => (
                StatusCode::NOT_FOUND,
                "CONVERSATION_NOT_FOUND",
                "Conversation not found".to_string(),
            ),
            AppError::Conversation(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
            AppError::Identity(e @ IdentityError::InvalidEmail(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Identity(e @ IdentityError::EmailTaken(_)) => {
                (StatusCode::CONFLICT, "EMAIL_TAKEN", e.to_string())
            }
            AppError::Identity(IdentityError::InvalidKey) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid API key. Provide a valid key via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
            ),
            AppError::Identity(e @ IdentityError::UserNotFound) => {
                (StatusCode::NOT_FOUND, "USER_NOT_FOUND", e.to_string())
            }
            AppError::Identity(IdentityError::Storage(e)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            error!(code, error = %message, "Request failed");
        }

        let body = json!({
            "data": null,
            "meta": {
                "request_id": uuid::Uuid::now_v7().to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
