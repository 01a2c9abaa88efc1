//! Conversation browsing HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/chat/conversations               - List own conversations
//! - GET    /api/v1/chat/conversations/{id}          - Get one conversation
//! - GET    /api/v1/chat/conversations/{id}/messages - Ordered messages
//! - DELETE /api/v1/chat/conversations/{id}          - Delete with messages
//!
//! A conversation owned by another user is reported as 404.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde_json::json;
use threadline_types::chat::{ChatMessage, Conversation};
use uuid::Uuid;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// GET /api/v1/chat/conversations - Newest first.
pub async fn list_conversations(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<Vec<Conversation>>>, AppError> {
    let start = Instant::now();
    let conversations = state.conversations.list(&user.id).await?;
    Ok(Json(
        ApiResponse::success(conversations, start).with_link("self", "/api/v1/chat/conversations"),
    ))
}

/// GET /api/v1/chat/conversations/{id}
pub async fn get_conversation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Conversation>>, AppError> {
    let start = Instant::now();
    let id = parse_uuid(&id)?;
    let conversation = state.conversations.get(&user.id, &id).await?;
    Ok(Json(
        ApiResponse::success(conversation, start)
            .with_link("messages", &format!("/api/v1/chat/conversations/{id}/messages")),
    ))
}

/// GET /api/v1/chat/conversations/{id}/messages - Oldest first.
pub async fn get_messages(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    let start = Instant::now();
    let id = parse_uuid(&id)?;
    let messages = state.conversations.messages(&user.id, &id).await?;
    Ok(Json(
        ApiResponse::success(messages, start)
            .with_link("conversation", &format!("/api/v1/chat/conversations/{id}")),
    ))
}

/// DELETE /api/v1/chat/conversations/{id}
pub async fn delete_conversation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let id = parse_uuid(&id)?;
    state.conversations.delete(&user.id, &id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }), start)))
}
