//! Turn endpoint.
//!
//! POST /api/v1/chat/send
//!
//! One user message in, one assistant reply out. The reply is returned in
//! full; there is no streaming.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use threadline_core::chat::orchestrator::TurnRequest;
use threadline_types::chat::TurnReply;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for the turn endpoint.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Model identifier; omitted or empty selects the configured default.
    #[serde(default)]
    pub model: Option<String>,
    pub message: String,
}

/// POST /api/v1/chat/send - Run one turn in the caller's latest conversation.
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TurnReply>>, AppError> {
    let start = Instant::now();
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;

    let cancel = state.shutdown.child_token();
    let reply = state
        .orchestrator
        .send(
            user.id,
            TurnRequest {
                model: body.model,
                message: body.message,
            },
            &cancel,
        )
        .await?;

    let link = format!("/api/v1/chat/conversations/{}/messages", reply.conversation_id);
    Ok(Json(ApiResponse::success(reply, start).with_link("messages", &link)))
}
