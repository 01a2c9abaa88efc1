//! Account endpoints.
//!
//! - POST /api/v1/auth/register - Create a user and issue their API key (no auth)
//! - GET  /api/v1/auth/me       - The user behind the presented API key

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use threadline_types::user::User;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
}

/// The new user and the only copy of their plaintext key.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub user: User,
    pub api_key: String,
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<RegisteredUser>>), AppError> {
    let start = Instant::now();
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;

    let issued = state.identity.create_user(&body.email).await?;
    let data = RegisteredUser {
        user: issued.user,
        api_key: issued.api_key,
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(data, start).with_link("me", "/api/v1/auth/me")),
    ))
}

/// GET /api/v1/auth/me
pub async fn me(AuthUser(user): AuthUser) -> Result<Json<ApiResponse<User>>, AppError> {
    let start = Instant::now();
    Ok(Json(
        ApiResponse::success(user, start).with_link("conversations", "/api/v1/chat/conversations"),
    ))
}
