//! Axum router configuration with middleware.
//!
//! All API routes are under `/api/v1/`; every one except registration
//! requires an API key.
//! Middleware: CORS, tracing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/me", get(handlers::auth::me))
        .route("/chat/send", post(handlers::chat::send_message))
        .route(
            "/chat/conversations",
            get(handlers::conversation::list_conversations),
        )
        .route(
            "/chat/conversations/{id}",
            get(handlers::conversation::get_conversation)
                .delete(handlers::conversation::delete_conversation),
        )
        .route(
            "/chat/conversations/{id}/messages",
            get(handlers::conversation::get_messages),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness plus a database ping (no auth required).
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database = match sqlx::query("SELECT 1").execute(&state.db_pool.reader).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Health check database ping failed");
            "unavailable"
        }
    };
    let status = if database == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ok" } else { "degraded" },
            "database": database,
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
