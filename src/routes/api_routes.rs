use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::errors::AppError;
use crate::models::{ChatRequest, ClearPromptResponse, VoiceRequest};
use crate::notify::AlertQueue;
use crate::service::{ChatService, VoiceService};

#[derive(Clone)]
pub struct AppState {
    pub chat: ChatService,
    pub voice: VoiceService,
    pub alerts: Arc<AlertQueue>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/messages", get(list_messages_handler))
        .route("/api/history", get(history_handler))
        .route("/api/state", get(state_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/chat/clear", post(request_clear_handler))
        .route("/api/chat/clear/confirm", post(confirm_clear_handler))
        .route("/api/chat/clear/cancel", post(cancel_clear_handler))
        .route("/api/voice", post(voice_handler))
        .route("/api/alerts", get(list_alerts_handler))
        .route("/api/alerts/{id}/ack", post(ack_alert_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET `/api/messages` — the display transcript
pub async fn list_messages_handler(State(app): State<AppState>) -> impl IntoResponse {
    Json(app.chat.messages().await)
}

/// GET `/api/history` — role-tagged inference context
pub async fn history_handler(State(app): State<AppState>) -> impl IntoResponse {
    Json(app.chat.history().await)
}

pub async fn state_handler(State(app): State<AppState>) -> impl IntoResponse {
    Json(app.chat.status().await)
}

/// POST `/api/chat` — runs one turn and returns both appended messages
pub async fn chat_handler(
    State(app): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    // Spawned so a dropped connection cannot cancel the turn halfway.
    let chat = app.chat.clone();
    let turn = tokio::spawn(async move { chat.chat(request).await });

    match turn.await {
        Ok(Ok(response)) => Json(response).into_response(),
        Ok(Err(err)) => error_response(&err),
        Err(e) => {
            error!("Chat turn task failed: {e}");
            error_response(&AppError::Unexpected("chat turn did not complete".to_string()))
        }
    }
}

/// POST `/api/chat/clear` — first step; returns the confirmation question
pub async fn request_clear_handler(State(app): State<AppState>) -> impl IntoResponse {
    Json(ClearPromptResponse { prompt: app.chat.request_clear().await })
}

pub async fn confirm_clear_handler(State(app): State<AppState>) -> Response {
    match app.chat.confirm_clear().await {
        Ok(messages) => Json(messages).into_response(),
        Err(err) => error_response(&err),
    }
}

pub async fn cancel_clear_handler(State(app): State<AppState>) -> Response {
    match app.chat.cancel_clear().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(&err),
    }
}

/// POST `/api/voice` — one stateless exchange for a recognized utterance
pub async fn voice_handler(
    State(app): State<AppState>,
    Json(request): Json<VoiceRequest>,
) -> Response {
    match app.voice.respond(request).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => error_response(&err),
    }
}

pub async fn list_alerts_handler(State(app): State<AppState>) -> impl IntoResponse {
    Json(app.alerts.pending())
}

/// POST `/api/alerts/{id}/ack` — dismisses one alert
pub async fn ack_alert_handler(
    Path(id): Path<String>,
    State(app): State<AppState>,
) -> StatusCode {
    if app.alerts.acknowledge(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

// ── Helper ────────────────────────────────────────────────────────────────────

fn error_response(err: &AppError) -> Response {
    // Empty submissions are ignored without a user-visible error.
    if matches!(err, AppError::EmptyField { .. }) {
        return StatusCode::NO_CONTENT.into_response();
    }

    let status = if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else if err.is_conflict() {
        StatusCode::CONFLICT
    } else if err.is_remote_failure() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
