use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A display record in the conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub is_from_user: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(text: String, is_from_user: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text,
            is_from_user,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Model,
}

impl HistoryRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryRole::User => "user",
            HistoryRole::Model => "model",
        }
    }
}

/// One turn of inference context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: HistoryRole,
    pub content: String,
}

impl HistoryEntry {
    pub fn new(role: HistoryRole, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    Idle,
    AwaitingReply,
}

// ── HTTP DTOs ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Result of one completed turn. `error` is set when `reply` is the local notice.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub user_message: Message,
    pub reply: Message,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    pub state: ControllerState,
    pub clear_pending: bool,
}

#[derive(Debug, Serialize)]
pub struct ClearPromptResponse {
    pub prompt: String,
}

/// A recognized utterance from the voice screen.
#[derive(Debug, Deserialize)]
pub struct VoiceRequest {
    pub transcript: String,
}

/// Text to be spoken back. `error` is set when `reply` is the fallback.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceResponse {
    pub transcript: String,
    pub reply: String,
    pub error: Option<String>,
}
