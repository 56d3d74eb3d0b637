//! OpenAI-style `/chat/completions` provider used by the voice assistant.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::transport::{HttpTransport, TransportResponse, CONNECTIVITY_MESSAGE};
use crate::errors::AppError;

pub const DEFAULT_VOICE_BASE_URL: &str = "https://api.pawan.krd";
pub const DEFAULT_VOICE_MODEL: &str = "pai-001";

#[derive(Debug, Clone)]
pub struct ChatCompletionsSettings {
    pub base_url: String,
    pub model: String,
    /// Sent as a bearer token when present.
    pub api_key: Option<String>,
}

impl Default for ChatCompletionsSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_VOICE_BASE_URL.to_string(),
            model: DEFAULT_VOICE_MODEL.to_string(),
            api_key: None,
        }
    }
}

/// Single-turn completion client: one user message in, one reply out.
/// No history and no sampling parameters are sent.
pub struct ChatCompletionsClient {
    transport: Arc<dyn HttpTransport>,
    settings: ChatCompletionsSettings,
}

impl ChatCompletionsClient {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: ChatCompletionsSettings) -> Self {
        Self { transport, settings }
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'))
    }

    pub async fn request_reply(&self, user_text: &str) -> Result<String, AppError> {
        let request = CompletionRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage { role: "user", content: user_text }],
        };
        let body = serde_json::to_value(&request)
            .map_err(|e| AppError::Unexpected(format!("Failed to encode request: {e}")))?;

        debug!(model = %self.settings.model, "Sending chat completion request");
        let response = self
            .transport
            .post_json(&self.url(), self.settings.api_key.as_deref(), &body)
            .await?;
        interpret_response(response)
    }
}

fn interpret_response(response: TransportResponse) -> Result<String, AppError> {
    if !response.is_success() {
        error!("Chat completion error (HTTP {}): {}", response.status, response.body);
        let message = serde_json::from_str::<CompletionErrorResponse>(&response.body)
            .ok()
            .and_then(|e| e.error.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| CONNECTIVITY_MESSAGE.to_string());
        return Err(AppError::transport(message));
    }

    let parsed: CompletionResponse = serde_json::from_str(&response.body).map_err(|e| {
        error!("Unparseable chat completion response: {e}");
        AppError::malformed(format!("invalid JSON: {e}"))
    })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .ok_or_else(|| {
            error!("Chat completion has no choice content: {}", response.body);
            AppError::malformed("missing choices[0].message.content")
        })
}

// Wire types

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionErrorResponse {
    error: CompletionError,
}

#[derive(Debug, Deserialize)]
struct CompletionError {
    #[serde(default)]
    message: Option<String>,
}
