pub mod chat_completions;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::errors::AppError;
use crate::models::HistoryEntry;

pub use chat_completions::{ChatCompletionsClient, ChatCompletionsSettings};
pub use transport::{HttpTransport, ReqwestTransport, TransportResponse, CONNECTIVITY_MESSAGE};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Where and as whom to call the generative-language API.
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

impl GeminiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { temperature: 0.7, top_k: 40, top_p: 0.95, max_output_tokens: 2048 }
    }
}

/// Whether prior turns travel with the prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryPolicy {
    /// Only the latest utterance is sent; the transcript stays local.
    #[default]
    SingleShot,
    /// Prior turns are sent as role-tagged contents ahead of the utterance.
    Replay,
}

/// Turns one user utterance into one `generateContent` call.
///
/// Built once at startup and shared read-only. Performs exactly one attempt
/// per call and never touches conversation state.
pub struct AssistantClient {
    transport: Arc<dyn HttpTransport>,
    settings: GeminiSettings,
    generation: GenerationConfig,
    history_policy: HistoryPolicy,
}

impl AssistantClient {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: GeminiSettings) -> Self {
        Self {
            transport,
            settings,
            generation: GenerationConfig::default(),
            history_policy: HistoryPolicy::default(),
        }
    }

    pub fn with_history_policy(mut self, history_policy: HistoryPolicy) -> Self {
        self.history_policy = history_policy;
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model,
            self.settings.api_key
        )
    }

    fn build_request(&self, user_text: &str, prior_history: &[HistoryEntry]) -> GenerateRequest {
        let contents = match self.history_policy {
            HistoryPolicy::SingleShot => vec![GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: Some(user_text.to_string()) }],
            }],
            HistoryPolicy::Replay => {
                let turns = prior_history
                    .iter()
                    .map(|h| (h.role.as_str(), h.content.as_str()))
                    .chain(std::iter::once(("user", user_text)));
                merge_turns(turns)
            }
        };

        GenerateRequest { contents, generation_config: self.generation }
    }

    /// Sends `user_text` and returns the first candidate's first text part.
    pub async fn request_reply(
        &self,
        user_text: &str,
        prior_history: &[HistoryEntry],
    ) -> Result<String, AppError> {
        let request = self.build_request(user_text, prior_history);
        let body = serde_json::to_value(&request)
            .map_err(|e| AppError::Unexpected(format!("Failed to encode request: {e}")))?;

        debug!(
            model = %self.settings.model,
            turns = request.contents.len(),
            "Sending generateContent request"
        );
        let response = self.transport.post_json(&self.url(), None, &body).await?;
        interpret_response(response)
    }
}

/// Folds runs of same-role turns into one content with several parts.
/// A failed turn leaves an unanswered user entry behind, and the API expects
/// roles to alternate.
fn merge_turns<'a>(turns: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<GeminiContent> {
    let mut contents: Vec<GeminiContent> = Vec::new();
    for (role, text) in turns {
        let part = GeminiPart { text: Some(text.to_string()) };
        match contents.last_mut() {
            Some(last) if last.role.as_deref() == Some(role) => last.parts.push(part),
            _ => contents.push(GeminiContent { role: Some(role.to_string()), parts: vec![part] }),
        }
    }
    contents
}

fn interpret_response(response: TransportResponse) -> Result<String, AppError> {
    if !response.is_success() {
        error!("Gemini API error (HTTP {}): {}", response.status, response.body);
        let message = serde_json::from_str::<GeminiErrorResponse>(&response.body)
            .ok()
            .and_then(|e| e.error.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| CONNECTIVITY_MESSAGE.to_string());
        return Err(AppError::transport(message));
    }

    let parsed: GenerateResponse = serde_json::from_str(&response.body).map_err(|e| {
        error!("Unparseable Gemini response: {e}");
        AppError::malformed(format!("invalid JSON: {e}"))
    })?;

    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| {
            error!("Gemini response has no candidate text: {}", response.body);
            AppError::malformed("missing candidates[0].content.parts[0].text")
        })
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    #[serde(default)]
    message: Option<String>,
}
