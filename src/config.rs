use crate::agent::chat_completions::{DEFAULT_VOICE_BASE_URL, DEFAULT_VOICE_MODEL};
use crate::agent::{
    ChatCompletionsSettings, GeminiSettings, HistoryPolicy, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
use crate::errors::AppError;

const DEFAULT_PORT: u16 = 8080;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiSettings,
    pub history_policy: HistoryPolicy,
    pub voice: ChatCompletionsSettings,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` uses the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::MissingConfig { name: "GEMINI_API_KEY".to_string() })?;

        let gemini = GeminiSettings {
            base_url: lookup("GEMINI_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key,
        };

        let history_policy = match lookup("GEMINI_SEND_HISTORY").as_deref().map(str::to_lowercase) {
            Some(v) if matches!(v.as_str(), "true" | "1" | "yes") => HistoryPolicy::Replay,
            _ => HistoryPolicy::SingleShot,
        };

        let voice = ChatCompletionsSettings {
            base_url: lookup("VOICE_API_BASE_URL").unwrap_or_else(|| DEFAULT_VOICE_BASE_URL.to_string()),
            model: lookup("VOICE_MODEL").unwrap_or_else(|| DEFAULT_VOICE_MODEL.to_string()),
            api_key: lookup("VOICE_API_KEY").filter(|k| !k.trim().is_empty()),
        };

        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self { gemini, history_policy, voice, port })
    }
}
