use std::sync::Arc;

use tracing::{debug, error};

use crate::agent::ChatCompletionsClient;
use crate::errors::AppError;
use crate::models::{VoiceRequest, VoiceResponse};

pub const VOICE_FALLBACK_TEXT: &str = "Sorry, something went wrong.";

/// Stateless voice exchange: transcript in, reply text out.
///
/// Keeps no transcript and raises no alerts; a failed call is answered with
/// the fallback text so there is always something to speak.
#[derive(Clone)]
pub struct VoiceService {
    client: Arc<ChatCompletionsClient>,
}

impl VoiceService {
    pub fn new(client: Arc<ChatCompletionsClient>) -> Self {
        Self { client }
    }

    pub async fn respond(&self, request: VoiceRequest) -> Result<VoiceResponse, AppError> {
        let transcript = request.transcript;
        if transcript.trim().is_empty() {
            return Err(AppError::EmptyField { field_name: "transcript".to_string() });
        }

        match self.client.request_reply(&transcript).await {
            Ok(reply) => {
                debug!("Voice reply received");
                Ok(VoiceResponse { transcript, reply, error: None })
            }
            Err(e) => {
                error!("Voice assistant call failed: {e}");
                Ok(VoiceResponse {
                    transcript,
                    reply: VOICE_FALLBACK_TEXT.to_string(),
                    error: Some(e.to_string()),
                })
            }
        }
    }
}
