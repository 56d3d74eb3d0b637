use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::agent::AssistantClient;
use crate::errors::AppError;
use crate::models::{ChatRequest, ChatResponse, ControllerState, HistoryEntry, Message, StateResponse};
use crate::notify::{NoticeKind, Notifier};
use crate::store::ConversationStore;

pub const WELCOME_TEXT: &str = "Welcome! I am your medical emergency assistant. \
                                I can guide you through first aid steps and emergency situations. \
                                What urgent medical situation are you facing?";
pub const CLEARED_TEXT: &str = "Chat has been cleared. How can I help you?";
pub const LOCAL_NOTICE_TEXT: &str = "Sorry, I cannot respond at this time. Please try again later.";
pub const CLEAR_PROMPT: &str = "Are you sure you want to clear the chat history?";
pub const MAX_MESSAGE_LENGTH: usize = 1000;

struct Session {
    store: ConversationStore,
    state: ControllerState,
    clear_pending: bool,
}

/// Conversation controller for one session.
///
/// Serializes turns: while a reply is awaited every other mutation is
/// refused, so at most one request is in flight and appends stay ordered.
/// The session lock is never held across the network call.
#[derive(Clone)]
pub struct ChatService {
    session: Arc<Mutex<Session>>,
    client: Arc<AssistantClient>,
    notifier: Arc<dyn Notifier>,
}

impl ChatService {
    pub fn new(client: Arc<AssistantClient>, notifier: Arc<dyn Notifier>) -> Self {
        let session = Session {
            store: ConversationStore::new(WELCOME_TEXT),
            state: ControllerState::Idle,
            clear_pending: false,
        };
        Self { session: Arc::new(Mutex::new(session)), client, notifier }
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.session.lock().await.store.messages().to_vec()
    }

    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.session.lock().await.store.snapshot_history().to_vec()
    }

    pub async fn state(&self) -> ControllerState {
        self.session.lock().await.state
    }

    pub async fn status(&self) -> StateResponse {
        let session = self.session.lock().await;
        StateResponse { state: session.state, clear_pending: session.clear_pending }
    }

    /// Runs one user turn to completion.
    ///
    /// Remote failures do not surface as `Err`: they become a local notice in
    /// the transcript plus an error notification, and `error` is set on the
    /// response. `Err` means the submission was refused and nothing changed.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, AppError> {
        let text = request.message;
        if text.trim().is_empty() {
            return Err(AppError::EmptyField { field_name: "message".to_string() });
        }
        let length = text.chars().count();
        if length > MAX_MESSAGE_LENGTH {
            return Err(AppError::FieldTooLong {
                field_name: "message".to_string(),
                max_length: MAX_MESSAGE_LENGTH,
                actual_length: length,
            });
        }

        // ── Idle -> AwaitingReply ─────────────────────────────────────────────
        let (user_message, prior_history) = {
            let mut session = self.session.lock().await;
            if session.state == ControllerState::AwaitingReply {
                return Err(AppError::ReplyInProgress);
            }
            let prior_history = session.store.snapshot_history().to_vec();
            let user_message = session.store.append_user_turn(&text)?.clone();
            session.state = ControllerState::AwaitingReply;
            (user_message, prior_history)
        };
        debug!(message_id = %user_message.id, "User turn appended, awaiting reply");

        let outcome = self.client.request_reply(&text, &prior_history).await;

        // ── AwaitingReply -> Idle, on every path ──────────────────────────────
        let mut session = self.session.lock().await;
        let response = match outcome {
            Ok(reply_text) => {
                let reply = session.store.append_assistant_turn(&reply_text).clone();
                debug!(message_id = %reply.id, "Assistant turn appended");
                ChatResponse { user_message, reply, error: None }
            }
            Err(e) => {
                error!("Assistant reply failed: {e}");
                let reply = session.store.append_local_notice(LOCAL_NOTICE_TEXT).clone();
                self.notifier.notify(NoticeKind::Error, &e.to_string());
                ChatResponse { user_message, reply, error: Some(e.to_string()) }
            }
        };
        session.state = ControllerState::Idle;
        Ok(response)
    }

    /// First step of a clear. Returns the question to put to the user.
    pub async fn request_clear(&self) -> String {
        self.session.lock().await.clear_pending = true;
        CLEAR_PROMPT.to_string()
    }

    pub async fn confirm_clear(&self) -> Result<Vec<Message>, AppError> {
        let mut session = self.session.lock().await;
        if !session.clear_pending {
            return Err(AppError::ClearNotRequested);
        }
        if session.state == ControllerState::AwaitingReply {
            return Err(AppError::ReplyInProgress);
        }
        session.store.clear(CLEARED_TEXT);
        session.clear_pending = false;
        session.state = ControllerState::Idle;
        info!("Conversation cleared");
        Ok(session.store.messages().to_vec())
    }

    pub async fn cancel_clear(&self) -> Result<(), AppError> {
        let mut session = self.session.lock().await;
        if !session.clear_pending {
            return Err(AppError::ClearNotRequested);
        }
        session.clear_pending = false;
        Ok(())
    }
}
