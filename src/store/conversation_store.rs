use crate::errors::AppError;
use crate::models::{HistoryEntry, HistoryRole, Message};

/// In-memory transcript for one conversation session.
///
/// Holds the display `Message` sequence and the role-tagged history sent as
/// inference context. Both are append-only between resets. Local notices go
/// into `messages` only, so the model is never primed with client-made text.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    messages: Vec<Message>,
    history: Vec<HistoryEntry>,
}

impl ConversationStore {
    pub fn new(welcome_text: &str) -> Self {
        let mut store = Self { messages: Vec::new(), history: Vec::new() };
        store.initialize(welcome_text);
        store
    }

    /// Resets both sequences to a single model-authored welcome pair.
    pub fn initialize(&mut self, welcome_text: &str) {
        self.messages.clear();
        self.history.clear();
        self.push_pair(welcome_text.to_string(), HistoryRole::Model);
    }

    /// Appends a user turn and returns the new message, whose `id` identifies it.
    pub fn append_user_turn(&mut self, text: &str) -> Result<&Message, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::EmptyField { field_name: "message".to_string() });
        }
        Ok(self.push_pair(text.to_string(), HistoryRole::User))
    }

    /// Empty text is accepted: a model may legitimately answer with nothing.
    pub fn append_assistant_turn(&mut self, text: &str) -> &Message {
        self.push_pair(text.to_string(), HistoryRole::Model)
    }

    pub fn append_local_notice(&mut self, text: &str) -> &Message {
        self.messages.push(Message::new(text.to_string(), false));
        &self.messages[self.messages.len() - 1]
    }

    pub fn clear(&mut self, new_welcome_text: &str) {
        self.initialize(new_welcome_text);
    }

    pub fn snapshot_history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn push_pair(&mut self, text: String, role: HistoryRole) -> &Message {
        self.history.push(HistoryEntry::new(role, text.clone()));
        self.messages.push(Message::new(text, role == HistoryRole::User));
        &self.messages[self.messages.len() - 1]
    }
}
