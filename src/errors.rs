use thiserror::Error;

/// Top-level application error.
/// All variants carry a human-readable message for display/logging.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Validation errors ────────────────────────────────────────────────────
    #[error("Field '{field_name}' cannot be empty")]
    EmptyField { field_name: String },

    #[error("Field '{field_name}' exceeds max length of {max_length} (actual: {actual_length})")]
    FieldTooLong { field_name: String, max_length: usize, actual_length: usize },

    // ── Assistant errors ─────────────────────────────────────────────────────
    #[error("{message}")]
    TransportError { message: String },

    #[error("Malformed assistant response: {message}")]
    MalformedResponse { message: String },

    // ── Conversation errors ──────────────────────────────────────────────────
    #[error("A reply is still being generated")]
    ReplyInProgress,

    #[error("No clear request is pending confirmation")]
    ClearNotRequested,

    // ── System errors ────────────────────────────────────────────────────────
    #[error("Missing required configuration: {name}")]
    MissingConfig { name: String },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn transport(message: impl Into<String>) -> Self {
        AppError::TransportError { message: message.into() }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        AppError::MalformedResponse { message: message.into() }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::EmptyField { .. } | AppError::FieldTooLong { .. })
    }

    /// Failures of the remote call. Both kinds look the same to the user.
    pub fn is_remote_failure(&self) -> bool {
        matches!(self, AppError::TransportError { .. } | AppError::MalformedResponse { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::ReplyInProgress | AppError::ClearNotRequested)
    }
}
