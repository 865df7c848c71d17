//! Error types for the relay.
//!
//! Only [`ChatError`] ever reaches a submitter. Notification and generation
//! failures are caught at their component boundary and logged.

use thiserror::Error;

/// Errors surfaced to whoever submitted a message or form.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Bad input; the caller can fix it.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The message store could not be read or written.
    #[error("message store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<sled::Error> for ChatError {
    fn from(e: sled::Error) -> Self {
        ChatError::StoreUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::StoreUnavailable(format!("corrupt record: {e}"))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("sender is required")]
    EmptySender,

    #[error("message body is required")]
    EmptyBody,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid email format")]
    InvalidEmail,

    /// The payload could not be decoded at all.
    #[error("malformed request: {0}")]
    Malformed(String),
}

/// Failure while handing an email to the mail transport.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("mail transport request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail transport rejected message: {0}")]
    Rejected(String),
}

/// Failure while asking the text-generation provider for a reply.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed generation response: {0}")]
    Malformed(String),
}
