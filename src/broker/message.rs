use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::error::ValidationError;

/// A chat message as stored in the log and relayed to listeners.
///
/// `id` and `created_at` are assigned by the store on append; a message is
/// never modified afterwards.
///
/// # Example
///
/// ```
/// use chat_relay::broker::message::Message;
///
/// let json = r#"{"id":"1","sender":"User","body":"hi","createdAt":"2025-01-01T00:00:00Z"}"#;
/// let msg: Message = serde_json::from_str(json).unwrap();
/// assert_eq!(msg.body, "hi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A validated, not yet persisted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    sender: String,
    body: String,
}

impl Submission {
    /// Trims both fields and rejects either being empty.
    pub fn new(sender: &str, body: &str) -> Result<Self, ValidationError> {
        let sender = sender.trim();
        let body = body.trim();
        if sender.is_empty() {
            return Err(ValidationError::EmptySender);
        }
        if body.is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        Ok(Self {
            sender: sender.to_string(),
            body: body.to_string(),
        })
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}
