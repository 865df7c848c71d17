use serde::{Deserialize, Deserializer, Serialize};

use crate::broker::message::Message;

/// Events a connected client may send.
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "event")]
pub enum ClientEvent {
    #[serde(rename = "sendMessage")]
    SendMessage {
        #[serde(default, deserialize_with = "null_as_empty")]
        sender: String,
        #[serde(default, alias = "message", deserialize_with = "null_as_empty")]
        body: String,
    },
}

/// Treat an explicit `null` like an absent field so it fails validation as
/// "required" instead of as a decode error.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Events pushed to connected clients.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "event")]
pub enum ServerEvent {
    #[serde(rename = "previousMessages")]
    PreviousMessages { messages: Vec<Message> },
    #[serde(rename = "receiveMessage")]
    ReceiveMessage { message: Message },
    #[serde(rename = "error")]
    Error { message: String },
}

impl ServerEvent {
    pub fn history(messages: Vec<Message>) -> Self {
        ServerEvent::PreviousMessages { messages }
    }

    pub fn receive(message: Message) -> Self {
        ServerEvent::ReceiveMessage { message }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error {
            message: message.into(),
        }
    }
}
