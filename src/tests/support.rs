//! Test doubles shared by the unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tempfile::TempDir;
use uuid::Uuid;

use crate::broker::Broker;
use crate::broker::message::Message;
use crate::config::Settings;
use crate::generator::{ResponseGenerator, TextGenerator};
use crate::notify::{Mail, MailTransport, Notifier};
use crate::persistence::{MessageStore, SledStore};
use crate::pipeline::Pipeline;
use crate::utils::error::{ChatError, GenerationError, NotificationError};

pub fn message(sender: &str, body: &str) -> Message {
    Message {
        id: Uuid::new_v4().to_string(),
        sender: sender.to_string(),
        body: body.to_string(),
        created_at: Utc::now(),
    }
}

pub fn temp_store() -> (TempDir, Arc<SledStore>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SledStore::open(dir.path().to_str().expect("utf-8 path")).expect("open sled");
    (dir, Arc::new(store))
}

#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<Mail>>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Mail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, mail: &Mail) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FailingMailer;

#[async_trait]
impl MailTransport for FailingMailer {
    async fn send(&self, _mail: &Mail) -> Result<(), NotificationError> {
        Err(NotificationError::Rejected("503: mail relay down".into()))
    }
}

/// Never finishes sending.
#[derive(Debug, Clone, Copy)]
pub struct HangingMailer;

#[async_trait]
impl MailTransport for HangingMailer {
    async fn send(&self, _mail: &Mail) -> Result<(), NotificationError> {
        std::future::pending().await
    }
}

/// Replies with a fixed text and records every prompt.
#[derive(Debug, Clone)]
pub struct ScriptedGenerator {
    reply: String,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Arc::default(),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Malformed("quota exceeded".into()))
    }
}

/// Never produces a reply.
#[derive(Debug, Clone, Copy)]
pub struct HangingGenerator;

#[async_trait]
impl TextGenerator for HangingGenerator {
    async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        std::future::pending().await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UnavailableStore;

impl MessageStore for UnavailableStore {
    fn append(&self, _sender: &str, _body: &str) -> Result<Message, ChatError> {
        Err(ChatError::StoreUnavailable("connection refused".into()))
    }

    fn list_all(&self) -> Result<Vec<Message>, ChatError> {
        Err(ChatError::StoreUnavailable("connection refused".into()))
    }
}

/// Serves an empty history but fails every write.
#[derive(Debug, Clone, Copy)]
pub struct ReadOnlyStore;

impl MessageStore for ReadOnlyStore {
    fn append(&self, _sender: &str, _body: &str) -> Result<Message, ChatError> {
        Err(ChatError::StoreUnavailable("disk full".into()))
    }

    fn list_all(&self) -> Result<Vec<Message>, ChatError> {
        Ok(Vec::new())
    }
}

/// A pipeline over `store` with default sender tags.
pub fn pipeline(
    store: Arc<dyn MessageStore>,
    mailer: impl MailTransport + 'static,
    generator: impl TextGenerator + 'static,
) -> Pipeline {
    Pipeline::new(
        store,
        Arc::new(Mutex::new(Broker::new())),
        Arc::new(Notifier::new(mailer, "ops@example.com", "noreply@example.com")),
        Arc::new(ResponseGenerator::new(generator)),
        Settings::default().chat,
    )
}
