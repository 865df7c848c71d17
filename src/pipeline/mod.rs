//! Ingestion pipeline
//!
//! `Received -> Validated -> Persisted -> Published`, then for human senders
//! a detached follow-up that notifies the operator and asks the generator
//! for a reply concurrently. A produced reply is committed and published
//! under the automated-origin tag.
//!
//! Persist and publish for one message run under the broker lock, and so
//! does subscribe-plus-history in [`Pipeline::connect`]. A new listener
//! therefore sees every message persisted before it joined in its history
//! snapshot and every later one live, never both. Both critical sections do
//! blocking store I/O, so they run on the blocking pool.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::{self, JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::broker::message::{Message, Submission};
use crate::broker::{Broker, Subscription};
use crate::config::ChatSettings;
use crate::generator::ResponseGenerator;
use crate::listener::ListenerId;
use crate::notify::Notifier;
use crate::persistence::MessageStore;
use crate::transport::message::ServerEvent;
use crate::utils::error::ChatError;

/// Result of a successful ingestion.
#[derive(Debug)]
pub struct Receipt {
    /// The stored and published message.
    pub message: Message,
    /// Notification/reply task, present only for human senders.
    pub follow_up: Option<JoinHandle<()>>,
}

#[derive(Clone)]
pub struct Pipeline {
    store: Arc<dyn MessageStore>,
    channel: Arc<Mutex<Broker>>,
    notifier: Arc<Notifier>,
    generator: Arc<ResponseGenerator>,
    tags: Arc<ChatSettings>,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn MessageStore>,
        channel: Arc<Mutex<Broker>>,
        notifier: Arc<Notifier>,
        generator: Arc<ResponseGenerator>,
        tags: ChatSettings,
    ) -> Self {
        Self {
            store,
            channel,
            notifier,
            generator,
            tags: Arc::new(tags),
        }
    }

    fn broker(&self) -> MutexGuard<'_, Broker> {
        self.channel.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe a new listener and queue its history snapshot first.
    pub async fn connect(&self) -> Result<Subscription, ChatError> {
        let this = self.clone();
        task::spawn_blocking(move || this.subscribe_with_history())
            .await
            .map_err(blocking_failed)?
    }

    fn subscribe_with_history(&self) -> Result<Subscription, ChatError> {
        let mut broker = self.broker();
        let history = self.store.list_all()?;
        let subscription = broker.subscribe();
        let count = history.len();
        broker.deliver(&subscription.id, ServerEvent::history(history));
        debug!(target: "pipeline", id = %subscription.id, count, "history replayed");
        Ok(subscription)
    }

    pub fn disconnect(&self, id: &ListenerId) {
        self.broker().unsubscribe(id);
    }

    /// Send a single event to one listener, e.g. an error reply.
    pub fn deliver(&self, id: &ListenerId, event: ServerEvent) -> bool {
        self.broker().deliver(id, event)
    }

    /// Run one inbound message through the pipeline.
    ///
    /// Returns once the message is persisted and published; notification and
    /// reply generation continue in the background.
    pub async fn ingest(&self, sender: &str, body: &str) -> Result<Receipt, ChatError> {
        let submission = Submission::new(sender, body).inspect_err(|e| {
            debug!(target: "pipeline", error = %e, "rejected submission");
        })?;
        let message = self.commit(submission).await?;
        info!(target: "pipeline", id = %message.id, sender = %message.sender, "message published");

        let follow_up = (message.sender == self.tags.human_tag)
            .then(|| tokio::spawn(self.clone().follow_up(message.clone())));

        Ok(Receipt { message, follow_up })
    }

    async fn commit(&self, submission: Submission) -> Result<Message, ChatError> {
        let this = self.clone();
        task::spawn_blocking(move || this.persist_and_publish(&submission))
            .await
            .map_err(blocking_failed)?
    }

    fn persist_and_publish(&self, submission: &Submission) -> Result<Message, ChatError> {
        let mut broker = self.broker();
        let message = self
            .store
            .append(submission.sender(), submission.body())
            .inspect_err(|e| error!(target: "pipeline", error = %e, "persist failed"))?;
        broker.publish(&message);
        Ok(message)
    }

    /// Notification and reply run side by side; the reply is committed as
    /// soon as it is generated, whatever the mail relay is doing.
    async fn follow_up(self, message: Message) {
        tokio::join!(self.notifier.notify(&message), self.reply_to(&message));
    }

    async fn reply_to(&self, message: &Message) {
        let Some(text) = self.generator.generate(&message.body).await else {
            debug!(target: "pipeline", id = %message.id, "no reply generated");
            return;
        };

        let committed = match Submission::new(&self.tags.bot_tag, &text) {
            Ok(reply) => self.commit(reply).await,
            Err(e) => Err(e.into()),
        };
        match committed {
            Ok(reply) => {
                info!(target: "pipeline", id = %reply.id, in_reply_to = %message.id, "reply published")
            }
            Err(e) => warn!(target: "pipeline", error = %e, "reply dropped"),
        }
    }
}

fn blocking_failed(e: JoinError) -> ChatError {
    ChatError::StoreUnavailable(format!("store task failed: {e}"))
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("human_tag", &self.tags.human_tag)
            .field("bot_tag", &self.tags.bot_tag)
            .finish_non_exhaustive()
    }
}
