//! The `persistence` module owns the durable message log.
//!
//! The pipeline talks to it through [`MessageStore`]; the production
//! implementation is [`SledStore`], an embedded `sled` database. Contact-form
//! submissions live in the same database under their own tree.

pub mod sled_store;

use crate::broker::message::Message;
use crate::contact::{Contact, ContactForm};
use crate::utils::error::ChatError;

pub use sled_store::SledStore;

/// Append-only, ordered message log.
pub trait MessageStore: Send + Sync {
    /// Persist a new message and return it with its assigned id and timestamp.
    ///
    /// Fails with `ChatError::Validation` when `sender` or `body` is blank and
    /// with `ChatError::StoreUnavailable` when the backend fails.
    fn append(&self, sender: &str, body: &str) -> Result<Message, ChatError>;

    /// All messages in insertion order.
    fn list_all(&self) -> Result<Vec<Message>, ChatError>;
}

pub trait ContactStore: Send + Sync {
    fn save_contact(&self, form: ContactForm) -> Result<Contact, ChatError>;
}
