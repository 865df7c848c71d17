//! Persistence layer backed by `sled`
//!
//! Messages live in the `messages` tree. Keys are big-endian ids from
//! `Db::generate_id`, which increase monotonically per database, so a plain
//! tree scan yields insertion order.

use chrono::Utc;
use serde::Serialize;
use sled::{Db, Tree};
use tracing::debug;
use uuid::Uuid;

use super::{ContactStore, MessageStore};
use crate::broker::message::{Message, Submission};
use crate::contact::{Contact, ContactForm};
use crate::utils::error::ChatError;

const MESSAGES_TREE: &str = "messages";
const CONTACTS_TREE: &str = "contacts";

#[derive(Clone)]
pub struct SledStore {
    db: Db,
    messages: Tree,
    contacts: Tree,
}

impl SledStore {
    /// Open or create a sled database at `path`.
    pub fn open(path: &str) -> Result<Self, ChatError> {
        let db = sled::open(path)?;
        let messages = db.open_tree(MESSAGES_TREE)?;
        let contacts = db.open_tree(CONTACTS_TREE)?;
        Ok(Self {
            db,
            messages,
            contacts,
        })
    }

    /// Block until all pending writes hit disk.
    pub fn flush(&self) -> Result<(), ChatError> {
        self.db.flush()?;
        Ok(())
    }

    fn insert<T: Serialize>(&self, tree: &Tree, record: &T) -> Result<(), ChatError> {
        let key = self.db.generate_id()?.to_be_bytes();
        let value = serde_json::to_vec(record)?;
        tree.insert(key, value)?;
        Ok(())
    }
}

impl MessageStore for SledStore {
    fn append(&self, sender: &str, body: &str) -> Result<Message, ChatError> {
        let submission = Submission::new(sender, body)?;
        let message = Message {
            id: Uuid::new_v4().to_string(),
            sender: submission.sender().to_string(),
            body: submission.body().to_string(),
            created_at: Utc::now(),
        };
        self.insert(&self.messages, &message)?;
        debug!(id = %message.id, sender = %message.sender, "message stored");
        Ok(message)
    }

    fn list_all(&self) -> Result<Vec<Message>, ChatError> {
        self.messages
            .iter()
            .values()
            .map(|value| -> Result<Message, ChatError> { Ok(serde_json::from_slice(&value?)?) })
            .collect()
    }
}

impl ContactStore for SledStore {
    fn save_contact(&self, form: ContactForm) -> Result<Contact, ChatError> {
        let contact = Contact::from_form(form)?;
        self.insert(&self.contacts, &contact)?;
        debug!(id = %contact.id, "contact stored");
        Ok(contact)
    }
}

impl std::fmt::Debug for SledStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledStore")
            .field("db", &"sled::Db")
            .field("messages", &self.messages.len())
            .finish()
    }
}
