//! Contact-form intake.
//!
//! A submission is validated, persisted, and then two best-effort e-mails go
//! out: one to the operator (reply-to the submitter) and a confirmation to
//! the submitter. Mail failures never fail the request.

use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::notify::Notifier;
use crate::persistence::ContactStore;
use crate::utils::error::{ChatError, ValidationError};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Raw form body as posted by the website.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// A validated, stored contact submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

impl Contact {
    /// Validate `form` and stamp it with a fresh id and timestamp.
    pub fn from_form(form: ContactForm) -> Result<Self, ValidationError> {
        let full_name = required(form.full_name, "fullName")?;
        let email = required(form.email, "email")?;
        let message = required(form.message, "message")?;
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            full_name,
            email,
            phone: optional(form.phone),
            address: optional(form.address),
            subject: optional(form.subject),
            message,
            created_at: Utc::now(),
        })
    }
}

/// Accepts contact forms: persist, then mail in the background.
#[derive(Clone)]
pub struct ContactDesk {
    store: Arc<dyn ContactStore>,
    notifier: Arc<Notifier>,
}

impl ContactDesk {
    pub fn new(store: Arc<dyn ContactStore>, notifier: Arc<Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Store the submission and spawn the two e-mails.
    ///
    /// Returns the stored contact and the handle of the mailing task.
    pub fn submit(&self, form: ContactForm) -> Result<(Contact, JoinHandle<()>), ChatError> {
        let contact = self.store.save_contact(form)?;
        info!(target: "contact", id = %contact.id, "contact form saved");

        let notifier = self.notifier.clone();
        let mailed = contact.clone();
        let mailing = tokio::spawn(async move {
            tokio::join!(
                notifier.notify_contact(&mailed),
                notifier.confirm_contact(&mailed)
            );
        });

        Ok((contact, mailing))
    }
}

impl std::fmt::Debug for ContactDesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactDesk")
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}
