//! Best-effort operator notifications.
//!
//! [`Notifier`] formats the e-mails and hands them to a [`MailTransport`].
//! Every public method swallows transport failures after logging them, so
//! callers never branch on the outcome.

pub mod postmark;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::broker::message::Message;
use crate::contact::Contact;
use crate::utils::error::NotificationError;

pub use postmark::PostmarkMailer;

/// A single outbound e-mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub reply_to: Option<String>,
}

/// Anything that can deliver a [`Mail`].
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &Mail) -> Result<(), NotificationError>;
}

pub struct Notifier {
    transport: Arc<dyn MailTransport>,
    operator: String,
    from: String,
}

impl Notifier {
    pub fn new(
        transport: impl MailTransport + 'static,
        operator: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            transport: Arc::new(transport),
            operator: operator.into(),
            from: from.into(),
        }
    }

    /// Tell the operator a chat message arrived. One attempt, never fails.
    pub async fn notify(&self, message: &Message) {
        let mail = Mail {
            from: self.from.clone(),
            to: self.operator.clone(),
            subject: format!("New Chat Message from {}", message.sender),
            text_body: format!(
                "You have received a new message:\n\nSender: {}\nMessage: {}",
                message.sender, message.body
            ),
            reply_to: None,
        };
        self.deliver(mail, "chat notification").await;
    }

    /// Forward a contact form to the operator, replying to the submitter.
    pub async fn notify_contact(&self, contact: &Contact) {
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        let mail = Mail {
            from: self.from.clone(),
            to: self.operator.clone(),
            subject: format!("New Contact Form Submission from {}", contact.full_name),
            text_body: format!(
                "Name: {}\nEmail: {}\nPhone: {}\nAddress: {}\nSubject: {}\nMessage: {}",
                contact.full_name,
                contact.email,
                field(&contact.phone),
                field(&contact.address),
                field(&contact.subject),
                contact.message
            ),
            reply_to: Some(contact.email.clone()),
        };
        self.deliver(mail, "contact notification").await;
    }

    /// Acknowledge a contact form to the person who sent it.
    pub async fn confirm_contact(&self, contact: &Contact) {
        let mail = Mail {
            from: self.from.clone(),
            to: contact.email.clone(),
            subject: format!("Thank you for contacting us, {}", contact.full_name),
            text_body: format!(
                "Dear {},\n\nThank you for reaching out! We have received your message \
                 and will get back to you shortly.\n\nBest regards",
                contact.full_name
            ),
            reply_to: None,
        };
        self.deliver(mail, "contact confirmation").await;
    }

    async fn deliver(&self, mail: Mail, kind: &str) {
        match self.transport.send(&mail).await {
            Ok(()) => info!(target: "notify", to = %mail.to, "{kind} sent"),
            Err(e) => warn!(target: "notify", to = %mail.to, error = %e, "{kind} failed"),
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("operator", &self.operator)
            .field("from", &self.from)
            .finish()
    }
}
