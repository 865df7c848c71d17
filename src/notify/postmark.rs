//! HTTP mail transport speaking the Postmark `POST /email` API.

use async_trait::async_trait;
use serde::Serialize;

use super::{Mail, MailTransport};
use crate::utils::error::NotificationError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct EmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

impl<'a> From<&'a Mail> for EmailRequest<'a> {
    fn from(mail: &'a Mail) -> Self {
        Self {
            from: &mail.from,
            to: &mail.to,
            subject: &mail.subject,
            text_body: &mail.text_body,
            reply_to: mail.reply_to.as_deref(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostmarkMailer {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PostmarkMailer {
    pub fn new(api_url: &str, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/email", api_url.trim_end_matches('/')),
            token: token.into(),
        }
    }
}

#[async_trait]
impl MailTransport for PostmarkMailer {
    async fn send(&self, mail: &Mail) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .header("X-Postmark-Server-Token", &self.token)
            .json(&EmailRequest::from(mail))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let detail = response.text().await.unwrap_or_default();
            Err(NotificationError::Rejected(format!("{status}: {detail}")))
        }
    }
}
