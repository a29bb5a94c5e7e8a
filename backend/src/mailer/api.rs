use super::{MailError, MailSender, OutgoingMail};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

/// Sends mail through an HTTP mail service that takes a JSON message and a
/// bearer token.
pub struct ApiMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    from: String,
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    html: &'a str,
}

impl<'a> From<&'a OutgoingMail> for ApiMessage<'a> {
    fn from(mail: &'a OutgoingMail) -> Self {
        Self {
            from: mail.from.to_string(),
            to: &mail.to,
            reply_to: mail.reply_to.as_deref(),
            subject: &mail.subject,
            html: &mail.html,
        }
    }
}

impl ApiMailer {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl MailSender for ApiMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&ApiMessage::from(mail))
            .send()
            .await?;

        let status = response.status();
        debug!("Mail API responded with {}", status);
        if !status.is_success() {
            return Err(MailError::Rejected(status));
        }
        Ok(())
    }
}
