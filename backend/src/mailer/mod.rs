use crate::config::{MailConfig, MailTransport};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub mod api;
pub mod smtp;

pub use api::ApiMailer;
pub use smtp::SmtpMailer;

/// Every variant means the message was not delivered to the mail channel.
#[derive(Debug, Error)]
pub enum MailError {
    #[error(transparent)]
    Address(#[from] lettre::address::AddressError),

    #[error(transparent)]
    Message(#[from] lettre::error::Error),

    #[error(transparent)]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("mail api rejected the message with status {0}")]
    Rejected(reqwest::StatusCode),
}

/// A mailbox, optionally with a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub name: Option<String>,
    pub address: String,
}

impl Sender {
    pub fn bare(address: &str) -> Self {
        Self {
            name: None,
            address: address.to_string(),
        }
    }

    pub fn named(name: &str, address: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            address: address.to_string(),
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: Sender,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// Build the transport named by the configuration.
pub fn from_config(config: &MailConfig) -> Result<Arc<dyn MailSender>, MailError> {
    let mailer: Arc<dyn MailSender> = match &config.transport {
        MailTransport::Smtp {
            relay,
            username,
            password,
        } => Arc::new(SmtpMailer::new(relay, username, password)?),
        MailTransport::Api { endpoint, api_key } => Arc::new(ApiMailer::new(endpoint, api_key)),
    };
    Ok(mailer)
}
