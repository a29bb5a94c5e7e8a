use anyhow::{anyhow, bail, Context, Result};
use std::env;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ASSETS_DIR: &str = "assets";
const DEFAULT_SMTP_RELAY: &str = "smtp.gmail.com";

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub assets_dir: String,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    /// Address every outgoing message is sent from
    pub sender: String,
    pub transport: MailTransport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailTransport {
    Smtp {
        relay: String,
        username: String,
        password: String,
    },
    Api {
        endpoint: String,
        api_key: String,
    },
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{} is not set", key));

        let port = match lookup("PORT") {
            Some(port) => port
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT: {}", port))?,
            None => DEFAULT_PORT,
        };

        let assets_dir = lookup("ASSETS_DIR").unwrap_or_else(|| DEFAULT_ASSETS_DIR.to_string());
        let sender = required("EMAIL_USER")?;
        sender
            .parse::<lettre::Address>()
            .with_context(|| format!("EMAIL_USER is not an email address: {}", sender))?;

        let transport = match lookup("MAIL_TRANSPORT").as_deref().unwrap_or("smtp") {
            "smtp" => MailTransport::Smtp {
                relay: lookup("SMTP_RELAY").unwrap_or_else(|| DEFAULT_SMTP_RELAY.to_string()),
                username: sender.clone(),
                password: required("EMAIL_PASS")?,
            },
            "api" => MailTransport::Api {
                endpoint: required("MAIL_API_URL")?,
                api_key: required("MAIL_API_KEY")?,
            },
            other => bail!("Unknown MAIL_TRANSPORT: {} (expected smtp or api)", other),
        };

        Ok(Self {
            port,
            assets_dir,
            mail: MailConfig { sender, transport },
        })
    }
}
