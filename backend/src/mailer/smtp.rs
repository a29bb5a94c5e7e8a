use super::{MailError, MailSender, OutgoingMail};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, warn};

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(relay: &str, username: &str, password: &str) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(relay)?
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();
        Ok(Self { transport })
    }
}

pub(crate) fn build_message(mail: &OutgoingMail) -> Result<Message, MailError> {
    let from = Mailbox::new(mail.from.name.clone(), mail.from.address.parse()?);

    let mut builder = Message::builder()
        .from(from)
        .to(mail.to.parse()?)
        .subject(mail.subject.clone());

    // An unusable Reply-To is dropped, the message still goes out.
    if let Some(reply_to) = &mail.reply_to {
        match reply_to.parse::<Mailbox>() {
            Ok(mailbox) => builder = builder.reply_to(mailbox),
            Err(e) => warn!("Dropping Reply-To {:?}: {}", reply_to, e),
        }
    }

    Ok(builder
        .header(ContentType::TEXT_HTML)
        .body(mail.html.clone())?)
}

#[async_trait]
impl MailSender for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = build_message(mail)?;
        let response = self.transport.send(message).await?;
        debug!("SMTP response code: {}", response.code());
        Ok(())
    }
}
