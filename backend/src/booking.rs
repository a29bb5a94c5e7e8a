use crate::mailer::{MailSender, OutgoingMail, Sender};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info};

pub const BOOKING_SUCCESS_URL: &str = "/book-event?success=true";
pub const BOOKING_ERROR_URL: &str = "/book-event?error=true";

/// Fixed details of the business, baked into every message.
#[derive(Debug, Clone, Copy)]
pub struct Business {
    pub name: &'static str,
    pub inbox: &'static str,
    pub phone: &'static str,
    pub confirmation_subject: &'static str,
}

pub const LANDOS_BARBEQUE: Business = Business {
    name: "Lando's Barbeque",
    inbox: "landosbarbeque@gmail.com",
    phone: "801-471-8715",
    confirmation_subject: "Thank you for contacting Lando's Barbeque!",
};

/// Booking form fields. Nothing is validated; missing fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl BookingRequest {
    /// Builds a request from decoded form pairs. A repeated field keeps its
    /// last value and unknown fields are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut request = Self::default();
        for (key, value) in pairs {
            if let Some(field) = request.field_mut(&key) {
                *field = value;
            }
        }
        request
    }

    /// Builds a request from a JSON object. Non-string values are kept as
    /// their JSON text, `null` as the empty string.
    pub fn from_json(object: Map<String, Value>) -> Self {
        Self::from_pairs(object.into_iter().map(|(key, value)| {
            let text = match value {
                Value::String(text) => text,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, text)
        }))
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "name" => Some(&mut self.name),
            "email" => Some(&mut self.email),
            "phone" => Some(&mut self.phone),
            "message" => Some(&mut self.message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingOutcome {
    pub business_sent: bool,
    pub customer_sent: bool,
}

impl BookingOutcome {
    pub const FAILED: Self = Self {
        business_sent: false,
        customer_sent: false,
    };

    /// One delivered message is enough to tell the customer it worked.
    pub fn succeeded(&self) -> bool {
        self.business_sent || self.customer_sent
    }

    pub fn redirect_target(&self) -> &'static str {
        if self.succeeded() {
            BOOKING_SUCCESS_URL
        } else {
            BOOKING_ERROR_URL
        }
    }
}

pub struct BookingApp {
    mailer: Arc<dyn MailSender>,
    sender: String,
    business: Business,
}

impl BookingApp {
    pub fn new(mailer: Arc<dyn MailSender>, sender: &str) -> Self {
        Self {
            mailer,
            sender: sender.to_string(),
            business: LANDOS_BARBEQUE,
        }
    }

    // Field values are interpolated as-is, HTML included.
    pub fn business_notification(&self, request: &BookingRequest) -> OutgoingMail {
        OutgoingMail {
            from: Sender::bare(&self.sender),
            to: self.business.inbox.to_string(),
            reply_to: Some(request.email.clone()),
            subject: format!("New Booking Request from {}", request.name),
            html: format!(
                r#"
<h2>New Booking Request</h2>
<p><strong>Name:</strong> {name}</p>
<p><strong>Email:</strong> {email}</p>
<p><strong>Phone:</strong> {phone}</p>
<p><strong>Message:</strong></p>
<p>{message}</p>
"#,
                name = request.name,
                email = request.email,
                phone = request.phone,
                message = request.message,
            ),
        }
    }

    pub fn customer_confirmation(&self, request: &BookingRequest) -> OutgoingMail {
        OutgoingMail {
            from: Sender::named(self.business.name, &self.sender),
            to: request.email.clone(),
            reply_to: None,
            subject: self.business.confirmation_subject.to_string(),
            html: format!(
                r#"
<h2>Thank you for your booking request, {name}!</h2>
<p>We've received your message and will get back to you shortly.</p>
<hr>
<p><strong>Your message:</strong></p>
<p>{message}</p>
<hr>
<p>If you have any questions, feel free to call or text us at <a href="tel:{phone}">{phone}</a>.</p>
<p>Best regards,<br>{business}</p>
"#,
                name = request.name,
                message = request.message,
                phone = self.business.phone,
                business = self.business.name,
            ),
        }
    }

    /// Attempts both messages in order. The second is sent whatever happened
    /// to the first.
    pub async fn handle_booking(&self, request: &BookingRequest) -> BookingOutcome {
        debug!("Handling booking request from {}", request.name);

        let business_sent = self
            .attempt("business notification", self.business_notification(request))
            .await;
        let customer_sent = self
            .attempt("customer confirmation", self.customer_confirmation(request))
            .await;

        BookingOutcome {
            business_sent,
            customer_sent,
        }
    }

    async fn attempt(&self, kind: &str, mail: OutgoingMail) -> bool {
        match self.mailer.send(&mail).await {
            Ok(()) => {
                info!("Sent {} to {}", kind, mail.to);
                true
            }
            Err(e) => {
                error!("Error sending {}: {}", kind, e);
                false
            }
        }
    }
}
