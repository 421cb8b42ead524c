//! SMTP notifier (STARTTLS, plain-text UTF-8 body).

use async_trait::async_trait;
use holdwatch_core::config::EmailSettings;
use holdwatch_core::errors::NotifyError;
use holdwatch_core::notify::Notifier;
use holdwatch_core::utils::{clean_credential, clean_optional_credential};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{debug, info};

/// SMTP reply code for rejected credentials.
const AUTH_FAILED_CODE: &str = "535";

/// Sender login and recipient, already sanitised.
#[derive(Clone, PartialEq, Eq)]
pub struct EmailCredentials {
    pub sender: String,
    pub password: String,
    pub recipient: String,
}

impl EmailCredentials {
    /// Clean every value; the recipient defaults to the sender. Returns
    /// `None` when the sender or password is missing.
    pub fn from_parts(
        sender: Option<&str>,
        password: Option<&str>,
        recipient: Option<&str>,
    ) -> Option<Self> {
        let sender = clean_optional_credential(sender)?;
        let password = clean_optional_credential(password)?;
        let recipient = recipient
            .map(clean_credential)
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| sender.clone());
        Some(Self {
            sender,
            password,
            recipient,
        })
    }
}

impl std::fmt::Debug for EmailCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailCredentials")
            .field("sender", &self.sender)
            .field("password", &"<redacted>")
            .field("recipient", &self.recipient)
            .finish()
    }
}

pub struct SmtpNotifier {
    settings: EmailSettings,
    credentials: Option<EmailCredentials>,
}

impl SmtpNotifier {
    pub fn new(settings: EmailSettings, credentials: Option<EmailCredentials>) -> Self {
        Self {
            settings,
            credentials,
        }
    }

    fn credentials(&self) -> Result<&EmailCredentials, NotifyError> {
        self.credentials
            .as_ref()
            .ok_or(NotifyError::MissingCredentials)
    }

    /// The message that `send` would deliver.
    pub fn build_message(&self, subject: &str, body: &str) -> Result<Message, NotifyError> {
        let credentials = self.credentials()?;
        Message::builder()
            .from(parse_mailbox(&credentials.sender)?)
            .to(parse_mailbox(&credentials.recipient)?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifyError::Message(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| NotifyError::InvalidAddress {
            address: address.to_string(),
            message: e.to_string(),
        })
}

fn classify_smtp_error(err: lettre::transport::smtp::Error) -> NotifyError {
    match err.status() {
        Some(code) if code.to_string() == AUTH_FAILED_CODE => {
            NotifyError::Authentication(err.to_string())
        }
        _ => NotifyError::Transport(err.to_string()),
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let message = self.build_message(subject, body)?;
        let credentials = self.credentials()?;

        debug!(
            "Connecting to {}:{}",
            self.settings.smtp_server, self.settings.smtp_port
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.smtp_server)
            .map_err(classify_smtp_error)?
            .port(self.settings.smtp_port)
            .credentials(Credentials::new(
                credentials.sender.clone(),
                credentials.password.clone(),
            ))
            .build();

        transport.send(message).await.map_err(classify_smtp_error)?;
        info!("Email sent to {}", credentials.recipient);
        Ok(())
    }
}
