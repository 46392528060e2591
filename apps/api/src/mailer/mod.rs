//! Outbound email transport behind a trait object so tests can inject a
//! recording implementation.
//!
//! `AppState` holds an `Arc<dyn MailTransport>`: `SmtpMailer` (lettre,
//! STARTTLS) when the MAIL_* variables are configured, `NullMailer`
//! otherwise.

pub mod notify;

use anyhow::Result;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tracing::warn;

use crate::config::MailConfig;

/// A composed message ready for the transport. HTML-only; the service
/// sends nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("mail transport is not configured")]
    NotConfigured,

    #[error("invalid mailbox: {0}")]
    Mailbox(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP send failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<(), TransportError>;
}

/// Sends through an SMTP relay with STARTTLS and username/password
/// credentials, as the mail provider expects on port 587.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        let sender: Mailbox = config.sender().parse()?;

        Ok(SmtpMailer { transport, sender })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), TransportError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(email.to.parse::<Mailbox>()?)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html_body)?;

        self.transport.send(message).await?;
        Ok(())
    }
}

/// Installed when SMTP is not configured. Every send fails with
/// `NotConfigured`; the dispatcher logs and swallows it like any other
/// transport failure.
pub struct NullMailer;

#[async_trait]
impl MailTransport for NullMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), TransportError> {
        warn!(
            "Mail transport not configured; dropping email to {} ({})",
            email.to, email.subject
        );
        Err(TransportError::NotConfigured)
    }
}
