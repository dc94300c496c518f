//! SMTP implementation of the `Mailer` trait.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::MailError;
use crate::mailer::{EmailMessage, Mailer};

/// SMTP configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server host.
    pub host: String,
    /// SMTP server port (STARTTLS).
    pub port: u16,
    /// Username for authentication.
    pub username: String,
    /// Password for authentication.
    pub password: String,
    /// Sender address used on every outbound message.
    pub from: String,
}

/// Mailer delivering over a pooled async SMTP connection.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    /// Creates a mailer from SMTP configuration.
    ///
    /// # Errors
    ///
    /// `MailError::Transport` when the relay cannot be configured.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        tracing::info!(host = %config.host, port = config.port, "SMTP transport initialized");

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    /// Verifies that the SMTP server accepts connections.
    ///
    /// # Errors
    ///
    /// `MailError::Transport` when the connection test fails.
    pub async fn verify(&self) -> Result<bool, MailError> {
        self.transport
            .test_connection()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let email = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|_| MailError::InvalidAddress(self.from.clone()))?,
            )
            .to(message
                .to
                .parse()
                .map_err(|_| MailError::InvalidAddress(message.to.clone()))?)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.content.clone())
            .map_err(|e| MailError::Transport(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        tracing::info!(to = %message.to, subject = %message.subject, "email sent");
        Ok(())
    }
}
