//! The mail-sending seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MailError;

/// One outbound email: recipient, subject, HTML body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub content: String,
}

/// Capability to deliver one email.
///
/// The notification consumer is the only production caller; everything else
/// reaches mail through the event pipeline.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Delivers one message.
    ///
    /// # Errors
    ///
    /// `MailError` when the address is invalid or the transport fails.
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}
