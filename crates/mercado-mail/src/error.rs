//! Mail error types.

use thiserror::Error;

/// Errors surfaced by the mail capability.
#[derive(Debug, Error)]
pub enum MailError {
    /// A recipient or sender address could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Building or delivering the message failed.
    #[error("mail transport error: {0}")]
    Transport(String),
}
