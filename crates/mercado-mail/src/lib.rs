//! Mail capability: `send(to, subject, html)` behind a trait.

pub mod error;
pub mod mailer;
pub mod smtp;

pub use error::MailError;
pub use mailer::{EmailMessage, Mailer};
pub use smtp::{SmtpConfig, SmtpMailer};
