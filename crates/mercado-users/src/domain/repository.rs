//! User repository abstraction.

use async_trait::async_trait;

use mercado_core::error::DomainError;

use super::models::{NewUser, User};

/// Relational access to users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` on storage failure.
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;

    /// Looks a user up by email.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` on storage failure.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Looks a user up by email together with the stored password hash, for
    /// credential verification.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` on storage failure.
    async fn find_with_password(&self, email: &str)
    -> Result<Option<(User, String)>, DomainError>;
}
