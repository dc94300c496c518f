//! Password hashing seam.
//!
//! Hashing mechanics are a collaborator concern; services only see this
//! trait.

use mercado_core::error::DomainError;

/// Hashes and verifies passwords.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` when hashing fails.
    fn hash(&self, plain: &str) -> Result<String, DomainError>;

    /// Verifies a plaintext password against a stored hash.
    ///
    /// # Errors
    ///
    /// `DomainError::Infrastructure` when the hash is unreadable.
    fn verify(&self, plain: &str, hash: &str) -> Result<bool, DomainError>;
}

/// Bcrypt-backed hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptHasher;

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plain: &str) -> Result<String, DomainError> {
        bcrypt::hash(plain, bcrypt::DEFAULT_COST)
            .map_err(|e| DomainError::Infrastructure(e.to_string()))
    }

    fn verify(&self, plain: &str, hash: &str) -> Result<bool, DomainError> {
        bcrypt::verify(plain, hash).map_err(|e| DomainError::Infrastructure(e.to_string()))
    }
}
