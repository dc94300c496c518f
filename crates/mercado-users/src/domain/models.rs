//! User model types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user, as exposed to callers. Never carries the password
/// hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User identifier.
    pub id: Uuid,
    /// First name.
    pub name: String,
    /// Last name.
    pub last_name: String,
    /// Email address, unique across users.
    pub email: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Insert form of a user, with the already-hashed password.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// First name.
    pub name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Bcrypt hash of the password.
    pub password_hash: String,
    /// Optional phone number.
    pub phone: Option<String>,
}

/// Registration input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    /// First name.
    pub name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Plaintext password; hashed before it reaches storage.
    pub password: String,
    /// Optional phone number.
    pub phone: Option<String>,
}

/// Login input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}
