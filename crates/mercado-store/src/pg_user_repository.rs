//! `PostgreSQL` implementation of the `UserRepository` trait.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use mercado_core::error::DomainError;
use mercado_users::domain::models::{NewUser, User};
use mercado_users::domain::repository::UserRepository;

use crate::infra;

/// PostgreSQL-backed user repository.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Creates a new `PgUserRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &sqlx::postgres::PgRow) -> User {
        User {
            id: row.get("id"),
            name: row.get("name"),
            last_name: row.get("last_name"),
            email: row.get("email"),
            phone: row.get("phone"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let row = sqlx::query(
            "INSERT INTO users (name, last_name, email, password_hash, phone)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, name, last_name, email, phone, created_at",
        )
        .bind(&user.name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(infra)?;

        Ok(Self::row_to_user(&row))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, last_name, email, phone, created_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)?;

        Ok(row.as_ref().map(Self::row_to_user))
    }

    async fn find_with_password(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, last_name, email, phone, created_at, password_hash
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)?;

        Ok(row
            .as_ref()
            .map(|r| (Self::row_to_user(r), r.get("password_hash"))))
    }
}
