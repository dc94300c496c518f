//! User services: registration, login, lookup.

use mercado_core::error::DomainError;
use mercado_core::payload::{EventPayload, UserRegistered, WelcomeRequested};
use mercado_core::publisher::EventPublisher;

use crate::domain::models::{LoginUser, NewUser, RegisterUser, User};
use crate::domain::password::PasswordHasher;
use crate::domain::repository::UserRepository;

/// Source name stamped on events emitted by this context.
pub const SOURCE: &str = "UserService";

fn validate_registration(input: &RegisterUser) -> Result<(), DomainError> {
    if input.name.trim().len() < 2 {
        return Err(DomainError::Validation("name is too short".into()));
    }
    if input.last_name.trim().len() < 2 {
        return Err(DomainError::Validation("last name is too short".into()));
    }
    if !input.email.contains('@') {
        return Err(DomainError::Validation("email is not valid".into()));
    }
    if input.password.len() < 8 {
        return Err(DomainError::Validation(
            "password must be at least 8 characters".into(),
        ));
    }
    Ok(())
}

/// Registers a new user and publishes the registration and welcome events.
///
/// A failed publish fails the whole registration: the caller sees the error
/// and can roll back.
///
/// # Errors
///
/// `Validation` on bad input or a duplicate email; `Infrastructure` on
/// storage failure; `Publish` when an event cannot be emitted.
pub async fn register_user(
    input: RegisterUser,
    repo: &dyn UserRepository,
    hasher: &dyn PasswordHasher,
    publisher: &EventPublisher,
) -> Result<User, DomainError> {
    validate_registration(&input)?;

    if repo.find_by_email(&input.email).await?.is_some() {
        return Err(DomainError::Validation(
            "a user with this email already exists".into(),
        ));
    }

    let password_hash = hasher.hash(&input.password)?;
    let user = repo
        .create(&NewUser {
            name: input.name,
            last_name: input.last_name,
            email: input.email,
            password_hash,
            phone: input.phone,
        })
        .await?;

    publisher
        .publish(
            SOURCE,
            &EventPayload::UserRegistered(UserRegistered {
                user_id: user.id,
                name: user.name.clone(),
                last_name: user.last_name.clone(),
                email: user.email.clone(),
            }),
            Some(serde_json::json!({"status": "USER_REGISTERED"})),
        )
        .await?;

    publisher
        .publish(
            SOURCE,
            &EventPayload::WelcomeRequested(WelcomeRequested {
                name: user.name.clone(),
                email: user.email.clone(),
            }),
            None,
        )
        .await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Verifies credentials and returns the user.
///
/// # Errors
///
/// `Validation` with a deliberately unspecific message on unknown email or
/// wrong password; `Infrastructure` on storage failure.
pub async fn login_user(
    input: LoginUser,
    repo: &dyn UserRepository,
    hasher: &dyn PasswordHasher,
) -> Result<User, DomainError> {
    let Some((user, password_hash)) = repo.find_with_password(&input.email).await? else {
        return Err(DomainError::Validation("invalid credentials".into()));
    };

    if !hasher.verify(&input.password, &password_hash)? {
        return Err(DomainError::Validation("invalid credentials".into()));
    }

    Ok(user)
}

/// Looks a user up by email.
///
/// # Errors
///
/// `DomainError::Infrastructure` on storage failure.
pub async fn get_user_by_email(
    email: &str,
    repo: &dyn UserRepository,
) -> Result<Option<User>, DomainError> {
    repo.find_by_email(email).await
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use mercado_core::topic::Topic;
    use mercado_test_support::{FixedClock, InMemoryEventStore, RecordingBus};

    use super::*;

    /// Repository over a `Vec`, hashing nothing.
    #[derive(Default)]
    struct FakeUserRepository {
        users: Mutex<Vec<(User, String)>>,
    }

    impl FakeUserRepository {
        fn with_user(email: &str, password_hash: &str) -> Self {
            let repo = Self::default();
            repo.users.lock().unwrap().push((
                User {
                    id: Uuid::new_v4(),
                    name: "Ada".into(),
                    last_name: "Lovelace".into(),
                    email: email.into(),
                    phone: None,
                    created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
                },
                password_hash.into(),
            ));
            repo
        }
    }

    #[async_trait]
    impl UserRepository for FakeUserRepository {
        async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
            let created = User {
                id: Uuid::new_v4(),
                name: user.name.clone(),
                last_name: user.last_name.clone(),
                email: user.email.clone(),
                phone: user.phone.clone(),
                created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            };
            self.users
                .lock()
                .unwrap()
                .push((created.clone(), user.password_hash.clone()));
            Ok(created)
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|(u, _)| u.email == email)
                .map(|(u, _)| u.clone()))
        }

        async fn find_with_password(
            &self,
            email: &str,
        ) -> Result<Option<(User, String)>, DomainError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|(u, _)| u.email == email)
                .cloned())
        }
    }

    /// Hasher that prefixes instead of hashing.
    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, plain: &str) -> Result<String, DomainError> {
            Ok(format!("hashed:{plain}"))
        }

        fn verify(&self, plain: &str, hash: &str) -> Result<bool, DomainError> {
            Ok(hash == format!("hashed:{plain}"))
        }
    }

    fn publisher(store: Arc<InMemoryEventStore>, bus: Arc<RecordingBus>) -> EventPublisher {
        EventPublisher::new(
            store,
            bus,
            Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            )),
        )
    }

    fn registration() -> RegisterUser {
        RegisterUser {
            name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "password123".into(),
            phone: Some("+1234567890".into()),
        }
    }

    #[tokio::test]
    async fn test_register_user_publishes_registration_and_welcome_events() {
        // Arrange
        let repo = FakeUserRepository::default();
        let store = Arc::new(InMemoryEventStore::new());
        let bus = Arc::new(RecordingBus::new());
        let publisher = publisher(Arc::clone(&store), Arc::clone(&bus));

        // Act
        let user = register_user(registration(), &repo, &PlainHasher, &publisher)
            .await
            .unwrap();

        // Assert
        assert_eq!(user.email, "ada@example.com");

        let sent = bus.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, Topic::UserRegistration);
        assert_eq!(sent[1].0, Topic::WelcomeFlow);
        assert_eq!(sent[1].2.payload["email"], "ada@example.com");

        let stored = store.records();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|r| r.source == SOURCE));
    }

    #[tokio::test]
    async fn test_register_user_rejects_duplicate_email_without_publishing() {
        // Arrange
        let repo = FakeUserRepository::with_user("ada@example.com", "hashed:x");
        let bus = Arc::new(RecordingBus::new());
        let publisher = publisher(Arc::new(InMemoryEventStore::new()), Arc::clone(&bus));

        // Act
        let result = register_user(registration(), &repo, &PlainHasher, &publisher).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(bus.sent().is_empty());
    }

    #[tokio::test]
    async fn test_register_user_rejects_short_password() {
        let repo = FakeUserRepository::default();
        let bus = Arc::new(RecordingBus::new());
        let publisher = publisher(Arc::new(InMemoryEventStore::new()), Arc::clone(&bus));

        let mut input = registration();
        input.password = "short".into();
        let result = register_user(input, &repo, &PlainHasher, &publisher).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(bus.sent().is_empty());
    }

    #[tokio::test]
    async fn test_login_accepts_correct_credentials() {
        let repo = FakeUserRepository::with_user("ada@example.com", "hashed:password123");

        let user = login_user(
            LoginUser {
                email: "ada@example.com".into(),
                password: "password123".into(),
            },
            &repo,
            &PlainHasher,
        )
        .await
        .unwrap();

        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password_and_unknown_email_alike() {
        let repo = FakeUserRepository::with_user("ada@example.com", "hashed:password123");

        let wrong_password = login_user(
            LoginUser {
                email: "ada@example.com".into(),
                password: "nope".into(),
            },
            &repo,
            &PlainHasher,
        )
        .await;
        let unknown_email = login_user(
            LoginUser {
                email: "nobody@example.com".into(),
                password: "password123".into(),
            },
            &repo,
            &PlainHasher,
        )
        .await;

        assert!(matches!(wrong_password, Err(DomainError::Validation(_))));
        assert!(matches!(unknown_email, Err(DomainError::Validation(_))));
    }
}
