//! Welcome-flow consumer: turns a registration into a welcome email.

use std::sync::Arc;

use async_trait::async_trait;

use mercado_core::bus::MessageHandler;
use mercado_core::error::HandlerError;
use mercado_core::payload::{EmailNotification, EventPayload, WelcomeRequested};
use mercado_core::publisher::EventPublisher;
use mercado_users::domain::repository::UserRepository;

use crate::decode_payload;

/// Consumer group for the welcome flow.
pub const GROUP_ID: &str = "welcome-flow-group";

/// Source name stamped on the chained notification event.
pub const SOURCE: &str = "WelcomeFlowService";

/// Handles `welcome-flow` messages: looks the user up and chains an email
/// notification.
pub struct WelcomeFlowHandler {
    users: Arc<dyn UserRepository>,
    publisher: EventPublisher,
}

impl WelcomeFlowHandler {
    /// Creates the handler over its collaborators.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, publisher: EventPublisher) -> Self {
        Self { users, publisher }
    }
}

fn welcome_email(name: &str) -> String {
    format!(
        "<h1>¡Bienvenido a nuestra tienda!</h1>\
         <p>Hola {name},</p>\
         <p>Gracias por registrarte. Ya puedes explorar nuestro catálogo y \
         llenar tu carrito.</p>\
         <p>¡Que disfrutes tus compras!</p>"
    )
}

#[async_trait]
impl MessageHandler for WelcomeFlowHandler {
    async fn handle(&self, message: &[u8]) -> Result<(), HandlerError> {
        let Some((envelope, payload)) =
            decode_payload::<WelcomeRequested>(message, "welcome-flow")
        else {
            return Ok(());
        };

        tracing::info!(event_id = %envelope.event_id, "processing welcome flow event");

        let Some(user) = self
            .users
            .find_by_email(&payload.email)
            .await
            .map_err(HandlerError::from)?
        else {
            tracing::warn!(email = %payload.email, "user not found; welcome email skipped");
            return Ok(());
        };

        self.publisher
            .publish(
                SOURCE,
                &EventPayload::EmailNotification(EmailNotification {
                    to: user.email.clone(),
                    subject: "¡Bienvenido a nuestra tienda!".to_owned(),
                    content: welcome_email(&user.name),
                }),
                Some(serde_json::json!({
                    "userId": user.id,
                    "status": "WELCOME_NOTIFICATION_SENT",
                })),
            )
            .await?;

        tracing::info!(email = %user.email, "welcome notification queued");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use mercado_core::error::DomainError;
    use mercado_core::event::Envelope;
    use mercado_core::topic::Topic;
    use mercado_test_support::{FixedClock, InMemoryEventStore, RecordingBus};
    use mercado_users::domain::models::{NewUser, User};

    use super::*;

    struct FakeUsers {
        user: Option<User>,
        fail: bool,
    }

    #[async_trait]
    impl UserRepository for FakeUsers {
        async fn create(&self, _user: &NewUser) -> Result<User, DomainError> {
            unimplemented!("not used by welcome tests")
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, DomainError> {
            if self.fail {
                return Err(DomainError::Infrastructure("db down".into()));
            }
            Ok(self.user.clone())
        }

        async fn find_with_password(
            &self,
            _email: &str,
        ) -> Result<Option<(User, String)>, DomainError> {
            unimplemented!("not used by welcome tests")
        }
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: None,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    fn message() -> Vec<u8> {
        let envelope = Envelope {
            event_id: Uuid::new_v4(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            source: "UserService".into(),
            payload: serde_json::json!({"name": "Ada", "email": "ada@example.com"}),
        };
        serde_json::to_vec(&envelope).unwrap()
    }

    fn handler(users: FakeUsers, bus: Arc<RecordingBus>) -> WelcomeFlowHandler {
        let publisher = EventPublisher::new(
            Arc::new(InMemoryEventStore::new()),
            bus,
            Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            )),
        );
        WelcomeFlowHandler::new(Arc::new(users), publisher)
    }

    #[tokio::test]
    async fn test_known_user_chains_a_welcome_notification() {
        // Arrange
        let bus = Arc::new(RecordingBus::new());
        let handler = handler(
            FakeUsers {
                user: Some(user()),
                fail: false,
            },
            Arc::clone(&bus),
        );

        // Act
        handler.handle(&message()).await.unwrap();

        // Assert
        let sent = bus.sent_to(Topic::Notification);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].source, SOURCE);
        assert_eq!(sent[0].payload["to"], "ada@example.com");
        assert_eq!(sent[0].payload["subject"], "¡Bienvenido a nuestra tienda!");
        assert!(
            sent[0].payload["content"]
                .as_str()
                .unwrap()
                .contains("Hola Ada")
        );
    }

    #[tokio::test]
    async fn test_unknown_user_is_skipped_without_publishing() {
        let bus = Arc::new(RecordingBus::new());
        let handler = handler(
            FakeUsers {
                user: None,
                fail: false,
            },
            Arc::clone(&bus),
        );

        handler.handle(&message()).await.unwrap();

        assert!(bus.sent().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_message_is_dropped_quietly() {
        let bus = Arc::new(RecordingBus::new());
        let handler = handler(
            FakeUsers {
                user: Some(user()),
                fail: false,
            },
            Arc::clone(&bus),
        );

        handler.handle(b"not json").await.unwrap();

        assert!(bus.sent().is_empty());
    }

    #[tokio::test]
    async fn test_repository_failure_surfaces_to_the_policy() {
        let bus = Arc::new(RecordingBus::new());
        let handler = handler(
            FakeUsers {
                user: None,
                fail: true,
            },
            Arc::clone(&bus),
        );

        let result = handler.handle(&message()).await;

        assert!(result.is_err());
        assert!(bus.sent().is_empty());
    }
}
