//! End-to-end pipeline properties over the in-process bus: store-before-
//! publish, consumer-group fan-out and isolation, and event chaining from
//! order creation all the way to the delivered invoice email.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use mercado_consumers::invoice_processing::InvoiceProcessingHandler;
use mercado_consumers::notification::NotificationHandler;
use mercado_core::bus::{MessageBus, MessageHandler};
use mercado_core::error::{DomainError, HandlerError};
use mercado_core::event::Envelope;
use mercado_core::payload::{EventPayload, InvoiceRequested, OrderCreated};
use mercado_core::publisher::EventPublisher;
use mercado_core::store::EventStore;
use mercado_core::topic::Topic;
use mercado_mail::Mailer;
use mercado_orders::domain::models::{Order, OrderItem, OrderStatus};
use mercado_orders::domain::repository::OrderRepository;
use mercado_test_support::{FixedClock, InMemoryBus, InMemoryEventStore, RecordingMailer};

fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    ))
}

/// Asserts, at delivery time, that the delivered event is already durably
/// stored.
struct StoreCheckingHandler {
    store: Arc<InMemoryEventStore>,
    verified: AtomicU32,
}

#[async_trait]
impl MessageHandler for StoreCheckingHandler {
    async fn handle(&self, message: &[u8]) -> Result<(), HandlerError> {
        let envelope = Envelope::decode(message).map_err(|e| HandlerError(e.to_string()))?;
        let stored = self
            .store
            .find_all()
            .await
            .map_err(|e| HandlerError(e.to_string()))?;
        assert!(
            stored.iter().any(|r| r.event_id == envelope.event_id),
            "event reached the bus before it was stored"
        );
        self.verified.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct CountingHandler {
    calls: AtomicU32,
    fail: bool,
}

#[async_trait]
impl MessageHandler for CountingHandler {
    async fn handle(&self, _message: &[u8]) -> Result<(), HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(HandlerError("side effect failed".into()))
        } else {
            Ok(())
        }
    }
}

#[tokio::test]
async fn test_event_is_stored_before_the_bus_sees_it() {
    // Arrange
    let store = Arc::new(InMemoryEventStore::new());
    let bus = Arc::new(InMemoryBus::new());
    let handler = Arc::new(StoreCheckingHandler {
        store: Arc::clone(&store),
        verified: AtomicU32::new(0),
    });
    bus.subscribe("order-audit-group", Topic::OrderCreated, handler.clone());

    let publisher = EventPublisher::new(
        Arc::clone(&store) as Arc<dyn EventStore>,
        Arc::clone(&bus) as Arc<dyn MessageBus>,
        fixed_clock(),
    );

    // Act
    publisher
        .publish(
            "OrderService",
            &EventPayload::OrderCreated(OrderCreated {
                order_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                total_amount: 100.0,
            }),
            Some(serde_json::json!({"status": "CREATED", "items": 1})),
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(handler.verified.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_every_group_receives_every_message_despite_one_failing() {
    // Arrange: two independent groups on the same topic.
    let bus = Arc::new(InMemoryBus::new());
    let failing = Arc::new(CountingHandler {
        calls: AtomicU32::new(0),
        fail: true,
    });
    let healthy = Arc::new(CountingHandler {
        calls: AtomicU32::new(0),
        fail: false,
    });
    bus.subscribe("failing-group", Topic::Notification, failing.clone());
    bus.subscribe("healthy-group", Topic::Notification, healthy.clone());

    // Act
    bus.deliver(Topic::Notification, b"{}").await;
    bus.deliver(Topic::Notification, b"{}").await;

    // Assert: fan-out to each group, isolation between them.
    assert_eq!(failing.calls.load(Ordering::SeqCst), 2);
    assert_eq!(healthy.calls.load(Ordering::SeqCst), 2);
}

struct SingleOrder {
    order: Mutex<Order>,
}

#[async_trait]
impl OrderRepository for SingleOrder {
    async fn create(&self, _user_id: Uuid, _items: &[OrderItem]) -> Result<Order, DomainError> {
        unimplemented!("not used by pipeline tests")
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let order = self.order.lock().unwrap().clone();
        Ok((order.id == id).then_some(order))
    }

    async fn find_by_user(&self, _user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        unimplemented!("not used by pipeline tests")
    }

    async fn update_status(&self, _id: Uuid, status: OrderStatus) -> Result<bool, DomainError> {
        self.order.lock().unwrap().status = status;
        Ok(true)
    }
}

#[tokio::test]
async fn test_invoice_chain_ends_in_a_delivered_email() {
    // Arrange: invoice-processing and notification consumers on the same
    // in-process bus, exactly as wired at startup.
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let order = Order {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        items: vec![OrderItem {
            product_id: Uuid::new_v4(),
            quantity: 2,
            price: 99.99,
            name: "Test Product".into(),
        }],
        total_items: 2,
        total_amount: 199.98,
        status: OrderStatus::Created,
        created_at: now,
        updated_at: now,
    };
    let order_id = order.id;
    let orders = Arc::new(SingleOrder {
        order: Mutex::new(order),
    });

    let store = Arc::new(InMemoryEventStore::new());
    let bus = Arc::new(InMemoryBus::new());
    let publisher = EventPublisher::new(
        Arc::clone(&store) as Arc<dyn EventStore>,
        Arc::clone(&bus) as Arc<dyn MessageBus>,
        fixed_clock(),
    );

    let mailer = Arc::new(RecordingMailer::new());
    bus.subscribe(
        mercado_consumers::invoice_processing::GROUP_ID,
        Topic::InvoiceProcessing,
        Arc::new(InvoiceProcessingHandler::new(
            Arc::clone(&orders) as Arc<dyn OrderRepository>,
            publisher.clone(),
        )),
    );
    bus.subscribe(
        mercado_consumers::notification::GROUP_ID,
        Topic::Notification,
        Arc::new(NotificationHandler::new(
            Arc::clone(&mailer) as Arc<dyn Mailer>
        )),
    );

    // Act: the order service's second publish.
    publisher
        .publish(
            "OrderService",
            &EventPayload::InvoiceRequested(InvoiceRequested {
                order_id,
                user_email: "ada@example.com".into(),
            }),
            None,
        )
        .await
        .unwrap();

    // Assert: the order moved to PROCESSING and the invoice arrived.
    assert_eq!(
        orders.order.lock().unwrap().status,
        OrderStatus::Processing
    );
    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ada@example.com");
    assert_eq!(sent[0].subject, format!("Factura #{order_id}"));

    // Both hops were durably recorded: the request and the chained
    // notification.
    let recorded = store.find_all().await.unwrap();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0].topic, Topic::InvoiceProcessing);
    assert_eq!(recorded[1].topic, Topic::Notification);
    assert_eq!(recorded[1].source, "InvoiceService");
}
