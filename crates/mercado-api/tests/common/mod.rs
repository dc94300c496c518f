//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use mercado_api::routes;
use mercado_api::state::AppState;
use mercado_cart::domain::repository::CartRepository;
use mercado_core::error::DomainError;
use mercado_core::publisher::EventPublisher;
use mercado_core::store::EventStore;
use mercado_test_support::{FixedClock, InMemoryEventStore, RecordingBus};

/// Everything a test needs to observe the app from the outside.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryEventStore>,
    pub bus: Arc<RecordingBus>,
}

/// Build the full app router over in-memory fakes, with the same route
/// structure as `main.rs`.
pub fn build_test_app() -> TestApp {
    let store = Arc::new(InMemoryEventStore::new());
    let bus = Arc::new(RecordingBus::new());
    let publisher = EventPublisher::new(
        Arc::clone(&store) as Arc<dyn EventStore>,
        Arc::clone(&bus) as Arc<dyn mercado_core::bus::MessageBus>,
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        )),
    );

    let app_state = AppState {
        publisher,
        event_store: Arc::clone(&store) as Arc<dyn EventStore>,
        users: Arc::new(InMemoryUsers::default()),
        products: Arc::new(InMemoryProducts::default()),
        carts: Arc::new(EmptyCarts),
        orders: Arc::new(EmptyOrders),
        hasher: Arc::new(PlainHasher),
    };

    let router = Router::new()
        .merge(routes::health::router())
        .nest("/api/users", routes::users::router())
        .nest("/api/products", routes::products::router())
        .nest("/api/cart", routes::cart::router())
        .nest("/api/orders", routes::orders::router())
        .nest("/api/events", routes::events::router())
        .with_state(app_state);

    TestApp { router, store, bus }
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

// --- in-memory collaborators ---

use mercado_cart::domain::models::{Cart, CartItem};
use mercado_catalog::domain::models::{CreateProduct, Product};
use mercado_catalog::domain::repository::ProductRepository;
use mercado_orders::domain::models::{Order, OrderItem, OrderStatus};
use mercado_orders::domain::repository::OrderRepository;
use mercado_users::domain::models::{NewUser, User};
use mercado_users::domain::password::PasswordHasher;
use mercado_users::domain::repository::UserRepository;

/// Hasher that prefixes instead of hashing.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, plain: &str) -> Result<String, DomainError> {
        Ok(format!("hashed:{plain}"))
    }

    fn verify(&self, plain: &str, hash: &str) -> Result<bool, DomainError> {
        Ok(hash == format!("hashed:{plain}"))
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<(User, String)>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
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

#[derive(Default)]
pub struct InMemoryProducts {
    products: Mutex<Vec<Product>>,
}

#[async_trait]
impl ProductRepository for InMemoryProducts {
    async fn create(&self, product: &CreateProduct) -> Result<Product, DomainError> {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let created = Product {
            id: Uuid::new_v4(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            category: product.category.clone(),
            stock: product.stock,
            created_at: now,
            updated_at: now,
        };
        self.products.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.products.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn decrement_stock(&self, id: Uuid, quantity: i32) -> Result<bool, DomainError> {
        let mut products = self.products.lock().unwrap();
        match products.iter_mut().find(|p| p.id == id) {
            Some(p) if p.stock >= quantity => {
                p.stock -= quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Cart repository for tests that never touch carts.
pub struct EmptyCarts;

#[async_trait]
impl CartRepository for EmptyCarts {
    async fn add_item(&self, user_id: Uuid, item: &CartItem) -> Result<Cart, DomainError> {
        Ok(Cart {
            id: Uuid::new_v4(),
            user_id,
            items: vec![item.clone()],
            total_items: item.quantity,
            total_amount: item.price * f64::from(item.quantity),
            updated_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        })
    }

    async fn remove_item(
        &self,
        _user_id: Uuid,
        _product_id: Uuid,
    ) -> Result<Option<Cart>, DomainError> {
        Ok(None)
    }

    async fn find_by_user(&self, _user_id: Uuid) -> Result<Option<Cart>, DomainError> {
        Ok(None)
    }

    async fn clear(&self, _user_id: Uuid) -> Result<bool, DomainError> {
        Ok(false)
    }
}

/// Order repository for tests that never touch orders.
pub struct EmptyOrders;

#[async_trait]
impl OrderRepository for EmptyOrders {
    async fn create(&self, _user_id: Uuid, _items: &[OrderItem]) -> Result<Order, DomainError> {
        Err(DomainError::Infrastructure("not wired in this test".into()))
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(None)
    }

    async fn find_by_user(&self, _user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        Ok(vec![])
    }

    async fn update_status(&self, _id: Uuid, _status: OrderStatus) -> Result<bool, DomainError> {
        Ok(false)
    }
}
