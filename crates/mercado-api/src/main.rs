//! Mercado API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use mercado_api::config::Config;
use mercado_api::error::AppError;
use mercado_api::routes;
use mercado_api::state::AppState;
use mercado_bus::{BusConfig, KafkaBus, OutboxSweeper, SweepConfig};
use mercado_core::clock::SystemClock;
use mercado_core::publisher::EventPublisher;
use mercado_core::store::EventStore;
use mercado_event_store::PgEventStore;
use mercado_mail::{Mailer, SmtpMailer};
use mercado_store::{PgCartRepository, PgOrderRepository, PgProductRepository, PgUserRepository};
use mercado_users::domain::password::BcryptHasher;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Mercado API server");

    let config = Config::from_env()?;

    // Create the shared database connection pool and apply migrations.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;

    // Event pipeline: store, bus, publisher.
    let event_store: Arc<dyn EventStore> = Arc::new(PgEventStore::new(pool.clone()));
    let bus = Arc::new(KafkaBus::new(BusConfig::new(
        config.kafka_brokers.clone(),
        config.kafka_client_id.clone(),
    )));
    bus.producer().await?;
    let clock = Arc::new(SystemClock);
    let publisher = EventPublisher::new(
        Arc::clone(&event_store),
        Arc::clone(&bus) as Arc<dyn mercado_core::bus::MessageBus>,
        clock.clone(),
    );

    // Mail capability.
    let mailer = Arc::new(SmtpMailer::new(&config.smtp)?);
    match mailer.verify().await {
        Ok(true) => tracing::info!("email configuration verified"),
        Ok(false) | Err(_) => {
            tracing::warn!("email configuration could not be verified; sends may fail");
        }
    }

    // Relational repositories.
    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let products = Arc::new(PgProductRepository::new(pool.clone()));
    let carts = Arc::new(PgCartRepository::new(pool.clone()));
    let orders = Arc::new(PgOrderRepository::new(pool.clone()));

    // Start the four consumers, each under its own group.
    let subscriptions = mercado_consumers::start_consumers(
        &bus,
        &publisher,
        Arc::clone(&mailer) as Arc<dyn Mailer>,
        users.clone(),
        orders.clone(),
    )?;
    tracing::info!(consumers = subscriptions.len(), "consumers started");

    // Outbox reconciliation sweep for stored-but-unbroadcast events.
    let sweeper = OutboxSweeper::new(
        Arc::clone(&event_store),
        Arc::clone(&bus) as Arc<dyn mercado_core::bus::MessageBus>,
        clock,
        SweepConfig {
            interval: config.sweep_interval,
            ..SweepConfig::default()
        },
    );
    let sweeper_task = tokio::spawn(sweeper.run());

    // Build application state and router.
    let app_state = AppState {
        publisher,
        event_store,
        users,
        products,
        carts,
        orders,
        hasher: Arc::new(BcryptHasher),
    };

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/users", routes::users::router())
        .nest("/api/products", routes::products::router())
        .nest("/api/cart", routes::cart::router())
        .nest("/api/orders", routes::orders::router())
        .nest("/api/events", routes::events::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Orderly teardown: stop the sweep, close consumers, flush the
    // producer, close the pool.
    sweeper_task.abort();
    for subscription in &subscriptions {
        subscription.stop();
    }
    bus.disconnect().await;
    pool.close().await;
    tracing::info!("shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
