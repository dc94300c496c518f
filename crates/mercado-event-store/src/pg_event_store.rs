//! `PostgreSQL` implementation of the `EventStore` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use mercado_core::error::EventStoreError;
use mercado_core::event::EventRecord;
use mercado_core::store::EventStore;
use mercado_core::topic::Topic;

/// PostgreSQL-backed event store over a shared connection pool.
///
/// The pool is the process-wide connection handle: constructed once at
/// startup, injected here, and closed on shutdown by its owner.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

const SELECT_COLUMNS: &str =
    "event_id, occurred_at, source, topic, payload, snapshot, published";

impl PgEventStore {
    /// Creates a new `PgEventStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &PgRow) -> Result<EventRecord, EventStoreError> {
        let topic: String = row.get("topic");
        let topic = topic
            .parse::<Topic>()
            .map_err(|e| EventStoreError::Serialization(e.to_string()))?;

        Ok(EventRecord {
            event_id: row.get("event_id"),
            occurred_at: row.get("occurred_at"),
            source: row.get("source"),
            topic,
            payload: row.get("payload"),
            snapshot: row.get("snapshot"),
            published: row.get("published"),
        })
    }

    fn map_rows(rows: &[PgRow]) -> Result<Vec<EventRecord>, EventStoreError> {
        rows.iter().map(Self::row_to_record).collect()
    }
}

/// SQLSTATE for a unique-constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

fn map_save_error(err: sqlx::Error, event_id: Uuid) -> EventStoreError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
    {
        return EventStoreError::Duplicate(event_id);
    }
    EventStoreError::Unavailable(err.to_string())
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn save(&self, record: &EventRecord) -> Result<(), EventStoreError> {
        sqlx::query(
            "INSERT INTO events (event_id, occurred_at, source, topic, payload, snapshot, published)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(record.event_id)
        .bind(record.occurred_at)
        .bind(&record.source)
        .bind(record.topic.as_str())
        .bind(&record.payload)
        .bind(&record.snapshot)
        .bind(record.published)
        .execute(&self.pool)
        .await
        .map_err(|e| map_save_error(e, record.event_id))?;

        tracing::debug!(event_id = %record.event_id, topic = %record.topic, "event saved");
        Ok(())
    }

    async fn mark_published(&self, event_id: Uuid) -> Result<(), EventStoreError> {
        sqlx::query("UPDATE events SET published = TRUE WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(|e| EventStoreError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn find_unpublished(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<EventRecord>, EventStoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM events
             WHERE published = FALSE AND occurred_at <= $1
             ORDER BY occurred_at ASC
             LIMIT $2"
        ))
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EventStoreError::Unavailable(e.to_string()))?;

        Self::map_rows(&rows)
    }

    async fn find_by_source(&self, source: &str) -> Result<Vec<EventRecord>, EventStoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM events WHERE source = $1 ORDER BY occurred_at ASC"
        ))
        .bind(source)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EventStoreError::Unavailable(e.to_string()))?;

        Self::map_rows(&rows)
    }

    async fn find_by_topic(&self, topic: Topic) -> Result<Vec<EventRecord>, EventStoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM events WHERE topic = $1 ORDER BY occurred_at ASC"
        ))
        .bind(topic.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EventStoreError::Unavailable(e.to_string()))?;

        Self::map_rows(&rows)
    }

    async fn find_all(&self) -> Result<Vec<EventRecord>, EventStoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM events ORDER BY occurred_at ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EventStoreError::Unavailable(e.to_string()))?;

        Self::map_rows(&rows)
    }
}
