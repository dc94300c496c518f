//! Read-only routes over the event log, for audit and visualization.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};

use mercado_core::error::DomainError;
use mercado_core::event::EventRecord;
use mercado_core::topic::Topic;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /
async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<EventRecord>>, ApiError> {
    let events = state.event_store.find_all().await?;
    Ok(Json(events))
}

/// GET /source/{source}
async fn list_by_source(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Result<Json<Vec<EventRecord>>, ApiError> {
    let events = state.event_store.find_by_source(&source).await?;
    Ok(Json(events))
}

/// GET /topic/{topic}
async fn list_by_topic(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> Result<Json<Vec<EventRecord>>, ApiError> {
    // Only registered topics are queryable.
    let topic: Topic = topic
        .parse()
        .map_err(|e: mercado_core::topic::UnknownTopic| DomainError::Validation(e.to_string()))?;
    let events = state.event_store.find_by_topic(topic).await?;
    Ok(Json(events))
}

/// Returns the router for the event log.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all))
        .route("/source/{source}", get(list_by_source))
        .route("/topic/{topic}", get(list_by_topic))
}
