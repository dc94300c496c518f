//! Routes for the Orders context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use uuid::Uuid;

use mercado_core::error::DomainError;
use mercado_orders::application::services;
use mercado_orders::domain::models::{CreateOrder, Order};

use crate::error::ApiError;
use crate::state::AppState;

/// POST /
async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateOrder>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = services::create_order(
        input,
        state.orders.as_ref(),
        state.carts.as_ref(),
        state.products.as_ref(),
        &state.publisher,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /{id}
async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    let order = services::get_order(id, state.orders.as_ref())
        .await?
        .ok_or_else(|| DomainError::NotFound("order".into()))?;
    Ok(Json(order))
}

/// GET /user/{user_id}
async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = services::get_user_orders(user_id, state.orders.as_ref()).await?;
    Ok(Json(orders))
}

/// Returns the router for the orders context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/{id}", get(get_one))
        .route("/user/{user_id}", get(list_for_user))
}
