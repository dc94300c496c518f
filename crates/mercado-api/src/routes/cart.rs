//! Routes for the Cart context.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get, routing::post};
use serde::Deserialize;
use uuid::Uuid;

use mercado_cart::application::services;
use mercado_cart::domain::models::{AddCartItem, Cart};
use mercado_core::error::DomainError;

use crate::error::ApiError;
use crate::state::AppState;

/// Body for POST /remove.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoveCartItem {
    user_id: Uuid,
    product_id: Uuid,
    user_email: String,
}

/// POST /add
async fn add(
    State(state): State<AppState>,
    Json(input): Json<AddCartItem>,
) -> Result<Json<Cart>, ApiError> {
    let cart = services::add_to_cart(
        input,
        state.carts.as_ref(),
        state.products.as_ref(),
        &state.publisher,
    )
    .await?;
    Ok(Json(cart))
}

/// POST /remove
async fn remove(
    State(state): State<AppState>,
    Json(input): Json<RemoveCartItem>,
) -> Result<Json<Cart>, ApiError> {
    let cart = services::remove_from_cart(
        input.user_id,
        input.product_id,
        &input.user_email,
        state.carts.as_ref(),
        state.products.as_ref(),
        &state.publisher,
    )
    .await?;
    Ok(Json(cart))
}

/// GET /{user_id}
async fn get_cart(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Cart>, ApiError> {
    let cart = services::get_user_cart(user_id, state.carts.as_ref())
        .await?
        .ok_or_else(|| DomainError::NotFound("cart".into()))?;
    Ok(Json(cart))
}

/// DELETE /{user_id}
async fn clear(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let cleared = services::empty_cart(user_id, state.carts.as_ref()).await?;
    Ok(Json(serde_json::json!({"cleared": cleared})))
}

/// Returns the router for the cart context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add))
        .route("/remove", post(remove))
        .route("/{user_id}", get(get_cart).delete(clear))
}
