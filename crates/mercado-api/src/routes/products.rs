//! Routes for the Catalog context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use uuid::Uuid;

use mercado_catalog::application::services;
use mercado_catalog::domain::models::{CreateProduct, Product};
use mercado_core::error::DomainError;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /
async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = services::create_product(input, state.products.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = services::list_products(state.products.as_ref()).await?;
    Ok(Json(products))
}

/// GET /{id}
async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    let product = services::get_product(id, state.products.as_ref())
        .await?
        .ok_or_else(|| DomainError::NotFound("product".into()))?;
    Ok(Json(product))
}

/// Returns the router for the catalog context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/{id}", get(get_one))
}
