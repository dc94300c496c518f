//! Routes for the Users context.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};

use mercado_users::application::services;
use mercado_users::domain::models::{LoginUser, RegisterUser, User};

use crate::error::ApiError;
use crate::state::AppState;

/// POST /register
async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = services::register_user(
        input,
        state.users.as_ref(),
        state.hasher.as_ref(),
        &state.publisher,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginUser>,
) -> Result<Json<User>, ApiError> {
    let user = services::login_user(input, state.users.as_ref(), state.hasher.as_ref()).await?;
    Ok(Json(user))
}

/// Returns the router for the users context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}
