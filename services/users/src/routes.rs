//! Users service routes

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{NewUser, UserResponse},
    state::AppState,
    validation::validate_new_user,
};

/// Create the router for the users service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/1.0/users", post(create_user))
        .route("/api/1.0/users/:id", get(get_user))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "users-service"
    }))
}

/// Register a new user
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!("Rejected registration body: {}", rejection);
        ApiError::Rejected(rejection.status(), rejection.body_text())
    })?;

    let mut new_user = validate_new_user(&payload).map_err(|errors| {
        info!("Registration failed validation: {:?}", errors.keys());
        ApiError::Validation(errors)
    })?;

    new_user.password = state
        .password_storage
        .encode(&new_user.password)
        .map_err(|e| {
            error!("Failed to encode password: {}", e);
            ApiError::InternalServerError
        })?;

    let user = state.user_store.create(&new_user).await.map_err(|e| {
        error!("Failed to create user: {}", e);
        ApiError::from(e)
    })?;

    info!("Registered user {} with id {}", user.user_name, user.id);
    Ok(Json(user.into()))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<UserResponse>> {
    let Path(id) =
        id.map_err(|rejection| ApiError::Rejected(rejection.status(), rejection.body_text()))?;

    let user = state
        .user_store
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get user: {}", e);
            ApiError::from(e)
        })?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user.into()))
}
