//! API service routes

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use common::{error::StorageError, models::InsertUser};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{LoginRequest, RegisterRequest, UserResponse},
    state::AppState,
    validation::{validate_password, validate_username},
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/users/:id", get(get_user))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service",
        "storage": state.storage.backend_name(),
    }))
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    info!("Registration attempt for user: {}", payload.username);

    validate_username(&payload.username).map_err(ApiError::BadRequest)?;
    validate_password(&payload.password).map_err(ApiError::BadRequest)?;

    // The in-memory backend does not enforce unique usernames, so the check lives here.
    if state
        .storage
        .get_user_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Username already exists".to_string()));
    }

    let user = state
        .storage
        .create_user(InsertUser::new(payload.username, payload.password))
        .await
        .map_err(|e| match e {
            // Lost a race against a concurrent registration of the same name
            StorageError::UniqueViolation { .. } => {
                ApiError::BadRequest("Username already exists".to_string())
            }
            e => ApiError::Storage(e),
        })?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    info!("Login attempt for user: {}", payload.username);

    let user = state
        .storage
        .get_user_by_username(&payload.username)
        .await?
        .filter(|user| user.password == payload.password)
        .ok_or_else(|| {
            warn!("Invalid credentials for user: {}", payload.username);
            ApiError::Unauthorized
        })?;

    Ok(Json(UserResponse::from(user)))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;
    let user = state
        .storage
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}
