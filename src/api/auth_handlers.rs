use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{self, AuthService};
use crate::models::User;
use crate::storage::{Storage, StorageError};

use super::handlers::ErrorResponse;

pub struct AuthState {
    pub storage: Arc<dyn Storage>,
    pub auth_service: Arc<AuthService>,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: String,
    pub username: String,
    pub email: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

fn internal(e: anyhow::Error) -> ApiError {
    tracing::error!("auth operation failed: {}", e);
    error(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}

/// Register a new user and issue a token
pub async fn register(
    State(state): State<Arc<AuthState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    if payload.username.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "username, email and password are required",
        ));
    }

    if state
        .storage
        .user_by_email(&payload.email)
        .await
        .map_err(internal)?
        .is_some()
    {
        return Err(error(
            StatusCode::CONFLICT,
            "user with this email already exists",
        ));
    }

    if state
        .storage
        .user_by_username(&payload.username)
        .await
        .map_err(internal)?
        .is_some()
    {
        return Err(error(StatusCode::CONFLICT, "username already taken"));
    }

    let password_hash = auth::hash_password(&payload.password).map_err(internal)?;

    let user = User {
        id: auth::generate_id(),
        username: payload.username,
        email: payload.email,
        password_hash,
        created_at: Utc::now().timestamp(),
    };

    match state.storage.create_user(&user).await {
        Ok(()) => {}
        // Lost a race with a concurrent registration for the same name
        Err(StorageError::Conflict) => {
            return Err(error(StatusCode::CONFLICT, "username already taken"));
        }
        Err(StorageError::Other(e)) => return Err(internal(e)),
    }

    let token = state.auth_service.issue_token(&user).map_err(internal)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user_id: user.id,
            username: user.username,
            email: user.email,
        }),
    ))
}

/// Verify credentials and issue a token
pub async fn login(
    State(state): State<Arc<AuthState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state
        .storage
        .user_by_email(&payload.email)
        .await
        .map_err(internal)?;

    let Some(user) = user else {
        return Err(error(StatusCode::UNAUTHORIZED, "invalid email or password"));
    };

    if !auth::verify_password(&payload.password, &user.password_hash) {
        return Err(error(StatusCode::UNAUTHORIZED, "invalid email or password"));
    }

    let token = state.auth_service.issue_token(&user).map_err(internal)?;

    Ok(Json(AuthResponse {
        token,
        user_id: user.id,
        username: user.username,
        email: user.email,
    }))
}
