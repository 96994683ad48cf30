//! Login, registration and session endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use domain::{Registration, Role, User};
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::session_user;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// POST /auth/login
#[tracing::instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state.auth.login(&req.email, &req.password).await?;
    Ok(Json(user))
}

/// POST /auth/register
#[tracing::instrument(skip(state, req), fields(email = %req.email, role = %req.role))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Name, email and password are required".to_string(),
        ));
    }

    let user = state
        .auth
        .register(Registration::new(req.name, req.email, req.password, req.role))
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /auth/logout
#[tracing::instrument(skip(state))]
pub async fn logout(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    state.auth.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me
pub async fn me(State(state): State<Arc<AppState>>) -> Result<Json<User>, ApiError> {
    Ok(Json(session_user(&state).await?))
}
