//! Notification endpoints for the signed-in user.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::RecordId;
use domain::Notification;
use serde::Serialize;

use crate::error::ApiError;
use crate::routes::messages::UpdatedResponse;
use crate::routes::session_user;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

/// GET /notifications. Newest first.
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let user = session_user(&state).await?;
    let notifications = state.notifications.recent(&user.id).await?;
    let unread_count = notifications.iter().filter(|n| !n.read).count();
    Ok(Json(NotificationsResponse {
        notifications,
        unread_count,
    }))
}

/// POST /notifications/{id}/read
#[tracing::instrument(skip(state))]
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    let user = session_user(&state).await?;
    if state.notifications.mark_as_read(&user.id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Notification not found: {id}")))
    }
}

/// POST /notifications/read-all
#[tracing::instrument(skip(state))]
pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    let user = session_user(&state).await?;
    let updated = state.notifications.mark_all_as_read(&user.id).await?;
    Ok(Json(UpdatedResponse { updated }))
}
