//! Messaging endpoints. All require a session.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::UserId;
use domain::{ConversationSummary, Message};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::session_user;
use crate::state::AppState;

const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub receiver_id: UserId,
    pub content: String,
}

#[derive(Serialize)]
pub struct UpdatedResponse {
    pub updated: usize,
}

/// POST /messages
#[tracing::instrument(skip(state, req), fields(receiver_id = %req.receiver_id))]
pub async fn send(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let sender = session_user(&state).await?;

    let content = req.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".to_string()));
    }
    if content.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Message is longer than {MAX_MESSAGE_CHARS} characters"
        )));
    }
    if req.receiver_id == sender.id {
        return Err(ApiError::BadRequest("Cannot message yourself".to_string()));
    }
    if state.auth.find_user(&req.receiver_id).await.is_none() {
        return Err(ApiError::NotFound(format!(
            "User not found: {}",
            req.receiver_id
        )));
    }

    let message = state
        .messages
        .send(&sender, &req.receiver_id, content)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /messages. One summary per conversation partner.
pub async fn conversations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ConversationSummary>>, ApiError> {
    let user = session_user(&state).await?;
    Ok(Json(state.messages.conversations(&user.id).await?))
}

/// GET /messages/inbox
pub async fn inbox(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Message>>, ApiError> {
    let user = session_user(&state).await?;
    Ok(Json(state.messages.inbox(&user.id).await?))
}

/// GET /messages/{partner_id}
pub async fn conversation(
    State(state): State<Arc<AppState>>,
    Path(partner_id): Path<UserId>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let user = session_user(&state).await?;
    Ok(Json(
        state.messages.conversation(&user.id, &partner_id).await?,
    ))
}

/// POST /messages/{partner_id}/read
#[tracing::instrument(skip(state))]
pub async fn mark_conversation_read(
    State(state): State<Arc<AppState>>,
    Path(partner_id): Path<UserId>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    let user = session_user(&state).await?;
    let updated = state
        .messages
        .mark_conversation_read(&user.id, &partner_id)
        .await?;
    Ok(Json(UpdatedResponse { updated }))
}
