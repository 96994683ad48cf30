//! Order history endpoints for the signed-in buyer.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::RecordId;
use domain::Transaction;
use projections::OrderSummary;

use crate::error::ApiError;
use crate::routes::session_user;
use crate::state::AppState;

/// GET /transactions. Newest first, failed attempts included.
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<OrderSummary>>, ApiError> {
    let user = session_user(&state).await?;
    state.refresh_views().await?;
    Ok(Json(state.order_history.orders_for(&user.id).await))
}

/// GET /transactions/{id}
///
/// Visible to the buyer, sellers with lines in it, and admins. Anyone else
/// gets 404.
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<Transaction>, ApiError> {
    let user = session_user(&state).await?;
    let not_found = || ApiError::NotFound(format!("Transaction not found: {id}"));

    let transaction = state.ledger.get(id).await.ok_or_else(not_found)?;
    let visible = user.is_admin()
        || transaction.user_id == user.id
        || transaction.items.iter().any(|item| item.seller_id == user.id);
    if !visible {
        return Err(not_found());
    }
    Ok(Json(transaction))
}
