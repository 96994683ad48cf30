//! CSV download endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use domain::Role;
use projections::export;

use crate::error::ApiError;
use crate::routes::require_role;
use crate::state::AppState;

fn csv_response(filename: &'static str, body: String) -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
}

/// GET /export/products.csv
pub async fn products(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    csv_response("products.csv", export::products_csv(state.catalog.all()))
}

/// GET /export/transactions.csv. Admin only.
pub async fn transactions(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state, Role::Admin).await?;
    let transactions = state.ledger.all().await;
    Ok(csv_response(
        "transactions.csv",
        export::transactions_csv(&transactions),
    ))
}

/// GET /export/users.csv. Admin only.
pub async fn users(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    require_role(&state, Role::Admin).await?;
    let users = state.auth.all_users().await;
    Ok(csv_response("users.csv", export::users_csv(&users)))
}
