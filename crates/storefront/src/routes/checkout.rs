//! Checkout endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use checkout::PaymentOutcome;
use domain::{PaymentMethod, ShippingAddress, Transaction};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub transaction: Transaction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /checkout
///
/// 201 with the completed transaction, or 402 with the failed one and the
/// decline message. Either way the transaction is recorded.
#[tracing::instrument(skip(state, req), fields(payment_method = %req.payment_method))]
pub async fn process(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let outcome = state
        .checkout
        .process_payment(req.shipping_address, req.payment_method)
        .await?;
    state.refresh_views().await?;

    let (status, response) = match outcome {
        PaymentOutcome::Completed(transaction) => (
            StatusCode::CREATED,
            CheckoutResponse {
                success: true,
                transaction,
                error: None,
            },
        ),
        PaymentOutcome::Failed { transaction, error } => (
            StatusCode::PAYMENT_REQUIRED,
            CheckoutResponse {
                success: false,
                transaction,
                error: Some(error),
            },
        ),
    };
    Ok((status, Json(response)))
}
