//! Cart endpoints. The cart is session memory and needs no login.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::Money;
use domain::CartItem;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

/// Quantities below 1 are accepted and clamped.
#[derive(Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub subtotal: Money,
    pub item_count: u64,
}

/// GET /cart
pub async fn get(State(state): State<Arc<AppState>>) -> Json<CartResponse> {
    Json(snapshot(&state).await)
}

/// POST /cart/items
#[tracing::instrument(skip(state, req), fields(product_id = %req.product_id))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartItem>), ApiError> {
    let product = state
        .catalog
        .get(&req.product_id)
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", req.product_id)))?;
    if !product.in_stock() {
        return Err(ApiError::BadRequest(format!("{} is out of stock", product.name)));
    }

    let line = state
        .cart
        .add_item(CartItem::from_product(product, req.quantity))
        .await;
    Ok((StatusCode::CREATED, Json(line)))
}

/// PUT /cart/items/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<Json<CartItem>, ApiError> {
    let line = state
        .cart
        .update_quantity(&id, req.quantity)
        .await
        .map_err(domain::DomainError::from)?;
    Ok(Json(line))
}

/// DELETE /cart/items/{id}
#[tracing::instrument(skip(state))]
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    match state.cart.remove_item(&id).await {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::NotFound(format!("Item not found in cart: {id}"))),
    }
}

/// DELETE /cart
pub async fn clear(State(state): State<Arc<AppState>>) -> StatusCode {
    state.cart.clear().await;
    StatusCode::NO_CONTENT
}

async fn snapshot(state: &AppState) -> CartResponse {
    let items = state.cart.items().await;
    let subtotal = items.iter().map(CartItem::line_total).sum();
    let item_count = items.iter().map(|item| u64::from(item.quantity)).sum();
    CartResponse {
        items,
        subtotal,
        item_count,
    }
}
