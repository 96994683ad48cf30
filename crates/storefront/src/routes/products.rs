//! Catalog browsing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::UserId;
use domain::Product;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Filters for GET /products. All are optional and combine with AND.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub seller: Option<String>,
}

/// GET /products
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductQuery>,
) -> Json<Vec<Product>> {
    let seller = query.seller.map(UserId::from);
    let products = state
        .catalog
        .search(query.q.as_deref().unwrap_or_default())
        .into_iter()
        .filter(|p| {
            query
                .category
                .as_deref()
                .is_none_or(|c| p.category.eq_ignore_ascii_case(c))
        })
        .filter(|p| seller.as_ref().is_none_or(|s| &p.seller_id == s))
        .cloned()
        .collect();
    Json(products)
}

/// GET /products/categories
pub async fn categories(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(
        state
            .catalog
            .categories()
            .into_iter()
            .map(str::to_string)
            .collect(),
    )
}

/// GET /products/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    state
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {id}")))
}
