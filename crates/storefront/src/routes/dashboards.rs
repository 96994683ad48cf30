//! Seller and admin dashboards.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use domain::Role;
use projections::{AdminDashboard, ProductSales, SellerDashboard};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::require_role;
use crate::state::AppState;

const DEFAULT_TOP_PRODUCTS: usize = 5;

#[derive(Deserialize)]
pub struct SellerQuery {
    pub top: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerDashboardResponse {
    #[serde(flatten)]
    pub dashboard: SellerDashboard,
    pub average_order_value: common::Money,
    pub top_products: Vec<ProductSales>,
}

/// GET /dashboard/seller
pub async fn seller(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SellerQuery>,
) -> Result<Json<SellerDashboardResponse>, ApiError> {
    let seller = require_role(&state, Role::Seller).await?;
    state.refresh_views().await?;

    let dashboard = state.seller_dashboard.dashboard(&seller.id).await;
    let top_products = state
        .seller_dashboard
        .top_products(&seller.id, query.top.unwrap_or(DEFAULT_TOP_PRODUCTS))
        .await;
    Ok(Json(SellerDashboardResponse {
        average_order_value: dashboard.average_order_value(),
        dashboard,
        top_products,
    }))
}

/// GET /dashboard/admin
pub async fn admin(State(state): State<Arc<AppState>>) -> Result<Json<AdminDashboard>, ApiError> {
    require_role(&state, Role::Admin).await?;
    state.refresh_views().await?;
    Ok(Json(state.admin_dashboard.snapshot().await))
}
