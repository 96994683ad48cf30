//! JSON HTTP storefront for the marketplace.
//!
//! Serves one browser session over the domain stores, with structured
//! logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::ApiError;
pub use state::{AppState, SharedGateway, SharedStorage, create_state};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        // auth
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/me", get(routes::auth::me))
        // catalog
        .route("/products", get(routes::products::list))
        .route("/products/categories", get(routes::products::categories))
        .route("/products/{id}", get(routes::products::get))
        // cart
        .route(
            "/cart",
            get(routes::cart::get).delete(routes::cart::clear),
        )
        .route("/cart/items", post(routes::cart::add_item))
        .route(
            "/cart/items/{id}",
            put(routes::cart::update_item).delete(routes::cart::remove_item),
        )
        // checkout and orders
        .route("/checkout", post(routes::checkout::process))
        .route("/transactions", get(routes::transactions::list))
        .route("/transactions/{id}", get(routes::transactions::get))
        // messaging
        .route(
            "/messages",
            get(routes::messages::conversations).post(routes::messages::send),
        )
        .route("/messages/inbox", get(routes::messages::inbox))
        .route("/messages/{partner_id}", get(routes::messages::conversation))
        .route(
            "/messages/{partner_id}/read",
            post(routes::messages::mark_conversation_read),
        )
        // notifications
        .route("/notifications", get(routes::notifications::list))
        .route(
            "/notifications/read-all",
            post(routes::notifications::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            post(routes::notifications::mark_read),
        )
        // dashboards and exports
        .route("/dashboard/seller", get(routes::dashboards::seller))
        .route("/dashboard/admin", get(routes::dashboards::admin))
        .route("/export/products.csv", get(routes::export::products))
        .route("/export/transactions.csv", get(routes::export::transactions))
        .route("/export/users.csv", get(routes::export::users))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
