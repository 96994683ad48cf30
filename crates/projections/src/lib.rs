//! Read models over the transaction ledger.
//!
//! - [`Projection`] trait for folding transactions into a read model
//! - [`ProjectionProcessor`] for feeding ledger records to projections
//! - Three views: order history, seller dashboard, admin dashboard
//! - [`export`] for CSV downloads of transactions, products and users

pub mod error;
pub mod export;
pub mod processor;
pub mod projection;
pub mod views;

pub use error::{ProjectionError, Result};
pub use processor::ProjectionProcessor;
pub use projection::{Projection, ProjectionPosition};
pub use views::{
    AdminDashboard, AdminDashboardView, OrderHistoryView, OrderSummary, ProductSales,
    SellerDashboard, SellerDashboardView, StatusCounts,
};
