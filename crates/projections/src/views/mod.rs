//! Read model views.

pub mod admin_dashboard;
pub mod order_history;
pub mod seller_dashboard;

pub use admin_dashboard::{AdminDashboard, AdminDashboardView, StatusCounts};
pub use order_history::{OrderHistoryView, OrderSummary};
pub use seller_dashboard::{ProductSales, SellerDashboard, SellerDashboardView};
