//! Domain layer for the marketplace storefront.
//!
//! This crate provides the client-side state stores:
//! - Auth store with mock credential lists and registration
//! - Cart store with quantity clamping and subtotal computation
//! - Product catalog for browsing
//! - Transaction record with its pending/completed/failed state machine
//! - Notification and message stores mirrored to storage

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod message;
mod mirror;
pub mod notification;
pub mod transaction;

pub use auth::{
    AuthError, AuthStore, DEFAULT_ADMIN_ID, MockAccount, Registration, Role, User, UserDirectory,
};
pub use cart::{CartError, CartItem, CartStore};
pub use catalog::{Catalog, Product};
pub use error::DomainError;
pub use message::{ConversationSummary, Message, MessageStore};
pub use notification::{NewNotification, Notification, NotificationStore, NotificationType};
pub use transaction::{
    PaymentMethod, ShippingAddress, Transaction, TransactionError, TransactionStatus,
};
