//! Shopping cart.

mod item;
mod store;

pub use item::CartItem;
pub use store::CartStore;

use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// No cart line has this id.
    #[error("Item not found in cart: {id}")]
    ItemNotFound { id: String },
}
