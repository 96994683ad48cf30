//! Checkout transaction record and its status machine.

mod record;
mod state;

pub use record::{PaymentMethod, ShippingAddress, Transaction};
pub use state::TransactionStatus;

use thiserror::Error;

/// Errors that can occur when changing a transaction's status.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    /// The transaction is not in a status that allows the change.
    #[error("Invalid status transition: cannot {action} a {current} transaction")]
    InvalidStateTransition {
        current: TransactionStatus,
        action: &'static str,
    },
}
