//! Domain error types.

use storage::StorageError;
use thiserror::Error;

use crate::auth::AuthError;
use crate::cart::CartError;
use crate::transaction::TransactionError;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Login or registration was rejected.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A cart operation was rejected.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// A transaction status change was rejected.
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// Reading or writing the storage mirror failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
