//! Checkout error types.

use domain::DomainError;
use thiserror::Error;

/// Errors that stop a checkout before an outcome is produced.
///
/// A declined payment is not an error; it is reported through
/// [`PaymentOutcome::Failed`](crate::PaymentOutcome::Failed).
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is no signed-in user to charge.
    #[error("You must be logged in to check out")]
    NotAuthenticated,

    /// A store operation failed part way through.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
