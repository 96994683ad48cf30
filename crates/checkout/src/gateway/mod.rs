//! Payment gateway seam and its simulated implementations.

pub mod scripted;
pub mod simulated;

use std::sync::Arc;

use async_trait::async_trait;
use domain::Transaction;
use thiserror::Error;

pub use scripted::ScriptedPaymentGateway;
pub use simulated::{DEFAULT_SUCCESS_RATE, SimulatedPaymentGateway};

/// Result of an approved charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    /// Reference assigned by the gateway.
    pub reference: String,
}

/// A declined charge. The message is shown to the buyer as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct PaymentDeclined {
    pub reason: String,
}

impl PaymentDeclined {
    /// Creates a decline with a custom message.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for PaymentDeclined {
    fn default() -> Self {
        Self::new("Payment failed. Please try again.")
    }
}

/// Trait for charging a pending transaction.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charges the transaction's amount.
    async fn charge(&self, transaction: &Transaction) -> Result<PaymentReceipt, PaymentDeclined>;
}

#[async_trait]
impl<P: PaymentGateway + ?Sized> PaymentGateway for Arc<P> {
    async fn charge(&self, transaction: &Transaction) -> Result<PaymentReceipt, PaymentDeclined> {
        (**self).charge(transaction).await
    }
}
