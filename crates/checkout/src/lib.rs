//! Checkout workflow for the marketplace storefront.
//!
//! `process_payment` turns the session's cart into a transaction:
//! 1. Snapshot the cart into a pending transaction
//! 2. Charge it through a [`PaymentGateway`]
//! 3. On success: complete it, record it, clear the cart, notify the buyer,
//!    each seller in the order and the admin
//! 4. On failure: record it as failed and leave the cart alone
//!
//! There is no retry, idempotency key or compensating action.

pub mod coordinator;
pub mod error;
pub mod fanout;
pub mod gateway;
pub mod ledger;

pub use coordinator::{CheckoutCoordinator, CheckoutSettings, PaymentOutcome};
pub use error::CheckoutError;
pub use gateway::{
    DEFAULT_SUCCESS_RATE, PaymentDeclined, PaymentGateway, PaymentReceipt, ScriptedPaymentGateway,
    SimulatedPaymentGateway,
};
pub use ledger::TransactionLedger;
