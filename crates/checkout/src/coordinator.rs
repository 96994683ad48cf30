//! Payment workflow over the session's cart.

use std::time::Instant;

use common::UserId;
use domain::{
    AuthStore, CartStore, DEFAULT_ADMIN_ID, DomainError, NotificationStore, PaymentMethod,
    ShippingAddress, Transaction,
};
use storage::Storage;

use crate::error::CheckoutError;
use crate::fanout;
use crate::gateway::PaymentGateway;
use crate::ledger::TransactionLedger;

/// Tunables for the checkout workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Receives a notification for every completed order.
    pub admin_id: UserId,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            admin_id: UserId::new(DEFAULT_ADMIN_ID),
        }
    }
}

/// What happened to a checkout attempt. Both variants are recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Completed(Transaction),
    Failed {
        transaction: Transaction,
        error: String,
    },
}

impl PaymentOutcome {
    pub fn transaction(&self) -> &Transaction {
        match self {
            PaymentOutcome::Completed(transaction) => transaction,
            PaymentOutcome::Failed { transaction, .. } => transaction,
        }
    }

    pub fn into_transaction(self) -> Transaction {
        match self {
            PaymentOutcome::Completed(transaction) => transaction,
            PaymentOutcome::Failed { transaction, .. } => transaction,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PaymentOutcome::Completed(_))
    }

    /// The decline message, for failed payments.
    pub fn error(&self) -> Option<&str> {
        match self {
            PaymentOutcome::Completed(_) => None,
            PaymentOutcome::Failed { error, .. } => Some(error),
        }
    }
}

/// Turns the signed-in user's cart into a transaction.
///
/// Every call creates a new transaction; calling twice charges twice. The
/// ledger append, cart clear and notifications are separate writes with no
/// rollback between them.
#[derive(Clone)]
pub struct CheckoutCoordinator<S, P> {
    auth: AuthStore<S>,
    cart: CartStore,
    notifications: NotificationStore<S>,
    ledger: TransactionLedger,
    gateway: P,
    settings: CheckoutSettings,
}

impl<S, P> CheckoutCoordinator<S, P>
where
    S: Storage,
    P: PaymentGateway,
{
    /// Creates a coordinator with the default settings.
    pub fn new(
        auth: AuthStore<S>,
        cart: CartStore,
        notifications: NotificationStore<S>,
        ledger: TransactionLedger,
        gateway: P,
    ) -> Self {
        Self {
            auth,
            cart,
            notifications,
            ledger,
            gateway,
            settings: CheckoutSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: CheckoutSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    pub fn gateway(&self) -> &P {
        &self.gateway
    }

    pub fn settings(&self) -> &CheckoutSettings {
        &self.settings
    }

    /// Charges the current cart.
    ///
    /// An empty cart is charged as a zero-amount transaction. A declined
    /// payment is returned as [`PaymentOutcome::Failed`], not as an error.
    ///
    /// The cart is read before the gateway call and cleared after an approved
    /// charge, so lines added while the payment is pending are dropped
    /// without being charged.
    #[tracing::instrument(skip(self, shipping_address), fields(payment_method = %payment_method))]
    pub async fn process_payment(
        &self,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Result<PaymentOutcome, CheckoutError> {
        metrics::counter!("checkout_attempts_total").increment(1);
        let started = Instant::now();

        let buyer = self
            .auth
            .current_user()
            .await
            .ok_or(CheckoutError::NotAuthenticated)?;

        let items = self.cart.items().await;
        let mut transaction =
            Transaction::pending(buyer.id.clone(), items, shipping_address, payment_method);
        tracing::info!(
            transaction_id = %transaction.id,
            user_id = %buyer.id,
            amount = %transaction.amount,
            lines = transaction.items.len(),
            "payment processing started"
        );

        let outcome = match self.gateway.charge(&transaction).await {
            Ok(receipt) => {
                transaction.complete().map_err(DomainError::from)?;
                self.ledger.append(transaction.clone()).await;
                self.cart.clear().await;

                let sent = fanout::notify_order_placed(
                    &self.notifications,
                    &transaction,
                    &buyer,
                    &self.settings.admin_id,
                )
                .await?;

                tracing::info!(
                    transaction_id = %transaction.id,
                    reference = %receipt.reference,
                    notifications = sent,
                    "payment completed"
                );
                PaymentOutcome::Completed(transaction)
            }
            Err(declined) => {
                transaction
                    .fail(declined.reason.clone())
                    .map_err(DomainError::from)?;
                self.ledger.append(transaction.clone()).await;

                tracing::warn!(
                    transaction_id = %transaction.id,
                    reason = %declined,
                    "payment failed"
                );
                PaymentOutcome::Failed {
                    transaction,
                    error: declined.reason,
                }
            }
        };

        let transaction = outcome.transaction();
        metrics::counter!("checkout_payments_total", "status" => transaction.status.as_str())
            .increment(1);
        metrics::histogram!("checkout_amount_cents").record(transaction.amount.cents() as f64);
        metrics::histogram!("checkout_duration_seconds").record(started.elapsed().as_secs_f64());

        Ok(outcome)
    }
}
