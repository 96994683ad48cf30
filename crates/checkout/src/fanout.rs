//! Order notifications sent after a completed payment.

use common::UserId;
use domain::{DomainError, NewNotification, NotificationStore, Transaction, User};
use storage::Storage;

/// Notifies the buyer, each seller in the order and the admin.
///
/// Sellers are notified in order of first appearance in the items. Writes are
/// independent; an error stops the fan-out and earlier notifications stay.
/// Returns how many notifications were written.
#[tracing::instrument(skip_all, fields(transaction_id = %transaction.id))]
pub async fn notify_order_placed<S: Storage>(
    notifications: &NotificationStore<S>,
    transaction: &Transaction,
    buyer: &User,
    admin_id: &UserId,
) -> Result<usize, DomainError> {
    let reference = transaction.reference();
    let mut sent = 0;

    notifications
        .add(
            &buyer.id,
            NewNotification::order(
                "Order Placed",
                format!(
                    "Your order #{reference} for {} has been placed successfully.",
                    transaction.amount
                ),
            )
            .with_link("/orders"),
        )
        .await?;
    sent += 1;

    for seller_id in transaction.seller_ids() {
        let units: u64 = transaction
            .items_for_seller(&seller_id)
            .map(|item| u64::from(item.quantity))
            .sum();
        notifications
            .add(
                &seller_id,
                NewNotification::order(
                    "New Order Received",
                    format!(
                        "{} ordered {units} item(s) from you for {} (order #{reference}).",
                        buyer.name,
                        transaction.seller_total(&seller_id)
                    ),
                )
                .with_link("/seller/orders"),
            )
            .await?;
        sent += 1;
    }

    notifications
        .add(
            admin_id,
            NewNotification::order(
                "New Transaction",
                format!(
                    "Order #{reference} by {} for {} was completed.",
                    buyer.name, transaction.amount
                ),
            )
            .with_link("/admin/transactions"),
        )
        .await?;
    sent += 1;

    tracing::debug!(sent, "order notifications sent");
    Ok(sent)
}
