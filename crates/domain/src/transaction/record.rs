use chrono::{DateTime, Utc};
use common::{Money, RecordId, UserId};
use serde::{Deserialize, Serialize};

use super::{TransactionError, TransactionStatus};
use crate::cart::CartItem;

/// Where an order ships to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl std::fmt::Display for ShippingAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}, {} {}, {}",
            self.full_name, self.street, self.city, self.state, self.postal_code, self.country
        )
    }
}

/// How the buyer chose to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    #[serde(rename = "paypal")]
    PayPal,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "creditCard",
            PaymentMethod::DebitCard => "debitCard",
            PaymentMethod::PayPal => "paypal",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded checkout attempt.
///
/// `amount` equals the sum of the item line totals at creation time and is
/// not re-validated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: RecordId,
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub status: TransactionStatus,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    /// Decline message for failed payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl Transaction {
    /// Snapshots the cart lines into a new pending transaction.
    pub fn pending(
        user_id: UserId,
        items: Vec<CartItem>,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Self {
        let amount = items.iter().map(CartItem::line_total).sum();
        Self {
            id: RecordId::new(),
            user_id,
            items,
            amount,
            date: Utc::now(),
            status: TransactionStatus::Pending,
            shipping_address,
            payment_method,
            failure_reason: None,
        }
    }

    /// Marks the payment as completed.
    pub fn complete(&mut self) -> Result<(), TransactionError> {
        if !self.status.can_complete() {
            return Err(TransactionError::InvalidStateTransition {
                current: self.status,
                action: "complete",
            });
        }
        self.status = TransactionStatus::Completed;
        Ok(())
    }

    /// Marks the payment as failed with the decline message.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), TransactionError> {
        if !self.status.can_fail() {
            return Err(TransactionError::InvalidStateTransition {
                current: self.status,
                action: "fail",
            });
        }
        self.status = TransactionStatus::Failed;
        self.failure_reason = Some(reason.into());
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    /// Returns the distinct sellers in the order, in order of first appearance.
    pub fn seller_ids(&self) -> Vec<UserId> {
        let mut sellers: Vec<UserId> = Vec::new();
        for item in &self.items {
            if !sellers.contains(&item.seller_id) {
                sellers.push(item.seller_id.clone());
            }
        }
        sellers
    }

    /// Returns the lines sold by one seller.
    pub fn items_for_seller<'a>(
        &'a self,
        seller_id: &'a UserId,
    ) -> impl Iterator<Item = &'a CartItem> + 'a {
        self.items
            .iter()
            .filter(move |item| &item.seller_id == seller_id)
    }

    /// Returns the part of the amount owed to one seller.
    pub fn seller_total(&self, seller_id: &UserId) -> Money {
        self.items_for_seller(seller_id)
            .map(CartItem::line_total)
            .sum()
    }

    /// Returns the total number of units ordered.
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| item.quantity as u64).sum()
    }

    /// Short human-facing order reference.
    pub fn reference(&self) -> String {
        self.id.short()
    }
}
