//! Order history read model, one list per buyer.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Money, RecordId, UserId};
use domain::{PaymentMethod, Transaction, TransactionStatus};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::ProjectionError;
use crate::projection::{Projection, ProjectionPosition};
use crate::Result;

/// One row of a buyer's order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: RecordId,
    pub reference: String,
    pub user_id: UserId,
    pub date: DateTime<Utc>,
    pub status: TransactionStatus,
    pub amount: Money,
    pub unit_count: u64,
    pub payment_method: PaymentMethod,
    /// Seller display names, in order of first appearance.
    pub sellers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl OrderSummary {
    fn from_transaction(tx: &Transaction) -> Self {
        let mut sellers: Vec<String> = Vec::new();
        for item in &tx.items {
            if !sellers.contains(&item.seller_name) {
                sellers.push(item.seller_name.clone());
            }
        }

        Self {
            id: tx.id,
            reference: tx.reference(),
            user_id: tx.user_id.clone(),
            date: tx.date,
            status: tx.status,
            amount: tx.amount,
            unit_count: tx.unit_count(),
            payment_method: tx.payment_method,
            sellers,
            failure_reason: tx.failure_reason.clone(),
        }
    }
}

#[derive(Default)]
struct OrderHistoryState {
    by_buyer: HashMap<UserId, Vec<OrderSummary>>,
    seen: HashSet<RecordId>,
    position: ProjectionPosition,
}

/// Every checkout attempt grouped by buyer, completed and failed alike.
#[derive(Clone, Default)]
pub struct OrderHistoryView {
    state: Arc<RwLock<OrderHistoryState>>,
}

impl OrderHistoryView {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a buyer's orders, newest first.
    pub async fn orders_for(&self, user_id: &UserId) -> Vec<OrderSummary> {
        let state = self.state.read().await;
        let mut orders = state.by_buyer.get(user_id).cloned().unwrap_or_default();
        orders.reverse();
        orders.sort_by(|a, b| b.date.cmp(&a.date));
        orders
    }

    pub async fn get(&self, id: RecordId) -> Option<OrderSummary> {
        self.state
            .read()
            .await
            .by_buyer
            .values()
            .flatten()
            .find(|order| order.id == id)
            .cloned()
    }

    /// Returns how many orders a buyer has placed successfully.
    pub async fn completed_count(&self, user_id: &UserId) -> usize {
        self.state
            .read()
            .await
            .by_buyer
            .get(user_id)
            .map(|orders| {
                orders
                    .iter()
                    .filter(|o| o.status == TransactionStatus::Completed)
                    .count()
            })
            .unwrap_or(0)
    }
}

#[async_trait]
impl Projection for OrderHistoryView {
    fn name(&self) -> &'static str {
        "OrderHistoryView"
    }

    async fn handle(&self, transaction: &Transaction) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.seen.insert(transaction.id) {
            return Err(ProjectionError::DuplicateTransaction {
                projection: "OrderHistoryView",
                id: transaction.id,
            });
        }

        state
            .by_buyer
            .entry(transaction.user_id.clone())
            .or_default()
            .push(OrderSummary::from_transaction(transaction));
        state.position = state.position.advance();
        Ok(())
    }

    async fn position(&self) -> ProjectionPosition {
        self.state.read().await.position
    }

    async fn reset(&self) -> Result<()> {
        *self.state.write().await = OrderHistoryState::default();
        Ok(())
    }
}
