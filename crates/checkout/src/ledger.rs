//! Session-scoped list of checkout attempts.

use std::sync::Arc;

use common::{RecordId, UserId};
use domain::Transaction;
use tokio::sync::RwLock;

/// Append-only list of every transaction recorded this session.
///
/// Not mirrored to storage. Clones share the same list.
#[derive(Clone, Default)]
pub struct TransactionLedger {
    records: Arc<RwLock<Vec<Transaction>>>,
}

impl TransactionLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transaction and returns its position in the ledger.
    #[tracing::instrument(skip(self, transaction), fields(transaction_id = %transaction.id, status = %transaction.status))]
    pub async fn append(&self, transaction: Transaction) -> usize {
        let mut records = self.records.write().await;
        records.push(transaction);
        records.len() - 1
    }

    /// Returns every transaction in append order.
    pub async fn all(&self) -> Vec<Transaction> {
        self.records.read().await.clone()
    }

    /// Returns the transactions from `position` onward.
    pub async fn since(&self, position: usize) -> Vec<Transaction> {
        let records = self.records.read().await;
        records.get(position..).map(<[_]>::to_vec).unwrap_or_default()
    }

    /// Returns a buyer's transactions, newest first.
    pub async fn for_user(&self, user_id: &UserId) -> Vec<Transaction> {
        self.records
            .read()
            .await
            .iter()
            .rev()
            .filter(|tx| &tx.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Returns transactions containing at least one of a seller's lines, newest first.
    pub async fn for_seller(&self, seller_id: &UserId) -> Vec<Transaction> {
        self.records
            .read()
            .await
            .iter()
            .rev()
            .filter(|tx| tx.items.iter().any(|item| &item.seller_id == seller_id))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: RecordId) -> Option<Transaction> {
        self.records
            .read()
            .await
            .iter()
            .find(|tx| tx.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
