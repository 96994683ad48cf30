//! Admin dashboard read model: platform-wide totals.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use common::{Money, UserId};
use domain::{Transaction, TransactionStatus};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::Result;
use crate::projection::{Projection, ProjectionPosition};

/// Number of transactions in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: u64,
    pub completed: u64,
    pub failed: u64,
    pub refunded: u64,
}

impl StatusCounts {
    fn record(&mut self, status: TransactionStatus) {
        match status {
            TransactionStatus::Pending => self.pending += 1,
            TransactionStatus::Completed => self.completed += 1,
            TransactionStatus::Failed => self.failed += 1,
            TransactionStatus::Refunded => self.refunded += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.pending + self.completed + self.failed + self.refunded
    }
}

/// Snapshot of the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub total_transactions: u64,
    pub by_status: StatusCounts,
    pub completed_revenue: Money,
    /// Buyers with at least one checkout attempt.
    pub distinct_buyers: usize,
    /// Sellers with at least one completed sale.
    pub distinct_sellers: usize,
    /// Share of attempts that completed, 0.0 when there are none.
    pub success_rate: f64,
}

#[derive(Default)]
struct AdminDashboardState {
    by_status: StatusCounts,
    completed_revenue: Money,
    buyers: HashSet<UserId>,
    sellers: HashSet<UserId>,
    position: ProjectionPosition,
}

#[derive(Clone, Default)]
pub struct AdminDashboardView {
    state: Arc<RwLock<AdminDashboardState>>,
}

impl AdminDashboardView {
    /// Creates an empty dashboard.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> AdminDashboard {
        let state = self.state.read().await;
        let total = state.by_status.total();
        let success_rate = if total == 0 {
            0.0
        } else {
            state.by_status.completed as f64 / total as f64
        };

        AdminDashboard {
            total_transactions: total,
            by_status: state.by_status,
            completed_revenue: state.completed_revenue,
            distinct_buyers: state.buyers.len(),
            distinct_sellers: state.sellers.len(),
            success_rate,
        }
    }
}

#[async_trait]
impl Projection for AdminDashboardView {
    fn name(&self) -> &'static str {
        "AdminDashboardView"
    }

    async fn handle(&self, transaction: &Transaction) -> Result<()> {
        let mut state = self.state.write().await;

        state.by_status.record(transaction.status);
        state.buyers.insert(transaction.user_id.clone());
        if transaction.is_completed() {
            state.completed_revenue += transaction.amount;
            state.sellers.extend(transaction.seller_ids());
        }

        state.position = state.position.advance();
        Ok(())
    }

    async fn position(&self) -> ProjectionPosition {
        self.state.read().await.position
    }

    async fn reset(&self) -> Result<()> {
        *self.state.write().await = AdminDashboardState::default();
        Ok(())
    }
}
