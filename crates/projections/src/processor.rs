//! Feeds ledger records to projections.

use checkout::TransactionLedger;
use domain::Transaction;

use crate::Result;
use crate::projection::Projection;

/// Delivers transactions from the ledger to registered projections.
///
/// - Catch-up: replays the ledger to each projection from its position
/// - Live delivery: hands one new transaction to every projection
/// - Rebuild: resets every projection and replays from the start
pub struct ProjectionProcessor {
    ledger: TransactionLedger,
    projections: Vec<Box<dyn Projection>>,
}

impl ProjectionProcessor {
    /// Creates a processor with no projections, reading from `ledger`.
    pub fn new(ledger: TransactionLedger) -> Self {
        Self {
            ledger,
            projections: Vec::new(),
        }
    }

    pub fn register(&mut self, projection: Box<dyn Projection>) {
        self.projections.push(projection);
    }

    pub fn projection_count(&self) -> usize {
        self.projections.len()
    }

    /// Replays ledger records each projection has not yet seen.
    ///
    /// Returns the ledger length the projections are now caught up to.
    #[tracing::instrument(skip(self))]
    pub async fn run_catch_up(&self) -> Result<u64> {
        let records = self.ledger.all().await;
        let mut delivered: u64 = 0;

        for projection in &self.projections {
            let seen = projection.position().await.transactions_processed;
            let pending = usize::try_from(seen)
                .ok()
                .and_then(|seen| records.get(seen..))
                .unwrap_or_default();

            for transaction in pending {
                projection.handle(transaction).await?;
                delivered += 1;
            }
        }

        metrics::counter!("projections_transactions_processed").increment(delivered);
        tracing::info!(
            ledger_len = records.len(),
            delivered,
            "catch-up complete"
        );

        Ok(records.len() as u64)
    }

    /// Delivers a single transaction to every registered projection.
    #[tracing::instrument(skip(self, transaction), fields(transaction_id = %transaction.id))]
    pub async fn process_transaction(&self, transaction: &Transaction) -> Result<()> {
        for projection in &self.projections {
            projection.handle(transaction).await?;
        }
        metrics::counter!("projections_transactions_processed")
            .increment(self.projections.len() as u64);
        Ok(())
    }

    /// Resets every projection and replays the whole ledger.
    #[tracing::instrument(skip(self))]
    pub async fn rebuild_all(&self) -> Result<u64> {
        for projection in &self.projections {
            tracing::debug!(projection = projection.name(), "resetting projection");
            projection.reset().await?;
        }
        self.run_catch_up().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ProjectionPosition;
    use async_trait::async_trait;
    use common::{RecordId, UserId};
    use domain::{PaymentMethod, ShippingAddress};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Records the id of every transaction it is handed.
    #[derive(Clone, Default)]
    struct RecordingProjection {
        seen: Arc<Mutex<Vec<RecordId>>>,
    }

    impl RecordingProjection {
        async fn seen(&self) -> Vec<RecordId> {
            self.seen.lock().await.clone()
        }

        async fn count(&self) -> u64 {
            self.seen.lock().await.len() as u64
        }
    }

    #[async_trait]
    impl Projection for RecordingProjection {
        fn name(&self) -> &'static str {
            "RecordingProjection"
        }

        async fn handle(&self, transaction: &Transaction) -> Result<()> {
            self.seen.lock().await.push(transaction.id);
            Ok(())
        }

        async fn position(&self) -> ProjectionPosition {
            ProjectionPosition {
                transactions_processed: self.count().await,
            }
        }

        async fn reset(&self) -> Result<()> {
            self.seen.lock().await.clear();
            Ok(())
        }
    }

    fn transaction() -> Transaction {
        Transaction::pending(
            UserId::new("buyer1"),
            vec![],
            ShippingAddress::default(),
            PaymentMethod::CreditCard,
        )
    }

    async fn ledger_with(n: usize) -> TransactionLedger {
        let ledger = TransactionLedger::new();
        for _ in 0..n {
            ledger.append(transaction()).await;
        }
        ledger
    }

    #[tokio::test]
    async fn test_catch_up_processes_all_transactions() {
        let projection = RecordingProjection::default();
        let mut processor = ProjectionProcessor::new(ledger_with(3).await);
        processor.register(Box::new(projection.clone()));

        assert_eq!(processor.run_catch_up().await.unwrap(), 3);
        assert_eq!(projection.count().await, 3);
    }

    #[tokio::test]
    async fn test_catch_up_skips_already_processed() {
        let ledger = ledger_with(3).await;
        let projection = RecordingProjection::default();
        let mut processor = ProjectionProcessor::new(ledger.clone());
        processor.register(Box::new(projection.clone()));

        processor.run_catch_up().await.unwrap();
        processor.run_catch_up().await.unwrap();
        assert_eq!(projection.count().await, 3);

        ledger.append(transaction()).await;
        processor.run_catch_up().await.unwrap();
        let expected: Vec<RecordId> = ledger.all().await.iter().map(|tx| tx.id).collect();
        assert_eq!(projection.seen().await, expected);
    }

    #[tokio::test]
    async fn test_late_registration_catches_up_from_zero() {
        let projection1 = RecordingProjection::default();
        let projection2 = RecordingProjection::default();
        let mut processor = ProjectionProcessor::new(ledger_with(2).await);

        processor.register(Box::new(projection1.clone()));
        processor.run_catch_up().await.unwrap();
        processor.register(Box::new(projection2.clone()));
        processor.run_catch_up().await.unwrap();

        assert_eq!(projection1.count().await, 2);
        assert_eq!(projection2.count().await, 2);
        assert_eq!(processor.projection_count(), 2);
    }

    #[tokio::test]
    async fn test_process_single_transaction() {
        let projection = RecordingProjection::default();
        let mut processor = ProjectionProcessor::new(TransactionLedger::new());
        processor.register(Box::new(projection.clone()));

        processor.process_transaction(&transaction()).await.unwrap();
        assert_eq!(projection.count().await, 1);
    }

    #[tokio::test]
    async fn test_rebuild_resets_and_replays() {
        let projection = RecordingProjection::default();
        let mut processor = ProjectionProcessor::new(ledger_with(2).await);
        processor.register(Box::new(projection.clone()));

        processor.run_catch_up().await.unwrap();
        processor.rebuild_all().await.unwrap();

        assert_eq!(projection.count().await, 2);
        assert_eq!(projection.position().await.transactions_processed, 2);
    }

    #[tokio::test]
    async fn test_empty_ledger_catch_up() {
        let projection = RecordingProjection::default();
        let mut processor = ProjectionProcessor::new(TransactionLedger::new());
        processor.register(Box::new(projection.clone()));

        assert_eq!(processor.run_catch_up().await.unwrap(), 0);
        assert_eq!(projection.count().await, 0);
    }
}
