//! Core projection trait and position tracking.

use async_trait::async_trait;
use domain::Transaction;

use crate::Result;

/// How many ledger records a projection has folded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProjectionPosition {
    pub transactions_processed: u64,
}

impl ProjectionPosition {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn advance(&self) -> Self {
        Self {
            transactions_processed: self.transactions_processed + 1,
        }
    }
}

impl std::fmt::Display for ProjectionPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "position({})", self.transactions_processed)
    }
}

/// Folds recorded transactions into a read model.
///
/// Transactions are delivered in ledger order. A projection advances its
/// position once per transaction handled, including ones it ignores.
#[async_trait]
pub trait Projection: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, transaction: &Transaction) -> Result<()>;

    async fn position(&self) -> ProjectionPosition;

    /// Clears the read model and rewinds the position to zero.
    async fn reset(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_advances_from_zero() {
        let pos = ProjectionPosition::zero();
        assert_eq!(pos.transactions_processed, 0);
        assert_eq!(pos.advance().advance().transactions_processed, 2);
    }

    #[test]
    fn position_display() {
        let pos = ProjectionPosition {
            transactions_processed: 42,
        };
        assert_eq!(pos.to_string(), "position(42)");
    }
}
