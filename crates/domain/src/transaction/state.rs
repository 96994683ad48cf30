//! Transaction status machine.

use serde::{Deserialize, Serialize};

/// The status of a checkout attempt.
///
/// Status transitions:
/// ```text
/// Pending ──┬──► Completed
///           └──► Failed
/// ```
/// `Refunded` is a display label only; nothing transitions into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Payment is being processed.
    #[default]
    Pending,

    /// Payment succeeded (terminal).
    Completed,

    /// Payment was declined (terminal).
    Failed,

    /// Shown for historical records; never set by code.
    Refunded,
}

impl TransactionStatus {
    /// Returns true if the payment can be marked completed in this status.
    pub fn can_complete(&self) -> bool {
        matches!(self, TransactionStatus::Pending)
    }

    /// Returns true if the payment can be marked failed in this status.
    pub fn can_fail(&self) -> bool {
        matches!(self, TransactionStatus::Pending)
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }

    /// Returns the status name as stored in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Refunded => "refunded",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
