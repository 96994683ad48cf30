//! Projection error types.

use common::RecordId;
use thiserror::Error;

/// Errors that can occur while folding transactions into read models.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// A projection was handed a transaction it has already folded.
    #[error("{projection} already handled transaction {id}")]
    DuplicateTransaction {
        projection: &'static str,
        id: RecordId,
    },

    /// A projection-specific error.
    #[error("Projection error: {0}")]
    Projection(String),
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
