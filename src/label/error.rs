//! Errors surfaced by the purchase orchestrator.

use thiserror::Error;

use crate::services::ServiceError;

/// Why a label purchase did not produce labels.
///
/// The `Display` text is what the user sees in the error notice.
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// The purchase endpoint failed or rejected the request.
    #[error(transparent)]
    Save(#[from] ServiceError),

    #[error("Failed to encode purchase request: {0}")]
    Encode(#[from] serde_json::Error),

    /// The purchase task panicked or its runtime shut down.
    #[error("Label purchase task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
