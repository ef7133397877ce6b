//! Error types for contract backends.

use dao_permission_core::{BlockNumber, PermissionEvent, TxHash};
use thiserror::Error;

/// Errors reported by a [`ContractBackend`](crate::ContractBackend).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// The node could not be reached or the RPC round-trip failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The node refused the transaction at submission.
    #[error("submission rejected: {0}")]
    Submission(String),

    /// A write was queried or a read was submitted.
    #[error("invalid call to {method}: {reason}")]
    InvalidCall {
        method: &'static str,
        reason: &'static str,
    },

    /// A read was pinned to a block the node does not have.
    #[error("unknown block #{0}")]
    UnknownBlock(BlockNumber),

    /// The transaction was mined but reverted.
    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: TxHash },

    /// The transaction left the mempool without being mined.
    #[error("transaction {tx_hash} was dropped")]
    Dropped { tx_hash: TxHash },

    /// The node has never seen this transaction.
    #[error("unknown transaction {0}")]
    UnknownTransaction(TxHash),

    /// The transaction was mined but emitted a different event.
    #[error("transaction {tx_hash} emitted {got}, expected {expected}")]
    EventMismatch {
        tx_hash: TxHash,
        expected: PermissionEvent,
        got: PermissionEvent,
    },

    /// The event subscription itself failed.
    #[error("event subscription failed: {0}")]
    Subscription(String),
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, ContractError>;
