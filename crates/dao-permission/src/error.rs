//! Error types for the permission service.

use std::time::Duration;

use dao_permission_contract::ContractError;
use dao_permission_core::{DecodeError, PermissionEvent, TxHash};
use thiserror::Error;

/// Errors that can occur during permission service operations.
///
/// Domain error codes reported by the contract are not errors; they are
/// carried in [`TxOutcome`](dao_permission_core::TxOutcome) and records.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// Transport or submission failure on a query, submit or head lookup.
    #[error("contract call failed: {0}")]
    Contract(#[from] ContractError),

    /// The transaction was submitted but will never be confirmed.
    #[error("{event} confirmation for {tx_hash} failed: {source}")]
    Confirmation {
        event: PermissionEvent,
        tx_hash: TxHash,
        source: ContractError,
    },

    /// The confirmation event did not arrive within the configured timeout.
    #[error("{event} confirmation for {tx_hash} timed out after {timeout:?}")]
    ConfirmationTimeout {
        event: PermissionEvent,
        tx_hash: TxHash,
        timeout: Duration,
    },

    /// A returned value could not be converted to its target type.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Invalid service configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for permission service operations.
pub type Result<T> = std::result::Result<T, PermissionError>;
