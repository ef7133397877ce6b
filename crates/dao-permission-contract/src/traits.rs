//! ContractBackend trait: the abstract interface to a deployed permission contract.
//!
//! This trait keeps the service independent of how calls reach the chain.
//! Implementations include RPC bindings and the in-memory chain (for tests).

use std::sync::Arc;

use async_trait::async_trait;
use dao_permission_core::{BlockNumber, BlockRef, PermissionEvent, TxHash, Value};

use crate::call::{ConfirmedEvent, ContractCall};
use crate::error::Result;
use crate::params::TxParams;

/// Async interface to one deployed permission contract.
///
/// Implementations must be thread-safe (Send + Sync); independent calls may
/// be in flight at the same time.
#[async_trait]
pub trait ContractBackend: Send + Sync {
    /// Current head block height.
    async fn block_number(&self) -> Result<BlockNumber>;

    /// Execute a read-only call at `at` and return its raw return tuple.
    ///
    /// Must reject state-mutating calls with `InvalidCall`.
    async fn query(&self, call: &ContractCall, params: &TxParams, at: BlockRef)
        -> Result<Vec<Value>>;

    /// Submit a state-mutating call and return its transaction hash.
    ///
    /// Returns once the node has accepted the transaction, not when it is
    /// mined. Must reject read-only calls with `InvalidCall`.
    async fn submit(&self, call: &ContractCall, params: &TxParams) -> Result<TxHash>;

    /// Wait until `tx_hash` is mined and return the `event` it emitted.
    ///
    /// Resolves with exactly one outcome: the event, or the reason it will
    /// never arrive (reverted, dropped, subscription failure). Imposes no
    /// timeout of its own.
    async fn await_event(&self, event: PermissionEvent, tx_hash: TxHash)
        -> Result<ConfirmedEvent>;
}

#[async_trait]
impl<B: ContractBackend + ?Sized> ContractBackend for Arc<B> {
    async fn block_number(&self) -> Result<BlockNumber> {
        (**self).block_number().await
    }

    async fn query(
        &self,
        call: &ContractCall,
        params: &TxParams,
        at: BlockRef,
    ) -> Result<Vec<Value>> {
        (**self).query(call, params, at).await
    }

    async fn submit(&self, call: &ContractCall, params: &TxParams) -> Result<TxHash> {
        (**self).submit(call, params).await
    }

    async fn await_event(
        &self,
        event: PermissionEvent,
        tx_hash: TxHash,
    ) -> Result<ConfirmedEvent> {
        (**self).await_event(event, tx_hash).await
    }
}
