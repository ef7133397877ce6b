//! The permission service: typed calls over a [`ContractBackend`].

use futures::stream::{self, StreamExt, TryStreamExt};

use dao_permission_contract::{
    ConfirmedEvent, ContractBackend, ContractCall, ContractError, TxParams,
};
use dao_permission_core::{
    narrow_u64, Address, BlockRef, OwnerPage, OwnerRecord, OwnerTimestamp, PermissionEvent,
    RootInfo, TupleDecoder, TxHash, TxOutcome, Value, U256,
};

use crate::config::ServiceConfig;
use crate::error::{PermissionError, Result};
use crate::query::OwnersQuery;

/// Client for one deployed permission contract.
///
/// Every method takes optional [`TxParams`]; unset fields are filled from
/// the [`ServiceConfig`] before the call reaches the backend. The service
/// holds no state of its own, so independent calls may run concurrently.
#[derive(Clone)]
pub struct PermissionService<B: ContractBackend> {
    backend: B,
    config: ServiceConfig,
    defaults: TxParams,
}

impl<B: ContractBackend> PermissionService<B> {
    /// Create a service over `backend`. Fails if `config` is invalid.
    pub fn new(backend: B, config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        let defaults = config.tx_defaults();
        Ok(Self {
            backend,
            config,
            defaults,
        })
    }

    /// Get the backend reference.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Get the service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Root
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the root and wait for the `SetRoot` confirmation.
    pub async fn set_root(&self, new_root: Address, params: Option<TxParams>) -> Result<TxOutcome> {
        self.transact(ContractCall::SetRoot { new_root }, params)
            .await
    }

    /// The current root address.
    pub async fn root(&self, params: Option<TxParams>) -> Result<Address> {
        let call = ContractCall::Root;
        let values = self.query(&call, params, BlockRef::Latest).await?;
        Ok(TupleDecoder::new(call.method(), &values, 1)?.address()?)
    }

    /// The current root together with the time it was set.
    pub async fn root_data(&self, params: Option<TxParams>) -> Result<RootInfo> {
        let values = self
            .query(&ContractCall::RootData, params, BlockRef::Latest)
            .await?;
        Ok(RootInfo::decode(&values)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Owners
    // ─────────────────────────────────────────────────────────────────────────

    /// Add an owner and wait for the `AddOwner` confirmation.
    ///
    /// Adding an existing owner or the root is not an error: the outcome
    /// carries the contract's error code.
    pub async fn add_owner(&self, owner: Address, params: Option<TxParams>) -> Result<TxOutcome> {
        self.transact(ContractCall::AddOwner { owner }, params)
            .await
    }

    /// Remove an owner and wait for the `RemoveOwner` confirmation.
    pub async fn remove_owner(
        &self,
        owner: Address,
        params: Option<TxParams>,
    ) -> Result<TxOutcome> {
        self.transact(ContractCall::RemoveOwner { owner }, params)
            .await
    }

    /// Whether `address` is the root or an owner.
    pub async fn has_permission(&self, address: Address, params: Option<TxParams>) -> Result<bool> {
        let call = ContractCall::HasPermission { address };
        let values = self.query(&call, params, BlockRef::Latest).await?;
        Ok(TupleDecoder::new(call.method(), &values, 1)?.bool()?)
    }

    /// Size of the owner array, vacant slots included.
    pub async fn num_owners(&self, params: Option<TxParams>) -> Result<U256> {
        let params = self.resolve(params);
        self.num_owners_at(&params, BlockRef::Latest).await
    }

    /// When `owner` was added, or a nonzero error code if it is not an owner.
    pub async fn owner_timestamp(
        &self,
        owner: Address,
        params: Option<TxParams>,
    ) -> Result<OwnerTimestamp> {
        let values = self
            .query(&ContractCall::OwnerTimestamp { owner }, params, BlockRef::Latest)
            .await?;
        Ok(OwnerTimestamp::decode(&values)?)
    }

    /// The owner slot at `index`.
    pub async fn owner_from_index(
        &self,
        index: u64,
        params: Option<TxParams>,
    ) -> Result<OwnerRecord> {
        let params = self.resolve(params);
        self.owner_from_index_at(index, &params, BlockRef::Latest)
            .await
    }

    /// List a slice of the owner array.
    ///
    /// The head block is read once and every subsequent query is pinned to
    /// it, so the page is a consistent snapshot even while writes land.
    /// Slots with a nonzero error code are skipped. Any failing slot aborts
    /// the whole listing.
    pub async fn owners(&self, query: OwnersQuery, params: Option<TxParams>) -> Result<OwnerPage> {
        let params = self.resolve(params);

        let at_block = self.backend.block_number().await?;
        let at = BlockRef::Number(at_block);

        let total_size = narrow_u64(self.num_owners_at(&params, at).await?)?;
        let (start_index, end_index) = query.bounds(total_size);

        tracing::debug!(
            start = start_index,
            end = end_index,
            total = total_size,
            block = at_block,
            "listing owners"
        );

        // `buffered` yields in index order regardless of completion order.
        let records: Vec<OwnerRecord> = stream::iter(start_index..end_index)
            .map(|index| self.owner_from_index_at(index, &params, at))
            .buffered(self.config.fetch_concurrency)
            .try_collect()
            .await?;

        let owners = records
            .into_iter()
            .filter_map(OwnerRecord::into_entry)
            .collect();

        Ok(OwnerPage {
            start_index,
            end_index,
            total_size,
            at_block,
            owners,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve(&self, params: Option<TxParams>) -> TxParams {
        params.unwrap_or_default().or_defaults(&self.defaults)
    }

    async fn query(
        &self,
        call: &ContractCall,
        params: Option<TxParams>,
        at: BlockRef,
    ) -> Result<Vec<Value>> {
        let params = self.resolve(params);
        self.query_resolved(call, &params, at).await
    }

    async fn query_resolved(
        &self,
        call: &ContractCall,
        params: &TxParams,
        at: BlockRef,
    ) -> Result<Vec<Value>> {
        tracing::debug!(method = call.method(), block = %at, "query");
        Ok(self.backend.query(call, params, at).await?)
    }

    async fn num_owners_at(&self, params: &TxParams, at: BlockRef) -> Result<U256> {
        let call = ContractCall::NumOwners;
        let values = self.query_resolved(&call, params, at).await?;
        Ok(TupleDecoder::new(call.method(), &values, 1)?.uint()?)
    }

    async fn owner_from_index_at(
        &self,
        index: u64,
        params: &TxParams,
        at: BlockRef,
    ) -> Result<OwnerRecord> {
        let call = ContractCall::OwnerFromIndex {
            index: U256::from(index),
        };
        let values = self.query_resolved(&call, params, at).await?;
        Ok(OwnerRecord::decode(&values)?)
    }

    async fn transact(&self, call: ContractCall, params: Option<TxParams>) -> Result<TxOutcome> {
        // The event to wait for is fixed by the call, never chosen by the caller.
        let event = call
            .confirmation_event()
            .ok_or(ContractError::InvalidCall {
                method: call.method(),
                reason: "read-only calls cannot be submitted",
            })?;

        let params = self.resolve(params);
        let tx_hash = self.backend.submit(&call, &params).await?;
        tracing::debug!(method = call.method(), tx = %tx_hash, "submitted, awaiting {}", event);

        let confirmed = self.confirmation(event, tx_hash).await?;
        let outcome = confirmed.decode()?;

        if outcome.is_success() {
            tracing::info!(
                event = %event,
                tx = %tx_hash,
                block = outcome.block_number,
                subject = %outcome.subject,
                "confirmed"
            );
        } else {
            tracing::warn!(
                event = %event,
                tx = %tx_hash,
                subject = %outcome.subject,
                code = %outcome.error_code,
                "confirmed with error code"
            );
        }

        Ok(outcome)
    }

    async fn confirmation(&self, event: PermissionEvent, tx_hash: TxHash) -> Result<ConfirmedEvent> {
        let wait = self.backend.await_event(event, tx_hash);

        let result = match self.config.confirmation_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, wait).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(event = %event, tx = %tx_hash, ?timeout, "confirmation timed out");
                    return Err(PermissionError::ConfirmationTimeout {
                        event,
                        tx_hash,
                        timeout,
                    });
                }
            },
            None => wait.await,
        };

        result.map_err(|source| {
            tracing::warn!(event = %event, tx = %tx_hash, error = %source, "confirmation failed");
            PermissionError::Confirmation {
                event,
                tx_hash,
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use dao_permission_contract::MemoryChain;
    use dao_permission_core::ErrorCode;

    use super::*;

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    fn service(chain: Arc<MemoryChain>, root: Address) -> PermissionService<Arc<MemoryChain>> {
        PermissionService::new(chain, ServiceConfig::default().with_default_sender(root)).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let chain = MemoryChain::deploy(addr(0x01));
        let result = PermissionService::new(chain, ServiceConfig::default().with_gas(0));
        assert!(matches!(result, Err(PermissionError::Config(_))));
    }

    #[tokio::test]
    async fn test_root_accessors() {
        let chain = Arc::new(MemoryChain::deploy(addr(0x01)));
        let service = service(chain, addr(0x01));

        assert_eq!(service.root(None).await.unwrap(), addr(0x01));
        let data = service.root_data(None).await.unwrap();
        assert_eq!(data.address, addr(0x01));
        assert!(service.has_permission(addr(0x01), None).await.unwrap());
        assert!(!service.has_permission(addr(0x02), None).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_owner_flow() {
        let chain = Arc::new(MemoryChain::deploy(addr(0x01)));
        let service = service(chain, addr(0x01));

        let outcome = service.add_owner(addr(0x02), None).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.event, PermissionEvent::AddOwner);
        assert_eq!(outcome.subject, addr(0x02));

        assert!(service.has_permission(addr(0x02), None).await.unwrap());
        assert_eq!(service.num_owners(None).await.unwrap(), U256::from(1u64));

        let stamp = service.owner_timestamp(addr(0x02), None).await.unwrap();
        assert!(stamp.exists());
        assert_eq!(stamp.added_at, outcome.confirmed_at);

        let record = service.owner_from_index(0, None).await.unwrap();
        assert_eq!(record.address, addr(0x02));
        assert!(record.is_valid());
    }

    #[tokio::test]
    async fn test_domain_code_is_not_an_error() {
        let chain = Arc::new(MemoryChain::deploy(addr(0x01)));
        let service = service(chain, addr(0x01));

        service.add_owner(addr(0x02), None).await.unwrap();
        let again = service.add_owner(addr(0x02), None).await.unwrap();
        assert_eq!(again.error_code, ErrorCode::RESOURCE_ALREADY_EXISTS);

        let missing = service.remove_owner(addr(0x03), None).await.unwrap();
        assert!(!missing.is_success());
    }

    #[tokio::test]
    async fn test_params_override_defaults() {
        let chain = Arc::new(MemoryChain::deploy(addr(0x01)));
        let service = service(chain, addr(0x01));

        // A non-root sender is refused by the contract.
        let outcome = service
            .add_owner(addr(0x02), Some(TxParams::from_sender(addr(0x05))))
            .await
            .unwrap();
        assert_eq!(outcome.error_code, ErrorCode::ACCESS_DENIED);
    }

    #[tokio::test]
    async fn test_confirmation_timeout() {
        let chain = Arc::new(MemoryChain::deploy(addr(0x01)));
        chain.set_auto_mine(false);
        let config = ServiceConfig::default()
            .with_default_sender(addr(0x01))
            .with_confirmation_timeout(Duration::from_millis(50));
        let service = PermissionService::new(chain.clone(), config).unwrap();

        let err = service.set_root(addr(0x09), None).await.unwrap_err();
        assert!(matches!(
            err,
            PermissionError::ConfirmationTimeout {
                event: PermissionEvent::SetRoot,
                ..
            }
        ));
        assert_eq!(chain.pending_count(), 1);
    }

    #[tokio::test]
    async fn test_writes_wait_for_their_own_event() {
        let chain = Arc::new(MemoryChain::deploy(addr(0x01)));
        let service = service(chain, addr(0x01));

        let added = service.add_owner(addr(0x02), None).await.unwrap();
        assert_eq!(added.event, PermissionEvent::AddOwner);
        let removed = service.remove_owner(addr(0x02), None).await.unwrap();
        assert_eq!(removed.event, PermissionEvent::RemoveOwner);
        let rooted = service.set_root(addr(0x03), None).await.unwrap();
        assert_eq!(rooted.event, PermissionEvent::SetRoot);
    }

    #[tokio::test]
    async fn test_read_call_is_never_submitted() {
        let chain = Arc::new(MemoryChain::deploy(addr(0x01)));
        let service = service(chain.clone(), addr(0x01));
        let head = chain.block_number().await.unwrap();

        let err = service.transact(ContractCall::Root, None).await.unwrap_err();
        assert!(matches!(
            err,
            PermissionError::Contract(ContractError::InvalidCall { method: "root", .. })
        ));
        assert_eq!(chain.pending_count(), 0);
        assert_eq!(chain.block_number().await.unwrap(), head);
    }

    #[tokio::test]
    async fn test_reverted_transaction() {
        let chain = Arc::new(MemoryChain::deploy(addr(0x01)));
        let service = service(chain.clone(), addr(0x01));

        chain.revert_next();
        let err = service.add_owner(addr(0x02), None).await.unwrap_err();
        assert!(matches!(
            err,
            PermissionError::Confirmation {
                source: ContractError::Reverted { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_owners_listing() {
        let chain = Arc::new(MemoryChain::deploy(addr(0x01)));
        let service = service(chain, addr(0x01));

        for b in 0x02..0x06 {
            service.add_owner(addr(b), None).await.unwrap();
        }
        service.remove_owner(addr(0x03), None).await.unwrap();

        let page = service.owners(OwnersQuery::all(), None).await.unwrap();
        assert_eq!(page.total_size, 4);
        assert_eq!(page.end_index, 4);
        let listed: Vec<Address> = page.owners.iter().map(|o| o.address).collect();
        assert_eq!(listed, vec![addr(0x02), addr(0x04), addr(0x05)]);

        let slice = service.owners(OwnersQuery::range(1, 2), None).await.unwrap();
        assert_eq!((slice.start_index, slice.end_index), (1, 3));
        assert_eq!(slice.owners.len(), 1);
    }
}
