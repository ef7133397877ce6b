//! In-memory implementation of the ContractBackend trait.
//!
//! Runs the permission contract's semantics against an in-process chain.
//! Every block keeps a full snapshot of contract state so reads pinned to an
//! older block see that block's state. Primarily for testing; it also has
//! fault injection hooks for transport failures, reverts and dropped
//! transactions.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;

use dao_permission_core::{
    Address, BlockNumber, BlockRef, ErrorCode, PermissionEvent, TxHash, Value, U256,
};

use crate::call::{ConfirmedEvent, ContractCall};
use crate::error::{ContractError, Result};
use crate::params::TxParams;
use crate::traits::ContractBackend;

/// Configuration for an in-memory chain.
#[derive(Debug, Clone)]
pub struct MemoryChainConfig {
    /// Chain id, mixed into transaction hashes.
    pub chain_id: u64,
    /// Timestamp of block 0 (Unix seconds).
    pub genesis_timestamp: u64,
    /// Seconds between consecutive blocks.
    pub block_time: u64,
    /// Mine every submitted transaction into its own block right away.
    pub auto_mine: bool,
}

impl Default for MemoryChainConfig {
    fn default() -> Self {
        Self {
            chain_id: 1337,
            genesis_timestamp: 1_700_000_000,
            block_time: 12,
            auto_mine: true,
        }
    }
}

/// In-memory chain with one deployed permission contract.
///
/// Thread-safe via Mutex. New blocks and mempool changes are announced on a
/// watch channel so confirmation waiters wake up.
pub struct MemoryChain {
    config: MemoryChainConfig,
    inner: Mutex<ChainInner>,
    head: watch::Sender<BlockNumber>,
}

struct ChainInner {
    /// Blocks by height. Block 0 is genesis.
    blocks: Vec<Block>,

    /// Submitted but not yet mined.
    mempool: Vec<PendingTx>,

    /// Receipts of mined transactions.
    receipts: HashMap<TxHash, TxReceipt>,

    /// Transactions evicted from the mempool.
    dropped: HashSet<TxHash>,

    /// Account used when a call carries no sender.
    deployer: Address,

    nonce: u64,
    auto_mine: bool,
    faults: Faults,
}

struct Block {
    timestamp: u64,
    state: ContractState,
}

#[derive(Debug, Clone, Default)]
struct ContractState {
    root: Address,
    root_added: u64,
    /// Backing owner array. Removed owners leave a vacant slot.
    owners: Vec<Option<OwnerSlot>>,
    /// Owner address -> slot index.
    index: HashMap<Address, usize>,
}

#[derive(Debug, Clone, Copy)]
struct OwnerSlot {
    address: Address,
    added_at: u64,
}

struct PendingTx {
    hash: TxHash,
    call: ContractCall,
    sender: Address,
    revert: bool,
}

enum TxReceipt {
    Success {
        block_number: BlockNumber,
        event: PermissionEvent,
        values: Vec<Value>,
    },
    Reverted,
}

#[derive(Debug, Default)]
struct Faults {
    unreachable: bool,
    revert_next: bool,
    failing_index: Option<U256>,
}

impl MemoryChain {
    /// Deploy the permission contract with `root` as deployer and root.
    pub fn deploy(root: Address) -> Self {
        Self::with_config(root, MemoryChainConfig::default())
    }

    /// Deploy with an explicit chain configuration.
    pub fn with_config(root: Address, config: MemoryChainConfig) -> Self {
        let genesis = Block {
            timestamp: config.genesis_timestamp,
            state: ContractState {
                root,
                root_added: config.genesis_timestamp,
                ..ContractState::default()
            },
        };
        let (head, _) = watch::channel(0);

        Self {
            inner: Mutex::new(ChainInner {
                blocks: vec![genesis],
                mempool: Vec::new(),
                receipts: HashMap::new(),
                dropped: HashSet::new(),
                deployer: root,
                nonce: 0,
                auto_mine: config.auto_mine,
                faults: Faults::default(),
            }),
            config,
            head,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChainInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Chain Control
    // ─────────────────────────────────────────────────────────────────────────

    /// Current head height.
    pub fn head(&self) -> BlockNumber {
        self.lock().head()
    }

    /// Timestamp of a block, if it exists.
    pub fn block_timestamp(&self, number: BlockNumber) -> Option<u64> {
        self.lock()
            .blocks
            .get(number as usize)
            .map(|block| block.timestamp)
    }

    /// Mine every pending transaction into a new block. Mines an empty block
    /// if the mempool is empty.
    pub fn mine(&self) -> BlockNumber {
        let number = {
            let mut inner = self.lock();
            let pending = std::mem::take(&mut inner.mempool);
            inner.mine_block(&self.config, pending)
        };
        self.head.send_replace(number);
        number
    }

    /// Enable or disable mining on submission.
    pub fn set_auto_mine(&self, enabled: bool) {
        self.lock().auto_mine = enabled;
    }

    /// Number of transactions waiting in the mempool.
    pub fn pending_count(&self) -> usize {
        self.lock().mempool.len()
    }

    /// Evict every pending transaction. Returns how many were dropped.
    pub fn drop_pending(&self) -> usize {
        let count = {
            let mut inner = self.lock();
            let pending = std::mem::take(&mut inner.mempool);
            let count = pending.len();
            inner.dropped.extend(pending.into_iter().map(|tx| tx.hash));
            count
        };
        tracing::debug!(count, "dropped pending transactions");
        let head = self.head();
        self.head.send_replace(head);
        count
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fault Injection
    // ─────────────────────────────────────────────────────────────────────────

    /// Make every backend call fail with a transport error.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().faults.unreachable = unreachable;
    }

    /// Make the next submitted transaction revert when mined.
    pub fn revert_next(&self) {
        self.lock().faults.revert_next = true;
    }

    /// Make `ownerFromIndex(index)` fail with a transport error.
    pub fn fail_owner_index(&self, index: u64) {
        self.lock().faults.failing_index = Some(U256::from(index));
    }

    pub fn clear_faults(&self) {
        self.lock().faults = Faults::default();
    }

    /// Look up the receipt for `tx_hash`. `Ok(None)` while it is pending.
    fn lookup(&self, event: PermissionEvent, tx_hash: TxHash) -> Result<Option<ConfirmedEvent>> {
        let inner = self.lock();

        if inner.dropped.contains(&tx_hash) {
            return Err(ContractError::Dropped { tx_hash });
        }

        match inner.receipts.get(&tx_hash) {
            Some(TxReceipt::Reverted) => Err(ContractError::Reverted { tx_hash }),
            Some(TxReceipt::Success {
                block_number,
                event: emitted,
                values,
            }) => {
                if *emitted != event {
                    return Err(ContractError::EventMismatch {
                        tx_hash,
                        expected: event,
                        got: *emitted,
                    });
                }
                let timestamp = inner.blocks[*block_number as usize].timestamp;
                Ok(Some(ConfirmedEvent {
                    event,
                    tx_hash,
                    block_number: *block_number,
                    block_timestamp: U256::from(timestamp),
                    values: values.clone(),
                }))
            }
            None if inner.mempool.iter().any(|tx| tx.hash == tx_hash) => Ok(None),
            None => Err(ContractError::UnknownTransaction(tx_hash)),
        }
    }
}

impl ChainInner {
    fn head(&self) -> BlockNumber {
        (self.blocks.len() - 1) as BlockNumber
    }

    fn check_reachable(&self) -> Result<()> {
        if self.faults.unreachable {
            return Err(ContractError::Transport("connection refused".into()));
        }
        Ok(())
    }

    fn block_at(&self, at: BlockRef) -> Result<&Block> {
        match at.number() {
            None => Ok(&self.blocks[self.blocks.len() - 1]),
            Some(n) => self
                .blocks
                .get(n as usize)
                .ok_or(ContractError::UnknownBlock(n)),
        }
    }

    fn next_tx_hash(&mut self, chain_id: u64, call: &ContractCall, sender: &Address) -> TxHash {
        self.nonce += 1;

        let mut hasher = blake3::Hasher::new();
        hasher.update(b"dao-permission-tx-v0:");
        hasher.update(&chain_id.to_le_bytes());
        hasher.update(&self.nonce.to_le_bytes());
        hasher.update(call.method().as_bytes());
        hasher.update(sender.as_slice());
        TxHash::from(*hasher.finalize().as_bytes())
    }

    /// Apply `pending` on top of the head state and append the new block.
    fn mine_block(&mut self, config: &MemoryChainConfig, pending: Vec<PendingTx>) -> BlockNumber {
        let number = self.head() + 1;
        let timestamp = config.genesis_timestamp + number * config.block_time;
        let mut state = self.blocks[self.blocks.len() - 1].state.clone();
        let tx_count = pending.len();

        for tx in pending {
            let applied = if tx.revert {
                None
            } else {
                state.apply(&tx.call, tx.sender, timestamp)
            };
            let receipt = match applied {
                Some((event, values)) => TxReceipt::Success {
                    block_number: number,
                    event,
                    values,
                },
                None => TxReceipt::Reverted,
            };
            self.receipts.insert(tx.hash, receipt);
        }

        self.blocks.push(Block { timestamp, state });
        tracing::debug!(block = number, timestamp, tx_count, "mined block");
        number
    }
}

impl ContractState {
    fn is_owner(&self, address: &Address) -> bool {
        self.index.contains_key(address)
    }

    /// Execute a state-mutating call. Returns the event and its arguments
    /// `(address, errorCode)`, or `None` for read-only calls.
    fn apply(
        &mut self,
        call: &ContractCall,
        sender: Address,
        now: u64,
    ) -> Option<(PermissionEvent, Vec<Value>)> {
        let (event, subject, code) = match call {
            ContractCall::SetRoot { new_root } => {
                let code = if sender != self.root {
                    ErrorCode::ACCESS_DENIED
                } else if new_root.is_zero() {
                    ErrorCode::NULL_PARAM_NOT_ALLOWED
                } else {
                    self.root = *new_root;
                    self.root_added = now;
                    ErrorCode::NO_ERROR
                };
                (PermissionEvent::SetRoot, *new_root, code)
            }
            ContractCall::AddOwner { owner } => {
                let code = if sender != self.root {
                    ErrorCode::ACCESS_DENIED
                } else if owner.is_zero() {
                    ErrorCode::NULL_PARAM_NOT_ALLOWED
                } else if *owner == self.root || self.is_owner(owner) {
                    ErrorCode::RESOURCE_ALREADY_EXISTS
                } else {
                    self.index.insert(*owner, self.owners.len());
                    self.owners.push(Some(OwnerSlot {
                        address: *owner,
                        added_at: now,
                    }));
                    ErrorCode::NO_ERROR
                };
                (PermissionEvent::AddOwner, *owner, code)
            }
            ContractCall::RemoveOwner { owner } => {
                let code = if sender != self.root {
                    ErrorCode::ACCESS_DENIED
                } else {
                    match self.index.remove(owner) {
                        Some(slot) => {
                            self.owners[slot] = None;
                            ErrorCode::NO_ERROR
                        }
                        None => ErrorCode::RESOURCE_NOT_FOUND,
                    }
                };
                (PermissionEvent::RemoveOwner, *owner, code)
            }
            _ => return None,
        };

        Some((event, vec![subject.into(), code.into()]))
    }

    /// Execute a read-only call and return its raw tuple, or `None` for
    /// state-mutating calls.
    fn read(&self, call: &ContractCall) -> Option<Vec<Value>> {
        let values = match call {
            ContractCall::Root => vec![self.root.into()],
            ContractCall::RootData => vec![self.root.into(), U256::from(self.root_added).into()],
            ContractCall::OwnerTimestamp { owner } => match self.slot_of(owner) {
                Some(slot) => vec![U256::from(slot.added_at).into(), ErrorCode::NO_ERROR.into()],
                None => vec![U256::ZERO.into(), ErrorCode::RESOURCE_NOT_FOUND.into()],
            },
            ContractCall::OwnerFromIndex { index } => {
                let slot = usize::try_from(*index)
                    .ok()
                    .and_then(|i| self.owners.get(i));
                match slot {
                    Some(Some(slot)) => vec![
                        slot.address.into(),
                        U256::from(slot.added_at).into(),
                        ErrorCode::NO_ERROR.into(),
                    ],
                    Some(None) => vec![
                        Address::ZERO.into(),
                        U256::ZERO.into(),
                        ErrorCode::RESOURCE_NOT_FOUND.into(),
                    ],
                    None => vec![
                        Address::ZERO.into(),
                        U256::ZERO.into(),
                        ErrorCode::ARRAY_INDEX_OUT_OF_BOUNDS.into(),
                    ],
                }
            }
            ContractCall::NumOwners => vec![U256::from(self.owners.len()).into()],
            ContractCall::HasPermission { address } => {
                vec![(*address == self.root || self.is_owner(address)).into()]
            }
            _ => return None,
        };
        Some(values)
    }

    fn slot_of(&self, owner: &Address) -> Option<&OwnerSlot> {
        self.index
            .get(owner)
            .and_then(|&i| self.owners[i].as_ref())
    }
}

#[async_trait]
impl ContractBackend for MemoryChain {
    async fn block_number(&self) -> Result<BlockNumber> {
        let inner = self.lock();
        inner.check_reachable()?;
        Ok(inner.head())
    }

    async fn query(
        &self,
        call: &ContractCall,
        _params: &TxParams,
        at: BlockRef,
    ) -> Result<Vec<Value>> {
        let inner = self.lock();
        inner.check_reachable()?;

        if let ContractCall::OwnerFromIndex { index } = call {
            if inner.faults.failing_index == Some(*index) {
                return Err(ContractError::Transport(format!(
                    "ownerFromIndex({}) timed out",
                    index
                )));
            }
        }

        inner
            .block_at(at)?
            .state
            .read(call)
            .ok_or(ContractError::InvalidCall {
                method: call.method(),
                reason: "state-mutating calls must be submitted",
            })
    }

    async fn submit(&self, call: &ContractCall, params: &TxParams) -> Result<TxHash> {
        if !call.is_write() {
            return Err(ContractError::InvalidCall {
                method: call.method(),
                reason: "read-only calls must be queried",
            });
        }

        let (hash, number) = {
            let mut inner = self.lock();
            inner.check_reachable()?;

            if params.gas == Some(0) {
                return Err(ContractError::Submission("intrinsic gas too low".into()));
            }

            let sender = params.from.unwrap_or(inner.deployer);
            let hash = inner.next_tx_hash(self.config.chain_id, call, &sender);
            // The contract is not payable.
            let revert = std::mem::take(&mut inner.faults.revert_next)
                || params.value.is_some_and(|v| !v.is_zero());

            inner.mempool.push(PendingTx {
                hash,
                call: call.clone(),
                sender,
                revert,
            });

            if !inner.auto_mine {
                tracing::debug!(tx = %hash, "transaction queued");
                return Ok(hash);
            }

            let pending = std::mem::take(&mut inner.mempool);
            (hash, inner.mine_block(&self.config, pending))
        };

        self.head.send_replace(number);
        Ok(hash)
    }

    async fn await_event(
        &self,
        event: PermissionEvent,
        tx_hash: TxHash,
    ) -> Result<ConfirmedEvent> {
        let mut head = self.head.subscribe();
        loop {
            let _ = head.borrow_and_update();
            if let Some(confirmed) = self.lookup(event, tx_hash)? {
                return Ok(confirmed);
            }
            head.changed()
                .await
                .map_err(|_| ContractError::Subscription("chain shut down".into()))?;
        }
    }
}
