//! Records decoded from permission contract responses.
//!
//! Every record is built fresh from one response and has no identity beyond
//! the call that produced it.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::error_code::ErrorCode;
use crate::event::PermissionEvent;
use crate::types::{decode_timestamp, Address, BlockNumber, Timestamp, TxHash, U256};
use crate::value::{TupleDecoder, Value};

/// The current root and when it was set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootInfo {
    pub address: Address,
    pub added_at: Timestamp,
}

impl RootInfo {
    /// Decode the `rootData()` tuple `(address, uint timestamp)`.
    pub fn decode(values: &[Value]) -> Result<Self> {
        let mut d = TupleDecoder::new("rootData", values, 2)?;
        Ok(Self {
            address: d.address()?,
            added_at: d.timestamp()?,
        })
    }
}

/// Result of an `ownerTimestamp(address)` lookup.
///
/// Doubles as an existence check: a nonzero `error_code` means the address
/// is not an owner and `added_at` carries no information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerTimestamp {
    pub added_at: Timestamp,
    pub error_code: ErrorCode,
}

impl OwnerTimestamp {
    /// Decode the `ownerTimestamp` tuple `(uint timestamp, uint errorCode)`.
    pub fn decode(values: &[Value]) -> Result<Self> {
        let mut d = TupleDecoder::new("ownerTimestamp", values, 2)?;
        Ok(Self {
            added_at: d.timestamp()?,
            error_code: d.error_code()?,
        })
    }

    /// Whether the looked-up address is a current owner.
    pub fn exists(&self) -> bool {
        self.error_code.is_ok()
    }
}

/// One slot of the owner array, as returned by `ownerFromIndex(index)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRecord {
    pub address: Address,
    pub added_at: Timestamp,
    pub error_code: ErrorCode,
}

impl OwnerRecord {
    /// Decode the `ownerFromIndex` tuple `(address, uint timestamp, uint errorCode)`.
    pub fn decode(values: &[Value]) -> Result<Self> {
        let mut d = TupleDecoder::new("ownerFromIndex", values, 3)?;
        Ok(Self {
            address: d.address()?,
            added_at: d.timestamp()?,
            error_code: d.error_code()?,
        })
    }

    /// Whether the slot holds a valid, existing owner.
    pub fn is_valid(&self) -> bool {
        self.error_code.is_ok()
    }

    /// The listing entry for this slot, or `None` if the slot is invalid.
    pub fn into_entry(self) -> Option<OwnerEntry> {
        self.is_valid().then(|| OwnerEntry {
            address: self.address,
            added_at: self.added_at,
        })
    }
}

/// A valid owner as it appears in an [`OwnerPage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerEntry {
    pub address: Address,
    pub added_at: Timestamp,
}

/// A slice of the owner array, read entirely at one block height.
///
/// `total_size` and `end_index` describe the array at `at_block`, even if
/// the chain has moved on since. Invalid slots in `[start_index, end_index)`
/// are skipped, so `owners.len()` may be smaller than the range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerPage {
    pub start_index: u64,
    pub end_index: u64,
    pub total_size: u64,
    pub at_block: BlockNumber,
    pub owners: Vec<OwnerEntry>,
}

impl OwnerPage {
    /// Number of slots the page covered, valid or not.
    pub fn span(&self) -> u64 {
        self.end_index.saturating_sub(self.start_index)
    }

    /// Whether the page reaches the end of the owner array.
    pub fn is_last(&self) -> bool {
        self.end_index >= self.total_size
    }

    /// Whether `address` appears in this page.
    pub fn contains(&self, address: &Address) -> bool {
        self.owners.iter().any(|o| &o.address == address)
    }
}

/// The confirmed result of a state-mutating call.
///
/// A nonzero `error_code` means the transaction was mined but the contract
/// declined the change; it is reported here rather than as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutcome {
    pub event: PermissionEvent,
    pub tx_hash: TxHash,
    pub block_number: BlockNumber,
    /// The address the event is about (new root, added or removed owner).
    pub subject: Address,
    pub error_code: ErrorCode,
    /// Timestamp of the block that included the transaction.
    pub confirmed_at: Timestamp,
}

impl TxOutcome {
    /// Decode an event payload `(address, uint errorCode)` together with the
    /// metadata of the block that confirmed it.
    pub fn decode(
        event: PermissionEvent,
        tx_hash: TxHash,
        block_number: BlockNumber,
        block_timestamp: U256,
        values: &[Value],
    ) -> Result<Self> {
        let mut d = TupleDecoder::new(event.name(), values, 2)?;
        Ok(Self {
            event,
            tx_hash,
            block_number,
            subject: d.address()?,
            error_code: d.error_code()?,
            confirmed_at: decode_timestamp(block_timestamp)?,
        })
    }

    pub fn is_success(&self) -> bool {
        self.error_code.is_ok()
    }
}
