//! # DAO Permission Core
//!
//! Pure value types for the permission client: addresses, block references,
//! domain error codes, decoded contract records.
//!
//! This crate contains no I/O and no networking. It only turns raw contract
//! return tuples into typed records, and refuses to do so silently when a
//! value does not fit its target type.
//!
//! ## Key Types
//!
//! - [`Value`] - A single decoded ABI word returned by the contract
//! - [`ErrorCode`] - Domain error code carried inside successful responses
//! - [`RootInfo`], [`OwnerRecord`], [`OwnerTimestamp`] - Decoded lookups
//! - [`OwnerPage`] - A block-pinned, filtered slice of the owner array
//! - [`TxOutcome`] - The decoded confirmation of a state-mutating call
//!
//! ## Decoding
//!
//! Chain integers are [`U256`]. Every narrowing conversion goes through
//! [`types::narrow_u64`], [`types::narrow_u16`] or [`types::decode_timestamp`]
//! and fails with a [`DecodeError`] instead of clamping.

pub mod error;
pub mod error_code;
pub mod event;
pub mod record;
pub mod types;
pub mod value;

pub use error::{DecodeError, Result};
pub use error_code::ErrorCode;
pub use event::PermissionEvent;
pub use record::{OwnerEntry, OwnerPage, OwnerRecord, OwnerTimestamp, RootInfo, TxOutcome};
pub use types::{
    decode_timestamp, narrow_u16, narrow_u64, Address, BlockNumber, BlockRef, Timestamp, TxHash,
    U256,
};
pub use value::{TupleDecoder, Value};
