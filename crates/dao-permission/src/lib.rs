//! # DAO Permission
//!
//! Typed async client for the DAO permission contract: one root address and
//! a set of owner addresses, each of which satisfies `hasPermission`.
//!
//! ## Overview
//!
//! [`PermissionService`] turns method calls into contract calls through a
//! [`ContractBackend`](contract::ContractBackend):
//!
//! - **Writes** (`set_root`, `add_owner`, `remove_owner`) are submitted and
//!   then awaited until their confirmation event is mined.
//! - **Reads** (`root`, `root_data`, `has_permission`, `num_owners`,
//!   `owner_timestamp`, `owner_from_index`) are single queries whose return
//!   tuples are decoded into records.
//! - **Listing** (`owners`) pins a block height first and reads the size and
//!   every slot at that height, skipping vacant slots.
//!
//! Contract-level error codes (owner already exists, access denied, ...) are
//! returned as data in [`TxOutcome`] and records. Only transport,
//! confirmation and decode failures are errors.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dao_permission::{OwnersQuery, PermissionService, ServiceConfig};
//! use dao_permission::contract::MemoryChain;
//! use dao_permission::core::Address;
//!
//! async fn example() {
//!     let root = Address::repeat_byte(0x01);
//!     let chain = MemoryChain::deploy(root);
//!
//!     let config = ServiceConfig::default().with_default_sender(root);
//!     let service = PermissionService::new(chain, config).unwrap();
//!
//!     let outcome = service
//!         .add_owner(Address::repeat_byte(0x02), None)
//!         .await
//!         .unwrap();
//!     assert!(outcome.is_success());
//!
//!     let page = service.owners(OwnersQuery::all(), None).await.unwrap();
//!     println!("{} owners at block {}", page.owners.len(), page.at_block);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `dao_permission::core` - Value types, records, decoding
//! - `dao_permission::contract` - Backend trait, call types, in-memory chain

pub mod config;
pub mod error;
pub mod query;
pub mod service;

pub use dao_permission_contract as contract;
pub use dao_permission_core as core;

pub use config::ServiceConfig;
pub use error::{PermissionError, Result};
pub use query::OwnersQuery;
pub use service::PermissionService;

pub use dao_permission_contract::{ContractBackend, TxParams};
pub use dao_permission_core::{
    Address, BlockRef, ErrorCode, OwnerEntry, OwnerPage, OwnerRecord, OwnerTimestamp,
    PermissionEvent, RootInfo, TxOutcome,
};
