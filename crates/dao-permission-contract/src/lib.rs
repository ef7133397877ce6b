//! # DAO Permission Contract
//!
//! The capability the permission service is built on: submit a call, query
//! a call at a block, and wait for the event confirming a transaction.
//!
//! ## Overview
//!
//! The service never talks to a node directly. It goes through the
//! [`ContractBackend`] trait, which a real RPC binding or the in-memory
//! [`MemoryChain`] implements.
//!
//! ## Key Types
//!
//! - [`ContractBackend`] - The async trait for all contract interaction
//! - [`ContractCall`] - The permission contract's methods with typed arguments
//! - [`TxParams`] - Optional sender, gas, gas price and value for a call
//! - [`ConfirmedEvent`] - A mined event tied to a transaction hash
//! - [`MemoryChain`] - An in-memory chain running the permission contract
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dao_permission_contract::{ContractBackend, ContractCall, MemoryChain, TxParams};
//! use dao_permission_core::{Address, BlockRef, PermissionEvent};
//!
//! async fn example() {
//!     let root = Address::repeat_byte(0x01);
//!     let chain = MemoryChain::deploy(root);
//!
//!     let params = TxParams::from_sender(root);
//!     let call = ContractCall::AddOwner { owner: Address::repeat_byte(0x02) };
//!     let tx = chain.submit(&call, &params).await.unwrap();
//!     let confirmed = chain.await_event(PermissionEvent::AddOwner, tx).await.unwrap();
//!
//!     let size = chain
//!         .query(&ContractCall::NumOwners, &params, BlockRef::Number(confirmed.block_number))
//!         .await
//!         .unwrap();
//! }
//! ```

pub mod call;
pub mod error;
pub mod memory;
pub mod params;
pub mod traits;

pub use call::{ConfirmedEvent, ContractCall};
pub use error::{ContractError, Result};
pub use memory::{MemoryChain, MemoryChainConfig};
pub use params::TxParams;
pub use traits::ContractBackend;
