//! # DAO Permission Testkit
//!
//! Testing utilities for the DAO permission client.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: In-memory chains pre-populated with owner layouts, and
//!   services bound to them
//! - **Generators**: Proptest strategies for addresses, layouts and queries
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use dao_permission::OwnersQuery;
//! use dao_permission_testkit::{ChainFixture, OwnerLayout};
//!
//! async fn example() {
//!     let layout = OwnerLayout::filled(5).with_vacant(&[2]);
//!     let fixture = ChainFixture::with_layout(&layout).await.unwrap();
//!
//!     let page = fixture.service().owners(OwnersQuery::all(), None).await.unwrap();
//!     assert_eq!(page.owners.len(), 4);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use dao_permission_testkit::generators::owners_query;
//!
//! proptest! {
//!     #[test]
//!     fn end_never_exceeds_total(query in owners_query(10), total in 0u64..10) {
//!         prop_assert!(query.bounds(total).1 <= total);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{address, parties, random_address, ChainFixture, OwnerLayout};
pub use generators::{any_address, error_code, owner_layout, owners_query};
