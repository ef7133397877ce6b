//! Proptest generators for property-based testing.

use proptest::prelude::*;

use dao_permission::OwnersQuery;
use dao_permission_core::{Address, ErrorCode};

use crate::fixtures::{address, OwnerLayout};

/// Generate a random address, zero included.
pub fn any_address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::from)
}

/// Generate a contract error code, biased towards success.
pub fn error_code() -> impl Strategy<Value = ErrorCode> {
    prop_oneof![
        3 => Just(ErrorCode::NO_ERROR),
        1 => Just(ErrorCode::RESOURCE_NOT_FOUND),
        1 => Just(ErrorCode::ARRAY_INDEX_OUT_OF_BOUNDS),
        1 => (1u16..=u16::MAX).prop_map(ErrorCode),
    ]
}

/// Generate an owner layout of up to `max_slots` distinct owners.
pub fn owner_layout(max_slots: usize) -> impl Strategy<Value = OwnerLayout> {
    prop::collection::vec(any::<bool>(), 0..=max_slots).prop_map(|vacant| OwnerLayout {
        slots: vacant
            .into_iter()
            .enumerate()
            .map(|(i, vacant)| (address(i as u8 + 1), vacant))
            .collect(),
    })
}

/// Generate a pagination query whose bounds may fall past `max_index`.
pub fn owners_query(max_index: u64) -> impl Strategy<Value = OwnersQuery> {
    (
        proptest::option::of(0..=max_index + 5),
        proptest::option::of(0..=max_index + 5),
    )
        .prop_map(|(start_index, count)| OwnersQuery { start_index, count })
}
