//! Permission contract methods and confirmation events.

use serde::{Deserialize, Serialize};

use dao_permission_core::{
    Address, BlockNumber, DecodeError, PermissionEvent, TxHash, TxOutcome, Value, U256,
};

/// A call to one of the permission contract's methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractCall {
    /// `setRoot(address)`: replace the root. Root only.
    SetRoot { new_root: Address },
    /// `root()`: the root address.
    Root,
    /// `rootData()`: the root address and when it was set.
    RootData,
    /// `addOwner(address)`: grant owner permission. Root only.
    AddOwner { owner: Address },
    /// `removeOwner(address)`: revoke owner permission. Root only.
    RemoveOwner { owner: Address },
    /// `ownerTimestamp(address)`: when an owner was added, plus an error code.
    OwnerTimestamp { owner: Address },
    /// `ownerFromIndex(uint)`: the owner slot at an index of the backing array.
    OwnerFromIndex { index: U256 },
    /// `numOwners()`: length of the backing owner array.
    NumOwners,
    /// `hasPermission(address)`: root or owner.
    HasPermission { address: Address },
}

impl ContractCall {
    /// Method name as declared in the contract ABI.
    pub const fn method(&self) -> &'static str {
        match self {
            ContractCall::SetRoot { .. } => "setRoot",
            ContractCall::Root => "root",
            ContractCall::RootData => "rootData",
            ContractCall::AddOwner { .. } => "addOwner",
            ContractCall::RemoveOwner { .. } => "removeOwner",
            ContractCall::OwnerTimestamp { .. } => "ownerTimestamp",
            ContractCall::OwnerFromIndex { .. } => "ownerFromIndex",
            ContractCall::NumOwners => "numOwners",
            ContractCall::HasPermission { .. } => "hasPermission",
        }
    }

    /// The event that confirms this call, for state-mutating calls.
    pub const fn confirmation_event(&self) -> Option<PermissionEvent> {
        match self {
            ContractCall::SetRoot { .. } => Some(PermissionEvent::SetRoot),
            ContractCall::AddOwner { .. } => Some(PermissionEvent::AddOwner),
            ContractCall::RemoveOwner { .. } => Some(PermissionEvent::RemoveOwner),
            _ => None,
        }
    }

    /// Whether the call mutates contract state and must be submitted.
    pub const fn is_write(&self) -> bool {
        self.confirmation_event().is_some()
    }
}

/// An event observed on-chain for a specific transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedEvent {
    pub event: PermissionEvent,
    pub tx_hash: TxHash,
    pub block_number: BlockNumber,
    /// Raw timestamp of the including block.
    pub block_timestamp: U256,
    /// Event arguments in declaration order.
    pub values: Vec<Value>,
}

impl ConfirmedEvent {
    /// Decode into the outcome handed back to callers.
    pub fn decode(&self) -> Result<TxOutcome, DecodeError> {
        TxOutcome::decode(
            self.event,
            self.tx_hash,
            self.block_number,
            self.block_timestamp,
            &self.values,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dao_permission_core::ErrorCode;

    #[test]
    fn test_write_calls_have_events() {
        let a = Address::repeat_byte(0x01);
        assert_eq!(
            ContractCall::SetRoot { new_root: a }.confirmation_event(),
            Some(PermissionEvent::SetRoot)
        );
        assert!(ContractCall::AddOwner { owner: a }.is_write());
        assert!(ContractCall::RemoveOwner { owner: a }.is_write());
        assert!(!ContractCall::NumOwners.is_write());
        assert!(!ContractCall::HasPermission { address: a }.is_write());
    }

    #[test]
    fn test_method_names() {
        assert_eq!(ContractCall::RootData.method(), "rootData");
        assert_eq!(
            ContractCall::OwnerFromIndex { index: U256::ZERO }.method(),
            "ownerFromIndex"
        );
    }

    #[test]
    fn test_confirmed_event_decode() {
        let event = ConfirmedEvent {
            event: PermissionEvent::RemoveOwner,
            tx_hash: TxHash::repeat_byte(0x10),
            block_number: 4,
            block_timestamp: U256::from(1_700_000_048u64),
            values: vec![
                Address::repeat_byte(0x02).into(),
                ErrorCode::RESOURCE_NOT_FOUND.into(),
            ],
        };
        let outcome = event.decode().unwrap();
        assert_eq!(outcome.event, PermissionEvent::RemoveOwner);
        assert_eq!(outcome.error_code, ErrorCode::RESOURCE_NOT_FOUND);
        assert_eq!(outcome.confirmed_at.timestamp(), 1_700_000_048);
    }
}
