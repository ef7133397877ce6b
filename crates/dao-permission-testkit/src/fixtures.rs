//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use dao_permission::{PermissionService, Result, ServiceConfig};
use dao_permission_contract::MemoryChain;
use dao_permission_core::Address;

/// Deterministic address for test party `n`. Never the zero address.
pub fn address(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xd0;
    bytes[19] = n;
    Address::from(bytes)
}

/// A fresh random address.
pub fn random_address() -> Address {
    Address::from(rand::random::<[u8; 20]>())
}

/// An owner array to reproduce on chain: each slot is an owner that is
/// either still present or has been removed (leaving a vacant slot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerLayout {
    pub slots: Vec<(Address, bool)>,
}

impl OwnerLayout {
    /// `count` owners, none removed.
    pub fn filled(count: u8) -> Self {
        Self {
            slots: (0..count).map(|i| (address(i + 1), false)).collect(),
        }
    }

    /// Mark the slots at `indices` as vacant.
    pub fn with_vacant(mut self, indices: &[usize]) -> Self {
        for &i in indices {
            if let Some(slot) = self.slots.get_mut(i) {
                slot.1 = true;
            }
        }
        self
    }

    pub fn total_size(&self) -> u64 {
        self.slots.len() as u64
    }

    /// Owners expected in a listing of `[start, end)`, in slot order.
    pub fn expected(&self, start: u64, end: u64) -> Vec<Address> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(i, (_, vacant))| (*i as u64) >= start && (*i as u64) < end && !vacant)
            .map(|(_, (address, _))| *address)
            .collect()
    }
}

/// An in-memory chain with a deployed permission contract.
pub struct ChainFixture {
    pub chain: Arc<MemoryChain>,
    pub root: Address,
}

impl ChainFixture {
    /// A chain whose root is [`address(0)`](address) and has no owners.
    pub fn new() -> Self {
        Self::with_root(address(0))
    }

    pub fn with_root(root: Address) -> Self {
        Self {
            chain: Arc::new(MemoryChain::deploy(root)),
            root,
        }
    }

    /// A chain populated with `layout`: every slot is added in order, then
    /// the vacant ones are removed.
    pub async fn with_layout(layout: &OwnerLayout) -> Result<Self> {
        let fixture = Self::new();
        let service = fixture.service();

        for (owner, _) in &layout.slots {
            service.add_owner(*owner, None).await?;
        }
        for (owner, _) in layout.slots.iter().filter(|(_, vacant)| *vacant) {
            service.remove_owner(*owner, None).await?;
        }
        Ok(fixture)
    }

    /// A service sending from the root with default settings.
    pub fn service(&self) -> PermissionService<Arc<MemoryChain>> {
        self.service_with(ServiceConfig::default())
    }

    /// A service sending from the root with `config` otherwise.
    pub fn service_with(&self, config: ServiceConfig) -> PermissionService<Arc<MemoryChain>> {
        let config = ServiceConfig {
            default_sender: Some(self.root),
            ..config
        };
        match PermissionService::new(self.chain.clone(), config) {
            Ok(service) => service,
            Err(e) => panic!("fixture config rejected: {e}"),
        }
    }
}

impl Default for ChainFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Addresses for `count` distinct test parties, starting at party 1.
pub fn parties(count: u8) -> Vec<Address> {
    (1..=count).map(address).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dao_permission::OwnersQuery;

    #[test]
    fn test_addresses_are_distinct_and_nonzero() {
        let all = parties(5);
        assert!(all.iter().all(|a| !a.is_zero()));
        for (i, a) in all.iter().enumerate() {
            assert!(!all[i + 1..].contains(a));
        }
        assert_ne!(random_address(), random_address());
    }

    #[test]
    fn test_layout_expected() {
        let layout = OwnerLayout::filled(5).with_vacant(&[2]);
        assert_eq!(layout.total_size(), 5);
        assert_eq!(layout.expected(0, 5).len(), 4);
        assert_eq!(layout.expected(1, 3), vec![address(2)]);
        assert!(layout.expected(5, 5).is_empty());
    }

    #[tokio::test]
    async fn test_fixture_reproduces_layout() {
        let layout = OwnerLayout::filled(4).with_vacant(&[0, 3]);
        let fixture = ChainFixture::with_layout(&layout).await.unwrap();
        let service = fixture.service();

        let page = service.owners(OwnersQuery::all(), None).await.unwrap();
        assert_eq!(page.total_size, 4);
        let listed: Vec<Address> = page.owners.iter().map(|o| o.address).collect();
        assert_eq!(listed, layout.expected(0, 4));
    }
}
