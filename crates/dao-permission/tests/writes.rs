//! Write calls end to end against the in-memory chain.

use std::sync::Arc;
use std::time::Duration;

use dao_permission::contract::{ContractError, MemoryChain, MemoryChainConfig};
use dao_permission::{
    Address, ErrorCode, OwnersQuery, PermissionError, PermissionEvent, PermissionService,
    ServiceConfig, TxParams,
};

fn addr(b: u8) -> Address {
    Address::repeat_byte(b)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn setup(root: Address) -> (Arc<MemoryChain>, PermissionService<Arc<MemoryChain>>) {
    init_tracing();
    let chain = Arc::new(MemoryChain::deploy(root));
    let service = PermissionService::new(
        chain.clone(),
        ServiceConfig::default().with_default_sender(root),
    )
    .unwrap();
    (chain, service)
}

#[tokio::test]
async fn test_set_root_hands_over_authority() -> anyhow::Result<()> {
    let (_chain, service) = setup(addr(0x01));

    let outcome = service.set_root(addr(0x02), None).await?;
    assert!(outcome.is_success());
    assert_eq!(outcome.event, PermissionEvent::SetRoot);
    assert_eq!(outcome.subject, addr(0x02));

    let data = service.root_data(None).await?;
    assert_eq!(data.address, service.root(None).await?);
    assert_eq!(data.address, addr(0x02));
    assert_eq!(data.added_at, outcome.confirmed_at);

    // The old root can no longer manage owners.
    let denied = service.add_owner(addr(0x03), None).await?;
    assert_eq!(denied.error_code, ErrorCode::ACCESS_DENIED);

    let allowed = service
        .add_owner(addr(0x03), Some(TxParams::from_sender(addr(0x02))))
        .await?;
    assert!(allowed.is_success());
    Ok(())
}

#[tokio::test]
async fn test_owner_lifecycle() -> anyhow::Result<()> {
    let (_chain, service) = setup(addr(0x01));

    let added = service.add_owner(addr(0x05), None).await?;
    let stamp = service.owner_timestamp(addr(0x05), None).await?;
    assert!(stamp.exists());
    assert_eq!(stamp.added_at, added.confirmed_at);
    assert!(service.has_permission(addr(0x05), None).await?);

    let duplicate = service.add_owner(addr(0x05), None).await?;
    assert_eq!(duplicate.error_code, ErrorCode::RESOURCE_ALREADY_EXISTS);

    let root_as_owner = service.add_owner(addr(0x01), None).await?;
    assert!(!root_as_owner.is_success());

    let removed = service.remove_owner(addr(0x05), None).await?;
    assert!(removed.is_success());
    assert!(!service.has_permission(addr(0x05), None).await?);
    assert!(!service.owner_timestamp(addr(0x05), None).await?.exists());

    let again = service.remove_owner(addr(0x05), None).await?;
    assert_eq!(again.error_code, ErrorCode::RESOURCE_NOT_FOUND);

    let page = service.owners(OwnersQuery::all(), None).await?;
    assert_eq!(page.total_size, 1);
    assert!(page.owners.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_confirmation_arrives_when_mined() -> anyhow::Result<()> {
    let (chain, service) = setup(addr(0x01));
    chain.set_auto_mine(false);
    let service = Arc::new(service);

    let pending = {
        let service = service.clone();
        tokio::spawn(async move { service.add_owner(addr(0x02), None).await })
    };

    while chain.pending_count() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // Other calls proceed while the write waits.
    assert!(!service.has_permission(addr(0x02), None).await?);
    assert!(!pending.is_finished());

    let block = chain.mine();
    let outcome = pending.await??;
    assert!(outcome.is_success());
    assert_eq!(outcome.block_number, block);
    assert!(service.has_permission(addr(0x02), None).await?);
    Ok(())
}

#[tokio::test]
async fn test_confirmation_timeout_with_auto_mine_off() -> anyhow::Result<()> {
    init_tracing();
    let chain = Arc::new(MemoryChain::with_config(
        addr(0x01),
        MemoryChainConfig {
            auto_mine: false,
            ..MemoryChainConfig::default()
        },
    ));
    let service = PermissionService::new(
        chain.clone(),
        ServiceConfig::default()
            .with_default_sender(addr(0x01))
            .with_confirmation_timeout(Duration::from_millis(100)),
    )?;

    let err = service.set_root(addr(0x02), None).await.unwrap_err();
    match err {
        PermissionError::ConfirmationTimeout { event, timeout, .. } => {
            assert_eq!(event, PermissionEvent::SetRoot);
            assert_eq!(timeout, Duration::from_millis(100));
        }
        other => panic!("expected timeout, got {other}"),
    }

    // The transaction is still pending; nothing changed on chain.
    assert_eq!(chain.pending_count(), 1);
    assert_eq!(service.root(None).await?, addr(0x01));
    Ok(())
}

#[tokio::test]
async fn test_dropped_transaction_fails_confirmation() -> anyhow::Result<()> {
    let (chain, service) = setup(addr(0x01));
    chain.set_auto_mine(false);
    let service = Arc::new(service);

    let pending = {
        let service = service.clone();
        tokio::spawn(async move { service.remove_owner(addr(0x02), None).await })
    };
    while chain.pending_count() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(chain.drop_pending(), 1);

    let err = pending.await?.unwrap_err();
    assert!(matches!(
        err,
        PermissionError::Confirmation {
            event: PermissionEvent::RemoveOwner,
            source: ContractError::Dropped { .. },
            ..
        }
    ));
    Ok(())
}

#[tokio::test]
async fn test_payable_value_reverts() -> anyhow::Result<()> {
    let (_chain, service) = setup(addr(0x01));

    let params = TxParams::new().value(dao_permission::core::U256::from(1u64));
    let err = service.add_owner(addr(0x02), Some(params)).await.unwrap_err();
    assert!(matches!(
        err,
        PermissionError::Confirmation {
            source: ContractError::Reverted { .. },
            ..
        }
    ));
    assert!(!service.has_permission(addr(0x02), None).await?);
    Ok(())
}

#[tokio::test]
async fn test_submission_failure_is_immediate() -> anyhow::Result<()> {
    let (chain, service) = setup(addr(0x01));

    let err = service
        .add_owner(addr(0x02), Some(TxParams::new().gas(0)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PermissionError::Contract(ContractError::Submission(_))
    ));

    chain.set_unreachable(true);
    let err = service.set_root(addr(0x02), None).await.unwrap_err();
    assert!(matches!(
        err,
        PermissionError::Contract(ContractError::Transport(_))
    ));
    assert_eq!(chain.pending_count(), 0);
    Ok(())
}
