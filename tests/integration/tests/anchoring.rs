//! Integration test: issuance when the ledger misbehaves.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use lune_core::AnchorFallback;
use lune_credentials::{CredentialError, LocalLedger};
use lune_identity::Anchor;
use lune_integration_tests::{service_with_ledger, UnavailableLedger};

#[tokio::test]
async fn test_fail_policy_leaves_wallet_untouched() {
    let ledger = Arc::new(UnavailableLedger::default());
    let (service, _key) = service_with_ledger(ledger.clone(), AnchorFallback::Fail);
    let mut wallet = service.get_or_create_wallet("unlucky").await.unwrap();

    let result = service
        .issue_credential(&mut wallet, "Un Lucky", "React", 85, "Advanced")
        .await;
    assert!(matches!(result, Err(CredentialError::IssuanceFailed(_))));
    assert!(wallet.is_empty());
    assert!(service.find_wallet("unlucky").await.unwrap().unwrap().is_empty());

    // One attempt plus the configured retry
    assert_eq!(ledger.attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_local_only_policy_issues_unanchored() {
    let ledger = Arc::new(UnavailableLedger::default());
    let (service, _key) = service_with_ledger(ledger, AnchorFallback::LocalOnly);
    let mut wallet = service.get_or_create_wallet("offline").await.unwrap();

    let vc = service
        .issue_credential(&mut wallet, "Off Line", "React", 85, "Advanced")
        .await
        .unwrap();
    let anchor = vc.anchor.as_ref().unwrap();
    assert_eq!(anchor.network, Anchor::LOCAL_NETWORK);
    assert!(!anchor.is_anchored());
    assert_eq!(service.explorer_url(&vc), "#");

    // Unanchored credentials still verify
    assert!(service.verify(&vc.id, None).await.unwrap().is_valid);
}

#[tokio::test]
async fn test_local_ledger_never_links_to_an_explorer() {
    let (service, _key) = service_with_ledger(Arc::new(LocalLedger), AnchorFallback::Fail);
    let mut wallet = service.get_or_create_wallet("local").await.unwrap();
    let vc = service
        .issue_credential(&mut wallet, "Lo Cal", "SQL", 50, "Beginner")
        .await
        .unwrap();
    assert_eq!(vc.anchor.as_ref().unwrap().network, Anchor::LOCAL_NETWORK);
    assert_eq!(service.explorer_url(&vc), "#");
}
