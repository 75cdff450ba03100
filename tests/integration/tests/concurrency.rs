//! Integration test: concurrent callers against one service.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use lune_integration_tests::fast_service;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_wallet_creation_yields_one_wallet() {
    let service = Arc::new(fast_service());

    let tasks = (0..16).map(|_| {
        let service = service.clone();
        tokio::spawn(async move { service.get_or_create_wallet("racer").await.unwrap() })
    });
    let wallets: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let ids: HashSet<&str> = wallets.iter().map(|w| w.wallet_id.as_str()).collect();
    let dids: HashSet<&str> = wallets.iter().map(|w| w.did.uri()).collect();
    assert_eq!(ids.len(), 1);
    assert_eq!(dids.len(), 1);
    assert_eq!(service.wallet_count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_issuance_loses_no_credentials() {
    let service = Arc::new(fast_service());
    let wallet = service.get_or_create_wallet("busy").await.unwrap();

    // Every task works from its own stale copy of the wallet
    let tasks = (0..12).map(|i| {
        let service = service.clone();
        let mut copy = wallet.clone();
        tokio::spawn(async move {
            service
                .issue_credential(&mut copy, "Busy Bee", &format!("Skill{}", i), 70, "Advanced")
                .await
                .unwrap()
        })
    });
    let issued: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let stored = service.find_wallet("busy").await.unwrap().unwrap();
    assert_eq!(stored.count(), 12);
    for vc in &issued {
        assert!(stored.contains(&vc.id));
        assert!(service.verify(&vc.id, None).await.unwrap().is_valid);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_revocation_and_issuance_interleave() {
    let service = Arc::new(fast_service());
    let mut wallet = service.get_or_create_wallet("mixed").await.unwrap();
    let mut revocable = Vec::new();
    for i in 0..6 {
        let vc = service
            .issue_credential(&mut wallet, "Mix", &format!("Old{}", i), 60, "Intermediate")
            .await
            .unwrap();
        revocable.push(vc.id);
    }

    let revokes = revocable.iter().cloned().map(|id| {
        let service = service.clone();
        let mut copy = wallet.clone();
        tokio::spawn(async move { service.revoke(&mut copy, &id).await.unwrap() })
    });
    let issues = (0..6).map(|i| {
        let service = service.clone();
        let mut copy = wallet.clone();
        tokio::spawn(async move {
            service
                .issue_credential(&mut copy, "Mix", &format!("New{}", i), 80, "Advanced")
                .await
                .unwrap()
        })
    });
    let (revoked, _issued) = futures::join!(join_all(revokes), join_all(issues));
    assert!(revoked.into_iter().all(|r| r.unwrap()));

    let stored = service.find_wallet("mixed").await.unwrap().unwrap();
    assert_eq!(stored.count(), 12);
    for id in &revocable {
        assert!(stored.get(id).unwrap().is_revoked());
    }
    assert_eq!(stored.active_credentials(chrono::Utc::now()).len(), 6);
}
