//! Integration test: sharing credentials through presentations.

use lune_core::CredentialStatus;
use lune_integration_tests::fast_service;

#[tokio::test]
async fn test_share_verify_and_view() {
    let service = fast_service();
    let mut wallet = service.get_or_create_wallet("job-seeker").await.unwrap();
    let react = service
        .issue_credential(&mut wallet, "Jo", "React", 85, "Advanced")
        .await
        .unwrap();
    let rust = service
        .issue_credential(&mut wallet, "Jo", "Rust", 91, "Expert")
        .await
        .unwrap();
    service
        .issue_credential(&mut wallet, "Jo", "PHP", 40, "Beginner")
        .await
        .unwrap();

    let presentation = service
        .create_presentation(&wallet, &[rust.id.clone(), react.id.clone()], Some(72), true)
        .await
        .unwrap();
    assert_eq!(presentation.holder, wallet.did);
    assert_eq!(presentation.credentials.len(), 2);
    assert!(presentation
        .access_url
        .ends_with(&format!("/verify/{}", presentation.id)));
    let code = presentation.access_code.clone().unwrap();

    // Recruiter opens the link with the code and verifies each credential
    let viewed = service
        .get_presentation(&presentation.id, Some(&code))
        .await
        .unwrap()
        .expect("code should unlock the presentation");
    assert_eq!(viewed.views, 1);
    for credential in &viewed.credentials {
        let result = service.verify_credential(credential, Some(viewed.holder.uri()));
        assert!(result.is_valid, "{} should verify", credential.id);
    }

    assert!(service
        .get_presentation(&presentation.id, None)
        .await
        .unwrap()
        .is_none());
    assert!(service
        .get_presentation(&presentation.id, Some("ZZZZZZ"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_presentation_is_a_snapshot() {
    let service = fast_service();
    let mut wallet = service.get_or_create_wallet("snapshot").await.unwrap();
    let vc = service
        .issue_credential(&mut wallet, "Snap", "Go", 80, "Advanced")
        .await
        .unwrap();

    let presentation = service
        .create_presentation(&wallet, &[vc.id.clone()], None, false)
        .await
        .unwrap();
    service.revoke(&mut wallet, &vc.id).await.unwrap();

    let viewed = service
        .get_presentation(&presentation.id, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(viewed.credentials[0].status, CredentialStatus::Active);

    // A live check against the index sees the revocation
    let result = service.verify(&vc.id, None).await.unwrap();
    assert!(!result.is_valid);
}

#[tokio::test]
async fn test_cannot_share_another_wallets_credentials() {
    let service = fast_service();
    let mut alice = service.get_or_create_wallet("alice").await.unwrap();
    let bob = service.get_or_create_wallet("bob").await.unwrap();
    let vc = service
        .issue_credential(&mut alice, "Alice", "Elixir", 88, "Advanced")
        .await
        .unwrap();

    let presentation = service
        .create_presentation(&bob, &[vc.id.clone()], None, false)
        .await
        .unwrap();
    assert!(presentation.credentials.is_empty());
    assert_eq!(presentation.holder, bob.did);
}

#[tokio::test]
async fn test_unknown_presentation_is_none() {
    let service = fast_service();
    assert!(service
        .get_presentation("no-such-presentation", None)
        .await
        .unwrap()
        .is_none());
}
