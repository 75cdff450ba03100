//! Integration test: credential lifecycle across crates.
//!
//! Wallet creation → issuance → anchoring → verification → revocation,
//! plus wallet export and import, using lune-credentials, lune-identity
//! and lune-crypto together.

use chrono::{Duration, Utc};
use lune_core::{CredentialStatus, ServiceConfig, TrustedIssuerConfig};
use lune_credentials::{CheckStatus, CredentialError, CredentialService};
use lune_identity::AchievementClaims;
use lune_integration_tests::{fast_config, fast_service};

#[tokio::test]
async fn test_issue_verify_revoke_lifecycle() {
    let service = fast_service();
    let mut wallet = service.get_or_create_wallet("candidate-42").await.unwrap();
    assert!(wallet.did.uri().starts_with("did:lune:"));
    assert!(wallet.is_empty());

    let vc = service
        .issue_credential(&mut wallet, "Grace Hopper", "React", 85, "Advanced")
        .await
        .expect("issuance should succeed");

    // Caller's copy reflects the stored wallet
    assert_eq!(wallet.count(), 1);
    assert_eq!(wallet.get(&vc.id), Some(&vc));
    assert_eq!(vc.holder(), &wallet.did);
    assert!(vc.is_signed());
    assert!(vc.anchor.as_ref().unwrap().is_anchored());

    let result = service.verify(&vc.id, Some(wallet.did.uri())).await.unwrap();
    assert!(result.is_valid);
    let names: Vec<&str> = result.checks.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Credential Exists",
            "Issuer Verification",
            "Signature Valid",
            "Not Revoked",
            "Not Expired",
            "Holder Match",
        ]
    );

    assert!(service.revoke(&mut wallet, &vc.id).await.unwrap());
    assert_eq!(wallet.get(&vc.id).unwrap().status, CredentialStatus::Revoked);

    // Revoking twice is idempotent
    assert!(service.revoke(&mut wallet, &vc.id).await.unwrap());

    let result = service.verify(&vc.id, None).await.unwrap();
    assert!(!result.is_valid);
    let failed: Vec<&str> = result.failed_checks().map(|c| c.name.as_str()).collect();
    assert_eq!(failed, vec!["Not Revoked"]);
}

#[tokio::test]
async fn test_wallet_is_stable_per_owner() {
    let service = fast_service();
    let first = service.get_or_create_wallet("owner-1").await.unwrap();
    let again = service.get_or_create_wallet("owner-1").await.unwrap();
    let other = service.get_or_create_wallet("owner-2").await.unwrap();

    assert_eq!(first.wallet_id, again.wallet_id);
    assert_eq!(first.did, again.did);
    assert_ne!(first.did, other.did);
    assert_ne!(first.public_key, other.public_key);

    assert!(matches!(
        service.get_or_create_wallet("   ").await,
        Err(CredentialError::InvalidOwner(_))
    ));
}

#[tokio::test]
async fn test_multiple_credentials_keep_issue_order() {
    let service = fast_service();
    let mut wallet = service.get_or_create_wallet("polyglot").await.unwrap();
    let mut ids = Vec::new();
    for (skill, level) in [("Rust", "Expert"), ("Go", "Intermediate"), ("SQL", "Beginner")] {
        let vc = service
            .issue_credential(&mut wallet, "Polly Glot", skill, 70, level)
            .await
            .unwrap();
        ids.push(vc.id);
    }

    let stored = service.find_wallet("polyglot").await.unwrap().unwrap();
    let stored_ids: Vec<String> = stored.credentials.iter().map(|c| c.id.clone()).collect();
    assert_eq!(stored_ids, ids);
    assert_eq!(stored.list_by_type("SkillCertification").len(), 3);

    let before = stored.last_updated;
    let mut wallet = stored;
    service.revoke(&mut wallet, &ids[1]).await.unwrap();
    assert!(wallet.last_updated >= before);
    assert_eq!(wallet.active_credentials(Utc::now()).len(), 2);
}

#[tokio::test]
async fn test_assessment_completion_credential() {
    let service = fast_service();
    let mut wallet = service.get_or_create_wallet("student").await.unwrap();
    let claims = AchievementClaims::AssessmentCompletion {
        assessment: "Backend Fundamentals".into(),
        score: 64,
        passed: true,
    };
    let vc = service.issue(&mut wallet, "Student", claims).await.unwrap();
    assert!(vc.has_type("AssessmentCompletion"));
    assert!(service.verify(&vc.id, None).await.unwrap().is_valid);
}

#[tokio::test]
async fn test_expired_credential_fails_not_expired_check() {
    let service = fast_service();
    let mut wallet = service.get_or_create_wallet("short-lived").await.unwrap();
    let claims = AchievementClaims::skill("Docker", 60, "Intermediate").unwrap();
    let vc = service
        .issue_with_expiration(&mut wallet, "Sam", claims, Utc::now() - Duration::seconds(1))
        .await
        .unwrap();

    let result = service.verify(&vc.id, None).await.unwrap();
    assert!(!result.is_valid);
    assert_eq!(
        result.check("Not Expired").unwrap().status,
        CheckStatus::Failed
    );
    assert_eq!(vc.effective_status(Utc::now()), CredentialStatus::Expired);
}

#[tokio::test]
async fn test_tampered_credential_fails_signature() {
    let service = fast_service();
    let mut wallet = service.get_or_create_wallet("honest").await.unwrap();
    let mut vc = service
        .issue_credential(&mut wallet, "Honest Abe", "Python", 55, "Intermediate")
        .await
        .unwrap();

    vc.credential_subject.achievement = AchievementClaims::skill("Python", 99, "Expert").unwrap();
    let result = service.verify_credential(&vc, None);
    assert!(!result.is_valid);
    assert_eq!(
        result.check("Signature Valid").unwrap().status,
        CheckStatus::Failed
    );
}

#[tokio::test]
async fn test_unknown_credential() {
    let service = fast_service();
    let result = service.verify("urn:uuid:does-not-exist", None).await.unwrap();
    assert!(!result.is_valid);
    assert_eq!(result.checks.len(), 1);
    assert_eq!(result.checks[0].name, "Credential Exists");
    assert!(result.credential.is_none());
    assert!(service.find_credential("urn:uuid:does-not-exist").await.unwrap().is_none());
}

#[tokio::test]
async fn test_credential_verifies_at_a_partner_service() {
    let issuing = fast_service();
    let mut wallet = issuing.get_or_create_wallet("traveller").await.unwrap();
    let vc = issuing
        .issue_credential(&mut wallet, "Traveller", "Kotlin", 77, "Advanced")
        .await
        .unwrap();

    // A service that does not know the issuer still verifies the proof
    // through the embedded key, but flags the issuer.
    let stranger = CredentialService::in_memory(ServiceConfig {
        issuer: lune_core::IssuerConfig {
            did: "did:lune:00000000000000000000000000000000000000aa".into(),
            name: "Other".into(),
            website: "https://other.example".into(),
        },
        ..fast_config()
    })
    .unwrap();
    let result = stranger.verify_credential(&vc, None);
    assert!(result.is_valid);
    assert_eq!(
        result.check("Issuer Verification").unwrap().status,
        CheckStatus::Warning
    );

    // A partner that trusts the issuer with its registered key passes everything.
    let partner = CredentialService::in_memory(ServiceConfig {
        issuer: lune_core::IssuerConfig {
            did: "did:lune:00000000000000000000000000000000000000bb".into(),
            name: "Partner".into(),
            website: "https://partner.example".into(),
        },
        trusted_issuers: vec![TrustedIssuerConfig {
            did: issuing.issuer_did().to_string(),
            name: "Lune Skills Assessment".into(),
            website: "https://lune.careers".into(),
            public_key: Some(issuing.issuer_public_key().to_string()),
        }],
        ..fast_config()
    })
    .unwrap();
    let result = partner.verify_credential(&vc, Some(wallet.did.uri()));
    assert!(result.is_valid);
    assert!(result.checks.iter().all(|c| c.status == CheckStatus::Passed));
    assert!(result.issuer.unwrap().verified);
}

#[tokio::test]
async fn test_export_import_preserves_wallet() {
    let service = fast_service();
    let mut wallet = service.get_or_create_wallet("exporter").await.unwrap();
    service
        .issue_credential(&mut wallet, "Ex Porter", "React", 85, "Advanced")
        .await
        .unwrap();
    let vc = service
        .issue_credential(&mut wallet, "Ex Porter", "Node", 60, "Intermediate")
        .await
        .unwrap();
    service.revoke(&mut wallet, &vc.id).await.unwrap();

    let json = service.export_wallet(&wallet).unwrap();
    let imported = service.import_wallet(&json).expect("export should re-import");
    assert_eq!(imported, wallet);
    assert_eq!(imported.get(&vc.id).unwrap().status, CredentialStatus::Revoked);
    assert_eq!(imported.private_key.expose(), wallet.private_key.expose());

    // Structurally broken documents are rejected
    assert!(service.import_wallet("not json").is_none());
    assert!(service.import_wallet(r#"{"walletId": "w", "did": "did:lune:x"}"#).is_none());

    let mut doc: serde_json::Value = serde_json::from_str(&json).unwrap();
    doc["credentials"] = serde_json::json!("nope");
    assert!(service.import_wallet(&doc.to_string()).is_none());
}

#[tokio::test]
async fn test_explorer_url_follows_anchor_network() {
    let service = fast_service();
    let mut wallet = service.get_or_create_wallet("explorer").await.unwrap();
    let mut vc = service
        .issue_credential(&mut wallet, "Ex", "React", 85, "Advanced")
        .await
        .unwrap();
    let tx = vc.anchor.as_ref().unwrap().transaction_hash.clone();
    assert_eq!(
        service.explorer_url(&vc),
        format!("https://amoy.polygonscan.com/tx/{}", tx)
    );

    vc.anchor.as_mut().unwrap().network = "polygon".into();
    assert_eq!(
        service.explorer_url(&vc),
        format!("https://polygonscan.com/tx/{}", tx)
    );

    vc.anchor.as_mut().unwrap().network = "unknown-chain".into();
    assert_eq!(service.explorer_url(&vc), "#");

    vc.anchor = None;
    assert_eq!(service.explorer_url(&vc), "#");
}
