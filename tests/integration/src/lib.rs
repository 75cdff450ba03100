//! Fixtures shared by the cross-crate tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lune_core::{AnchorConfig, AnchorFallback, ServiceConfig};
use lune_credentials::{
    AnchorRequest, CredentialService, InMemoryPresentationRepository, InMemoryWalletRepository,
    Ledger, LedgerError,
};
use lune_crypto::{Ed25519Signer, KeyMaterial, Signer};
use lune_identity::Anchor;

/// Service config with a zero-latency simulated ledger.
pub fn fast_config() -> ServiceConfig {
    ServiceConfig {
        anchor: AnchorConfig {
            simulated_latency_ms: 0,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn fast_service() -> CredentialService {
    match CredentialService::in_memory(fast_config()) {
        Ok(service) => service,
        Err(e) => panic!("service setup failed: {}", e),
    }
}

/// A ledger that is down: every submission fails transiently.
#[derive(Debug, Default)]
pub struct UnavailableLedger {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl Ledger for UnavailableLedger {
    fn network(&self) -> &str {
        "polygon-amoy"
    }

    async fn submit(&self, _request: &AnchorRequest) -> Result<Anchor, LedgerError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(LedgerError::Transient("rpc endpoint unreachable".into()))
    }
}

/// Build a service on top of `ledger` with the given fallback policy.
pub fn service_with_ledger(
    ledger: Arc<dyn Ledger>,
    fallback: AnchorFallback,
) -> (CredentialService, KeyMaterial) {
    let mut config = fast_config();
    config.anchor.fallback = fallback;
    config.anchor.timeout_ms = 200;

    let signer = Arc::new(Ed25519Signer::new());
    let issuer_key = signer.generate_key();
    let service = CredentialService::new(
        config,
        issuer_key.clone(),
        signer,
        ledger,
        Arc::new(InMemoryWalletRepository::new()),
        Arc::new(InMemoryPresentationRepository::new()),
    );
    match service {
        Ok(service) => (service, issuer_key),
        Err(e) => panic!("service setup failed: {}", e),
    }
}
