use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use lune_core::AnchorConfig;
use lune_identity::{Anchor, IdentityError, VerifiableCredential};

use crate::error::LedgerError;

/// First block number handed out by [`SimulatedLedger`].
const SIMULATED_GENESIS_BLOCK: u64 = 50_000_000;

/// Record submitted to a ledger when a credential is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorRequest {
    pub credential_id: String,
    /// BLAKE3 hex of the credential's signing payload.
    pub payload_hash: String,
    pub contract_address: String,
}

impl AnchorRequest {
    pub fn for_credential(
        credential: &VerifiableCredential,
        contract_address: &str,
    ) -> Result<Self, IdentityError> {
        Ok(Self {
            credential_id: credential.id.clone(),
            payload_hash: lune_crypto::hash_hex(&credential.signing_payload()?),
            contract_address: contract_address.to_string(),
        })
    }

    /// Anchor that records the request was never published.
    pub fn local_anchor(&self) -> Anchor {
        Anchor {
            network: Anchor::LOCAL_NETWORK.to_string(),
            contract_address: String::new(),
            token_id: 0,
            transaction_hash: format!("local:{}", self.payload_hash),
            block_number: 0,
        }
    }
}

/// Ledger capability: publishes issuance records.
///
/// Implementations may take arbitrarily long; callers bound them with a timeout.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Network identifier written into anchors.
    fn network(&self) -> &str;

    /// Publish `request` and wait for confirmation.
    async fn submit(&self, request: &AnchorRequest) -> Result<Anchor, LedgerError>;
}

/// Stand-in for a chain: waits out a confirmation latency and hands back a
/// random transaction hash with increasing block numbers and token ids.
#[derive(Debug)]
pub struct SimulatedLedger {
    network: String,
    latency: Duration,
    next_token_id: AtomicU64,
    next_block: AtomicU64,
}

impl SimulatedLedger {
    pub fn new(network: impl Into<String>, latency: Duration) -> Self {
        Self {
            network: network.into(),
            latency,
            next_token_id: AtomicU64::new(1),
            next_block: AtomicU64::new(SIMULATED_GENESIS_BLOCK),
        }
    }

    pub fn from_config(config: &AnchorConfig) -> Self {
        Self::new(config.network.clone(), config.simulated_latency())
    }
}

#[async_trait]
impl Ledger for SimulatedLedger {
    fn network(&self) -> &str {
        &self.network
    }

    async fn submit(&self, request: &AnchorRequest) -> Result<Anchor, LedgerError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut tx = [0u8; 32];
        OsRng.fill_bytes(&mut tx);
        let anchor = Anchor {
            network: self.network.clone(),
            contract_address: request.contract_address.clone(),
            token_id: self.next_token_id.fetch_add(1, Ordering::SeqCst),
            transaction_hash: format!("0x{}", hex::encode(tx)),
            block_number: self.next_block.fetch_add(1, Ordering::SeqCst),
        };

        tracing::debug!(
            credential_id = %request.credential_id,
            network = %anchor.network,
            block = anchor.block_number,
            "issuance anchored"
        );
        Ok(anchor)
    }
}

/// Ledger for deployments without a chain. Every anchor is explicitly
/// `local-unanchored`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalLedger;

#[async_trait]
impl Ledger for LocalLedger {
    fn network(&self) -> &str {
        Anchor::LOCAL_NETWORK
    }

    async fn submit(&self, request: &AnchorRequest) -> Result<Anchor, LedgerError> {
        Ok(request.local_anchor())
    }
}

/// Human-viewable transaction URL for a credential's anchor.
///
/// Returns `"#"` for unknown networks, local anchors and unanchored credentials.
pub fn explorer_url(credential: &VerifiableCredential) -> String {
    let Some(anchor) = &credential.anchor else {
        return "#".to_string();
    };
    let base = match anchor.network.as_str() {
        "polygon" => "https://polygonscan.com",
        "polygon-amoy" => "https://amoy.polygonscan.com",
        "polygon-mumbai" => "https://mumbai.polygonscan.com",
        "ethereum" => "https://etherscan.io",
        "sepolia" => "https://sepolia.etherscan.io",
        _ => return "#".to_string(),
    };
    format!("{}/tx/{}", base, anchor.transaction_hash)
}
