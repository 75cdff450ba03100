use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use lune_crypto::Signer;
use lune_identity::DidGenerator;

use crate::error::CredentialError;
use crate::repository::WalletRepository;
use crate::wallet::Wallet;

/// Identity manager: one DID-bearing wallet per owner.
pub struct WalletManager {
    wallets: Arc<dyn WalletRepository>,
    signer: Arc<dyn Signer>,
    dids: DidGenerator,
}

impl WalletManager {
    pub fn new(
        wallets: Arc<dyn WalletRepository>,
        signer: Arc<dyn Signer>,
        dids: DidGenerator,
    ) -> Self {
        Self {
            wallets,
            signer,
            dids,
        }
    }

    /// Return the owner's wallet, creating it on first access.
    ///
    /// Concurrent first calls for one owner agree on a single wallet.
    pub async fn get_or_create_wallet(&self, owner_id: &str) -> Result<Wallet, CredentialError> {
        if owner_id.trim().is_empty() {
            return Err(CredentialError::InvalidOwner("owner id must not be empty".into()));
        }

        if let Some(wallet) = self.wallets.get(owner_id).await? {
            return Ok(wallet);
        }

        let key = self.signer.generate_key();
        let now = Utc::now();
        let candidate = Wallet {
            wallet_id: Uuid::now_v7().to_string(),
            owner_id: owner_id.to_string(),
            did: self.dids.generate(),
            public_key: key.public_key,
            private_key: key.secret_key,
            credentials: Vec::new(),
            created_at: now,
            last_updated: now,
        };
        let candidate_id = candidate.wallet_id.clone();

        let wallet = self.wallets.insert_if_absent(candidate).await?;
        if wallet.wallet_id == candidate_id {
            tracing::info!(
                owner_id = %owner_id,
                wallet_id = %wallet.wallet_id,
                did = %wallet.did,
                "wallet created"
            );
        }
        Ok(wallet)
    }

    /// Load an existing wallet without creating one.
    pub async fn find_wallet(&self, owner_id: &str) -> Result<Option<Wallet>, CredentialError> {
        Ok(self.wallets.get(owner_id).await?)
    }
}
