use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use lune_identity::VerifiableCredential;

use crate::error::StoreError;
use crate::presentation::ShareablePresentation;
use crate::wallet::Wallet;

/// Where an indexed credential lives, with the stored copy of it.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialLocation {
    pub owner_id: String,
    pub wallet_id: String,
    pub credential: VerifiableCredential,
}

/// Persistent wallet storage plus the credential-id index.
///
/// `put` writes the wallet and the index entries of all its credentials as
/// one atomic unit, so `locate` never sees an index entry without its wallet.
#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Load the wallet of `owner_id`.
    async fn get(&self, owner_id: &str) -> Result<Option<Wallet>, StoreError>;

    /// Store `wallet` unless its owner already has one. Returns the stored wallet.
    async fn insert_if_absent(&self, wallet: Wallet) -> Result<Wallet, StoreError>;

    /// Overwrite the owner's wallet and index its credentials.
    async fn put(&self, wallet: &Wallet) -> Result<(), StoreError>;

    /// Resolve a credential through the index.
    async fn locate(&self, credential_id: &str) -> Result<Option<CredentialLocation>, StoreError>;

    /// Number of stored wallets.
    async fn wallet_count(&self) -> Result<usize, StoreError>;
}

/// Persistent storage of shareable presentations, keyed by presentation id.
#[async_trait]
pub trait PresentationRepository: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<ShareablePresentation>, StoreError>;

    async fn put(&self, presentation: &ShareablePresentation) -> Result<(), StoreError>;

    async fn presentation_count(&self) -> Result<usize, StoreError>;
}

#[derive(Default)]
struct WalletTables {
    /// Owner id -> wallet.
    wallets: HashMap<String, Wallet>,
    /// Credential id -> owner id.
    credential_index: HashMap<String, String>,
}

/// In-memory wallet repository for tests and ephemeral nodes.
#[derive(Clone, Default)]
pub struct InMemoryWalletRepository {
    tables: Arc<RwLock<WalletTables>>,
}

impl InMemoryWalletRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WalletRepository for InMemoryWalletRepository {
    async fn get(&self, owner_id: &str) -> Result<Option<Wallet>, StoreError> {
        Ok(self.tables.read().await.wallets.get(owner_id).cloned())
    }

    async fn insert_if_absent(&self, wallet: Wallet) -> Result<Wallet, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.wallets.get(&wallet.owner_id) {
            return Ok(existing.clone());
        }
        for credential in &wallet.credentials {
            tables
                .credential_index
                .insert(credential.id.clone(), wallet.owner_id.clone());
        }
        tables.wallets.insert(wallet.owner_id.clone(), wallet.clone());
        Ok(wallet)
    }

    async fn put(&self, wallet: &Wallet) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        for credential in &wallet.credentials {
            tables
                .credential_index
                .insert(credential.id.clone(), wallet.owner_id.clone());
        }
        tables.wallets.insert(wallet.owner_id.clone(), wallet.clone());
        tracing::debug!(
            wallet_id = %wallet.wallet_id,
            credentials = wallet.credentials.len(),
            "wallet stored"
        );
        Ok(())
    }

    async fn locate(&self, credential_id: &str) -> Result<Option<CredentialLocation>, StoreError> {
        let tables = self.tables.read().await;
        let location = tables
            .credential_index
            .get(credential_id)
            .and_then(|owner_id| tables.wallets.get(owner_id))
            .and_then(|wallet| {
                wallet.get(credential_id).map(|credential| CredentialLocation {
                    owner_id: wallet.owner_id.clone(),
                    wallet_id: wallet.wallet_id.clone(),
                    credential: credential.clone(),
                })
            });
        Ok(location)
    }

    async fn wallet_count(&self) -> Result<usize, StoreError> {
        Ok(self.tables.read().await.wallets.len())
    }
}

/// In-memory presentation repository.
#[derive(Clone, Default)]
pub struct InMemoryPresentationRepository {
    presentations: Arc<DashMap<String, ShareablePresentation>>,
}

impl InMemoryPresentationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresentationRepository for InMemoryPresentationRepository {
    async fn get(&self, id: &str) -> Result<Option<ShareablePresentation>, StoreError> {
        Ok(self.presentations.get(id).map(|p| p.value().clone()))
    }

    async fn put(&self, presentation: &ShareablePresentation) -> Result<(), StoreError> {
        self.presentations
            .insert(presentation.id.clone(), presentation.clone());
        Ok(())
    }

    async fn presentation_count(&self) -> Result<usize, StoreError> {
        Ok(self.presentations.len())
    }
}
