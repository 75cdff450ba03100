//! Lune node: wires storage, ledger and issuer key into the credential engine.

use anyhow::Result;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use lune_credentials::{
    CredentialService, InMemoryPresentationRepository, InMemoryWalletRepository, Ledger,
    LocalLedger, PresentationRepository, SimulatedLedger, WalletRepository,
};
use lune_crypto::{Ed25519Signer, KeyMaterial, KeyPair, SecretKey, Signer};

use crate::api::start_api_server;
use crate::config::{LedgerMode, LuneConfig, StorageBackend};
use crate::state::AppState;
use crate::storage::RocksStore;

pub struct LuneNode {
    config: LuneConfig,
    state: Arc<AppState>,
}

impl LuneNode {
    pub fn new(config: LuneConfig) -> Result<Self> {
        let signer: Arc<dyn Signer> = Arc::new(Ed25519Signer::new());
        let issuer_key = match &config.identity.issuer_key_path {
            Some(path) => Self::load_or_generate_issuer_key(path)?,
            None => {
                tracing::warn!("no issuer_key_path configured, generating ephemeral issuer key");
                signer.generate_key()
            }
        };

        let ledger: Arc<dyn Ledger> = match config.ledger.mode {
            LedgerMode::Simulated => Arc::new(SimulatedLedger::from_config(&config.service.anchor)),
            LedgerMode::Local => Arc::new(LocalLedger),
        };
        let ledger_network = ledger.network().to_string();

        let (wallets, presentations): (Arc<dyn WalletRepository>, Arc<dyn PresentationRepository>) =
            match config.storage.backend {
                StorageBackend::Rocksdb => {
                    let store = Arc::new(RocksStore::open(&config.storage.data_dir)?);
                    let wallets: Arc<dyn WalletRepository> = store.clone();
                    let presentations: Arc<dyn PresentationRepository> = store;
                    (wallets, presentations)
                }
                StorageBackend::Memory => {
                    tracing::warn!("in-memory storage: wallets are lost on shutdown");
                    let wallets: Arc<dyn WalletRepository> =
                        Arc::new(InMemoryWalletRepository::new());
                    let presentations: Arc<dyn PresentationRepository> =
                        Arc::new(InMemoryPresentationRepository::new());
                    (wallets, presentations)
                }
            };

        let service = CredentialService::new(
            config.service.clone(),
            issuer_key,
            signer,
            ledger,
            wallets,
            presentations,
        )?;

        tracing::info!(
            issuer = %service.issuer_did(),
            network = %ledger_network,
            backend = ?config.storage.backend,
            "Lune node created"
        );

        Ok(Self {
            state: Arc::new(AppState::new(Arc::new(service), ledger_network)),
            config,
        })
    }

    pub fn config(&self) -> &LuneConfig {
        &self.config
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Serve the HTTP API until the listener fails.
    pub async fn run(&self) -> Result<()> {
        let addr: SocketAddr = self.config.api_addr().parse()?;
        start_api_server(addr, self.state.clone()).await
    }

    /// Load the hex issuer secret from `path`, or generate one and save it there.
    fn load_or_generate_issuer_key(path: &Path) -> Result<KeyMaterial> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let keypair = KeyPair::from_secret_key(&SecretKey::new(contents.trim()))
                .map_err(|e| anyhow::anyhow!("failed to decode issuer key: {}", e))?;
            tracing::info!(path = %path.display(), "loaded issuer key from disk");
            Ok(Ed25519Signer::key_material(&keypair))
        } else {
            let keypair = KeyPair::generate();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, keypair.secret_key().expose())?;
            tracing::info!(path = %path.display(), "generated and saved new issuer key");
            Ok(Ed25519Signer::key_material(&keypair))
        }
    }
}
