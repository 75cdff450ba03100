//! RocksDB storage backend for the Lune node.

use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use tokio::sync::Mutex;

use lune_credentials::{
    CredentialLocation, PresentationRepository, ShareablePresentation, StoreError, Wallet,
    WalletRepository,
};

/// Column family names for different data types.
const CF_WALLETS: &str = "wallets";
const CF_CREDENTIAL_INDEX: &str = "credential_index";
const CF_PRESENTATIONS: &str = "presentations";

/// RocksDB-backed wallet and presentation storage.
///
/// Wallets are keyed by owner id. The credential index maps credential id to
/// owner id and is written in the same batch as the wallet.
pub struct RocksStore {
    db: DB,
    /// Serializes the check-then-insert of wallet creation.
    create_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a RocksDB database at the given path with column families.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_WALLETS, Options::default()),
            ColumnFamilyDescriptor::new(CF_CREDENTIAL_INDEX, Options::default()),
            ColumnFamilyDescriptor::new(CF_PRESENTATIONS, Options::default()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;
        tracing::info!(path = %path.display(), "storage opened");

        Ok(Self {
            db,
            create_lock: Mutex::new(()),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily, StoreError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Backend(format!("column family '{}' not found", name)))
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &str,
    ) -> Result<Option<T>, StoreError> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, key.as_bytes()).map_err(backend)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write_wallet(&self, wallet: &Wallet) -> Result<(), StoreError> {
        let wallets = self.cf(CF_WALLETS)?;
        let index = self.cf(CF_CREDENTIAL_INDEX)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(wallets, wallet.owner_id.as_bytes(), serde_json::to_vec(wallet)?);
        for credential in &wallet.credentials {
            batch.put_cf(index, credential.id.as_bytes(), wallet.owner_id.as_bytes());
        }
        self.db.write(batch).map_err(backend)?;

        tracing::debug!(
            wallet_id = %wallet.wallet_id,
            credentials = wallet.credentials.len(),
            "wallet persisted"
        );
        Ok(())
    }

    fn count(&self, cf_name: &str) -> Result<usize, StoreError> {
        let cf = self.cf(cf_name)?;
        let mut n = 0;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            item.map_err(backend)?;
            n += 1;
        }
        Ok(n)
    }
}

fn backend(e: rocksdb::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[async_trait]
impl WalletRepository for RocksStore {
    async fn get(&self, owner_id: &str) -> Result<Option<Wallet>, StoreError> {
        self.get_json(CF_WALLETS, owner_id)
    }

    async fn insert_if_absent(&self, wallet: Wallet) -> Result<Wallet, StoreError> {
        let _guard = self.create_lock.lock().await;
        if let Some(existing) = self.get_json::<Wallet>(CF_WALLETS, &wallet.owner_id)? {
            return Ok(existing);
        }
        self.write_wallet(&wallet)?;
        Ok(wallet)
    }

    async fn put(&self, wallet: &Wallet) -> Result<(), StoreError> {
        self.write_wallet(wallet)
    }

    async fn locate(&self, credential_id: &str) -> Result<Option<CredentialLocation>, StoreError> {
        let index = self.cf(CF_CREDENTIAL_INDEX)?;
        let Some(owner) = self
            .db
            .get_cf(index, credential_id.as_bytes())
            .map_err(backend)?
        else {
            return Ok(None);
        };
        let owner_id = String::from_utf8(owner)
            .map_err(|e| StoreError::Serialization(format!("corrupt index entry: {}", e)))?;

        let Some(wallet) = self.get_json::<Wallet>(CF_WALLETS, &owner_id)? else {
            return Ok(None);
        };
        Ok(wallet.get(credential_id).map(|credential| CredentialLocation {
            owner_id: wallet.owner_id.clone(),
            wallet_id: wallet.wallet_id.clone(),
            credential: credential.clone(),
        }))
    }

    async fn wallet_count(&self) -> Result<usize, StoreError> {
        self.count(CF_WALLETS)
    }
}

#[async_trait]
impl PresentationRepository for RocksStore {
    async fn get(&self, id: &str) -> Result<Option<ShareablePresentation>, StoreError> {
        self.get_json(CF_PRESENTATIONS, id)
    }

    async fn put(&self, presentation: &ShareablePresentation) -> Result<(), StoreError> {
        let cf = self.cf(CF_PRESENTATIONS)?;
        self.db
            .put_cf(cf, presentation.id.as_bytes(), serde_json::to_vec(presentation)?)
            .map_err(backend)
    }

    async fn presentation_count(&self) -> Result<usize, StoreError> {
        self.count(CF_PRESENTATIONS)
    }
}
