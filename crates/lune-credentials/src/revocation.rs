use chrono::Utc;
use std::sync::Arc;

use lune_core::{CredentialEvent, CredentialStateMachine};

use crate::error::CredentialError;
use crate::locks::KeyedLocks;
use crate::repository::WalletRepository;
use crate::wallet::Wallet;

/// Moves credentials to the terminal `revoked` state.
pub struct RevocationManager {
    wallets: Arc<dyn WalletRepository>,
    locks: Arc<KeyedLocks>,
}

impl RevocationManager {
    pub fn new(wallets: Arc<dyn WalletRepository>, locks: Arc<KeyedLocks>) -> Self {
        Self { wallets, locks }
    }

    /// Revoke `credential_id` within `wallet`.
    ///
    /// Returns `false` when the wallet does not hold the credential. Revoking
    /// twice is a no-op that still returns `true`.
    pub async fn revoke(
        &self,
        wallet: &mut Wallet,
        credential_id: &str,
    ) -> Result<bool, CredentialError> {
        let _guard = self.locks.acquire(&wallet.wallet_id).await;

        let Some(mut current) = self
            .wallets
            .get(&wallet.owner_id)
            .await?
            .filter(|stored| stored.wallet_id == wallet.wallet_id)
        else {
            tracing::debug!(wallet_id = %wallet.wallet_id, "revoke on unknown wallet");
            return Ok(false);
        };

        let Some(credential) = current
            .credentials
            .iter_mut()
            .find(|c| c.id == credential_id)
        else {
            *wallet = current;
            return Ok(false);
        };

        if credential.is_revoked() {
            *wallet = current;
            return Ok(true);
        }

        credential.status =
            CredentialStateMachine::transition(credential.status, CredentialEvent::Revoke)?;
        current.last_updated = Utc::now();
        self.wallets.put(&current).await?;
        *wallet = current;

        tracing::info!(
            wallet_id = %wallet.wallet_id,
            credential_id = %credential_id,
            "credential revoked"
        );
        Ok(true)
    }
}
