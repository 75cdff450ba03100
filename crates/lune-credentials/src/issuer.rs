use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use lune_core::types::Did;
use lune_core::{AnchorConfig, AnchorFallback};
use lune_crypto::{KeyMaterial, Signer};
use lune_identity::{AchievementClaims, Anchor, VerifiableCredential};

use crate::error::{CredentialError, LedgerError};
use crate::ledger::{AnchorRequest, Ledger};
use crate::locks::KeyedLocks;
use crate::repository::WalletRepository;
use crate::wallet::Wallet;

/// Issues credentials signed by the platform issuer key and anchored on the ledger.
pub struct CredentialIssuer {
    did: Did,
    key: KeyMaterial,
    signer: Arc<dyn Signer>,
    ledger: Arc<dyn Ledger>,
    wallets: Arc<dyn WalletRepository>,
    locks: Arc<KeyedLocks>,
    anchor: AnchorConfig,
    default_validity: Option<Duration>,
}

impl CredentialIssuer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        did: Did,
        key: KeyMaterial,
        signer: Arc<dyn Signer>,
        ledger: Arc<dyn Ledger>,
        wallets: Arc<dyn WalletRepository>,
        locks: Arc<KeyedLocks>,
        anchor: AnchorConfig,
        default_validity: Option<Duration>,
    ) -> Self {
        Self {
            did,
            key,
            signer,
            ledger,
            wallets,
            locks,
            anchor,
            default_validity,
        }
    }

    /// Get the issuer's DID.
    pub fn did(&self) -> &Did {
        &self.did
    }

    pub fn public_key(&self) -> &str {
        &self.key.public_key
    }

    /// Issue a credential using the configured default validity, if any.
    pub async fn issue(
        &self,
        wallet: &mut Wallet,
        subject_name: &str,
        claims: AchievementClaims,
    ) -> Result<VerifiableCredential, CredentialError> {
        let expiration = match self.default_validity {
            None => None,
            Some(validity) => Some(Utc::now().checked_add_signed(validity).ok_or_else(|| {
                CredentialError::InvalidRequest(format!(
                    "credential validity of {} days is out of range",
                    validity.num_days()
                ))
            })?),
        };
        self.issue_inner(wallet, subject_name, claims, expiration)
            .await
    }

    /// Issue a credential with a specific expiration date.
    pub async fn issue_with_expiration(
        &self,
        wallet: &mut Wallet,
        subject_name: &str,
        claims: AchievementClaims,
        expiration: DateTime<Utc>,
    ) -> Result<VerifiableCredential, CredentialError> {
        self.issue_inner(wallet, subject_name, claims, Some(expiration))
            .await
    }

    /// Sign, anchor, then append under the wallet lock.
    ///
    /// Any failure before the final write leaves the stored wallet and the
    /// caller's copy untouched.
    async fn issue_inner(
        &self,
        wallet: &mut Wallet,
        subject_name: &str,
        claims: AchievementClaims,
        expiration: Option<DateTime<Utc>>,
    ) -> Result<VerifiableCredential, CredentialError> {
        claims
            .validate()
            .map_err(|e| CredentialError::InvalidClaims(e.to_string()))?;

        // The holder DID is immutable, so the credential can be built and
        // anchored before taking the lock.
        let holder = self.stored_wallet(wallet).await?.did;

        let mut credential =
            VerifiableCredential::new(self.did.clone(), holder, subject_name, claims);
        if let Some(expiration) = expiration {
            credential = credential.with_expiration(expiration);
        }
        let credential = credential
            .sign(self.signer.as_ref(), &self.key)
            .map_err(|e| CredentialError::IssuanceFailed(e.to_string()))?;

        let anchor = self.anchor(&credential).await?;
        let credential = credential.with_anchor(anchor);

        let _guard = self.locks.acquire(&wallet.wallet_id).await;
        let mut current = self.stored_wallet(wallet).await?;
        current.credentials.push(credential.clone());
        current.last_updated = Utc::now();
        self.wallets.put(&current).await?;
        *wallet = current;

        tracing::info!(
            wallet_id = %wallet.wallet_id,
            credential_id = %credential.id,
            credential_type = %credential.credential_subject.achievement.credential_type(),
            network = %credential.anchor.as_ref().map(|a| a.network.as_str()).unwrap_or_default(),
            "credential issued"
        );

        Ok(credential)
    }

    /// Authoritative copy of the caller's wallet.
    async fn stored_wallet(&self, wallet: &Wallet) -> Result<Wallet, CredentialError> {
        self.wallets
            .get(&wallet.owner_id)
            .await?
            .filter(|stored| stored.wallet_id == wallet.wallet_id)
            .ok_or_else(|| CredentialError::WalletNotFound(wallet.wallet_id.clone()))
    }

    /// Submit to the ledger with a bounded timeout and limited retries.
    async fn anchor(&self, credential: &VerifiableCredential) -> Result<Anchor, CredentialError> {
        let request = AnchorRequest::for_credential(credential, &self.anchor.contract_address)?;
        let attempts = self.anchor.max_retries.saturating_add(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match tokio::time::timeout(self.anchor.timeout(), self.ledger.submit(&request)).await {
                Ok(Ok(anchor)) => return Ok(anchor),
                Ok(Err(LedgerError::Rejected(reason))) => {
                    return Err(CredentialError::IssuanceFailed(format!(
                        "ledger rejected credential {}: {}",
                        credential.id, reason
                    )));
                }
                Ok(Err(LedgerError::Transient(reason))) => {
                    tracing::warn!(
                        credential_id = %credential.id,
                        attempt,
                        attempts,
                        error = %reason,
                        "ledger submission failed"
                    );
                    last_error = reason;
                }
                Err(_) => {
                    tracing::warn!(
                        credential_id = %credential.id,
                        attempt,
                        attempts,
                        timeout_ms = self.anchor.timeout_ms,
                        "ledger submission timed out"
                    );
                    last_error = format!("timed out after {}ms", self.anchor.timeout_ms);
                }
            }
        }

        match self.anchor.fallback {
            AnchorFallback::LocalOnly => {
                tracing::warn!(
                    credential_id = %credential.id,
                    error = %last_error,
                    "ledger unavailable, issuing with local-unanchored anchor"
                );
                Ok(request.local_anchor())
            }
            AnchorFallback::Fail => Err(CredentialError::IssuanceFailed(format!(
                "ledger unavailable after {} attempts: {}",
                attempts, last_error
            ))),
        }
    }
}
