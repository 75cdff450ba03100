use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use lune_core::types::Did;
use lune_core::PresentationConfig;
use lune_identity::VerifiableCredential;

use crate::error::CredentialError;
use crate::locks::KeyedLocks;
use crate::repository::{PresentationRepository, WalletRepository};
use crate::wallet::Wallet;

const ACCESS_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A shareable snapshot of selected credentials.
///
/// `credentials` is fixed at creation; later revocations in the source
/// wallet are not reflected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareablePresentation {
    pub id: String,
    pub holder: Did,
    pub credentials: Vec<VerifiableCredential>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub access_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_code: Option<String>,
    pub views: u64,
}

impl ShareablePresentation {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| now > exp).unwrap_or(false)
    }

    /// Whether `supplied` unlocks this presentation.
    pub fn accepts(&self, supplied: Option<&str>) -> bool {
        match (&self.access_code, supplied) {
            (None, _) => true,
            (Some(code), Some(supplied)) => code.eq_ignore_ascii_case(supplied.trim()),
            (Some(_), None) => false,
        }
    }
}

/// Creates and resolves shareable presentations.
pub struct PresentationService {
    wallets: Arc<dyn WalletRepository>,
    presentations: Arc<dyn PresentationRepository>,
    locks: KeyedLocks,
    config: PresentationConfig,
}

impl PresentationService {
    pub fn new(
        wallets: Arc<dyn WalletRepository>,
        presentations: Arc<dyn PresentationRepository>,
        config: PresentationConfig,
    ) -> Self {
        Self {
            wallets,
            presentations,
            locks: KeyedLocks::new(),
            config,
        }
    }

    /// Snapshot the requested credentials of `wallet` into a new presentation.
    ///
    /// Ids the wallet does not hold are dropped. Credentials keep wallet order.
    pub async fn create_presentation(
        &self,
        wallet: &Wallet,
        credential_ids: &[String],
        expires_in_hours: Option<u32>,
        require_access_code: bool,
    ) -> Result<ShareablePresentation, CredentialError> {
        let stored = self
            .wallets
            .get(&wallet.owner_id)
            .await?
            .filter(|stored| stored.wallet_id == wallet.wallet_id)
            .ok_or_else(|| CredentialError::WalletNotFound(wallet.wallet_id.clone()))?;

        let credentials: Vec<VerifiableCredential> = stored
            .credentials
            .iter()
            .filter(|c| credential_ids.contains(&c.id))
            .cloned()
            .collect();

        let dropped = credential_ids
            .iter()
            .filter(|id| !stored.contains(id))
            .count();
        if dropped > 0 {
            tracing::warn!(
                wallet_id = %stored.wallet_id,
                dropped,
                "presentation request named credentials outside the wallet"
            );
        }

        let now = Utc::now();
        let expires_at = match expires_in_hours {
            None => None,
            Some(hours) => Some(
                Duration::try_hours(i64::from(hours))
                    .and_then(|ttl| now.checked_add_signed(ttl))
                    .ok_or_else(|| {
                        CredentialError::InvalidRequest(format!(
                            "presentation expiry of {} hours is out of range",
                            hours
                        ))
                    })?,
            ),
        };
        let id = Uuid::now_v7().to_string();
        let presentation = ShareablePresentation {
            access_url: format!("{}/{}", self.config.base_url.trim_end_matches('/'), id),
            id,
            holder: stored.did.clone(),
            credentials,
            created_at: now,
            expires_at,
            access_code: require_access_code
                .then(|| generate_access_code(self.config.access_code_length)),
            views: 0,
        };
        self.presentations.put(&presentation).await?;

        tracing::info!(
            presentation_id = %presentation.id,
            wallet_id = %stored.wallet_id,
            credentials = presentation.credentials.len(),
            expires_at = ?presentation.expires_at,
            protected = presentation.access_code.is_some(),
            "presentation created"
        );
        Ok(presentation)
    }

    /// Resolve a presentation and count the view.
    ///
    /// Unknown, expired and locked-without-the-right-code presentations all
    /// come back as `None`.
    pub async fn get_presentation(
        &self,
        id: &str,
        access_code: Option<&str>,
    ) -> Result<Option<ShareablePresentation>, CredentialError> {
        if self.presentations.get(id).await?.is_none() {
            return Ok(None);
        }

        let _guard = self.locks.acquire(id).await;
        let Some(mut presentation) = self.presentations.get(id).await? else {
            return Ok(None);
        };
        if presentation.is_expired_at(Utc::now()) {
            tracing::debug!(presentation_id = %id, "presentation expired");
            return Ok(None);
        }
        if !presentation.accepts(access_code) {
            tracing::debug!(presentation_id = %id, "presentation access code rejected");
            return Ok(None);
        }

        presentation.views += 1;
        self.presentations.put(&presentation).await?;
        Ok(Some(presentation))
    }
}

/// Random code over `A-Z0-9`.
pub fn generate_access_code(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| ACCESS_CODE_CHARSET[rng.gen_range(0..ACCESS_CODE_CHARSET.len())] as char)
        .collect()
}
