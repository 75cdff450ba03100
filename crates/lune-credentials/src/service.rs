use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use lune_core::types::Did;
use lune_core::ServiceConfig;
use lune_crypto::{Ed25519Signer, KeyMaterial, Signer};
use lune_identity::{AchievementClaims, DidGenerator, IssuerInfo, IssuerRegistry, VerifiableCredential};

use crate::error::CredentialError;
use crate::issuer::CredentialIssuer;
use crate::ledger::{explorer_url, Ledger, SimulatedLedger};
use crate::locks::KeyedLocks;
use crate::manager::WalletManager;
use crate::presentation::{PresentationService, ShareablePresentation};
use crate::repository::{
    InMemoryPresentationRepository, InMemoryWalletRepository, PresentationRepository,
    WalletRepository,
};
use crate::revocation::RevocationManager;
use crate::verifier::{CredentialVerifier, VerificationResult};
use crate::wallet::{export_wallet, import_wallet, Wallet};

/// Entry point of the credential engine.
///
/// Owns the components and the seams they share: one signer, one ledger,
/// one pair of repositories and one set of per-wallet locks.
pub struct CredentialService {
    config: ServiceConfig,
    registry: Arc<IssuerRegistry>,
    wallets: Arc<dyn WalletRepository>,
    presentation_store: Arc<dyn PresentationRepository>,
    manager: WalletManager,
    issuer: CredentialIssuer,
    revocation: RevocationManager,
    verifier: CredentialVerifier,
    presentations: PresentationService,
}

impl CredentialService {
    /// Wire the engine. The configured issuer is registered as a verified
    /// trusted issuer under `issuer_key`.
    pub fn new(
        config: ServiceConfig,
        issuer_key: KeyMaterial,
        signer: Arc<dyn Signer>,
        ledger: Arc<dyn Ledger>,
        wallets: Arc<dyn WalletRepository>,
        presentation_store: Arc<dyn PresentationRepository>,
    ) -> Result<Self, CredentialError> {
        let issuer_did = Did::new(config.issuer.did.clone())?;
        let dids = DidGenerator::new(config.did_namespace.clone())?;

        let registry = Arc::new(IssuerRegistry::new());
        registry.register(IssuerInfo {
            did: issuer_did.clone(),
            name: config.issuer.name.clone(),
            website: config.issuer.website.clone(),
            verified: true,
            public_key: Some(issuer_key.public_key.clone()),
        });
        for trusted in &config.trusted_issuers {
            let did = Did::new(trusted.did.clone())?;
            if did == issuer_did {
                tracing::warn!(
                    issuer = %did,
                    "trusted issuer entry repeats the platform issuer, keeping the signing key"
                );
                continue;
            }
            registry.register(IssuerInfo {
                did,
                name: trusted.name.clone(),
                website: trusted.website.clone(),
                verified: true,
                public_key: trusted.public_key.clone(),
            });
        }

        let locks = Arc::new(KeyedLocks::new());
        let default_validity = match config.credential_validity_days {
            None => None,
            Some(days) => Some(Duration::try_days(i64::from(days)).ok_or_else(|| {
                CredentialError::InvalidRequest(format!(
                    "credential validity of {} days is out of range",
                    days
                ))
            })?),
        };

        tracing::info!(
            issuer = %issuer_did,
            network = %ledger.network(),
            trusted_issuers = registry.count(),
            "credential service initialised"
        );

        Ok(Self {
            manager: WalletManager::new(wallets.clone(), signer.clone(), dids),
            issuer: CredentialIssuer::new(
                issuer_did,
                issuer_key,
                signer.clone(),
                ledger,
                wallets.clone(),
                locks.clone(),
                config.anchor.clone(),
                default_validity,
            ),
            revocation: RevocationManager::new(wallets.clone(), locks),
            verifier: CredentialVerifier::new(wallets.clone(), registry.clone(), signer),
            presentations: PresentationService::new(
                wallets.clone(),
                presentation_store.clone(),
                config.presentation.clone(),
            ),
            config,
            registry,
            wallets,
            presentation_store,
        })
    }

    /// Ephemeral engine: in-memory repositories, simulated ledger, fresh
    /// Ed25519 issuer key.
    pub fn in_memory(config: ServiceConfig) -> Result<Self, CredentialError> {
        let signer = Arc::new(Ed25519Signer::new());
        let issuer_key = signer.generate_key();
        let ledger = Arc::new(SimulatedLedger::from_config(&config.anchor));
        Self::new(
            config,
            issuer_key,
            signer,
            ledger,
            Arc::new(InMemoryWalletRepository::new()),
            Arc::new(InMemoryPresentationRepository::new()),
        )
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn registry(&self) -> &IssuerRegistry {
        &self.registry
    }

    pub fn issuer_did(&self) -> &Did {
        self.issuer.did()
    }

    pub fn issuer_public_key(&self) -> &str {
        self.issuer.public_key()
    }

    pub async fn get_or_create_wallet(&self, owner_id: &str) -> Result<Wallet, CredentialError> {
        self.manager.get_or_create_wallet(owner_id).await
    }

    pub async fn find_wallet(&self, owner_id: &str) -> Result<Option<Wallet>, CredentialError> {
        self.manager.find_wallet(owner_id).await
    }

    /// Issue a skill certification from scoring output.
    pub async fn issue_credential(
        &self,
        wallet: &mut Wallet,
        subject_name: &str,
        skill: &str,
        score: u32,
        level: &str,
    ) -> Result<VerifiableCredential, CredentialError> {
        let claims = AchievementClaims::skill(skill, score, level)
            .map_err(|e| CredentialError::InvalidClaims(e.to_string()))?;
        self.issuer.issue(wallet, subject_name, claims).await
    }

    /// Issue any claim subtype.
    pub async fn issue(
        &self,
        wallet: &mut Wallet,
        subject_name: &str,
        claims: AchievementClaims,
    ) -> Result<VerifiableCredential, CredentialError> {
        self.issuer.issue(wallet, subject_name, claims).await
    }

    pub async fn issue_with_expiration(
        &self,
        wallet: &mut Wallet,
        subject_name: &str,
        claims: AchievementClaims,
        expiration: DateTime<Utc>,
    ) -> Result<VerifiableCredential, CredentialError> {
        self.issuer
            .issue_with_expiration(wallet, subject_name, claims, expiration)
            .await
    }

    pub async fn revoke(
        &self,
        wallet: &mut Wallet,
        credential_id: &str,
    ) -> Result<bool, CredentialError> {
        self.revocation.revoke(wallet, credential_id).await
    }

    pub async fn verify(
        &self,
        credential_id: &str,
        holder_did: Option<&str>,
    ) -> Result<VerificationResult, CredentialError> {
        self.verifier.verify(credential_id, holder_did).await
    }

    /// Resolve a credential through the index without running any checks.
    pub async fn find_credential(
        &self,
        credential_id: &str,
    ) -> Result<Option<VerifiableCredential>, CredentialError> {
        Ok(self
            .wallets
            .locate(credential_id)
            .await?
            .map(|location| location.credential))
    }

    /// Verify a credential that is not (or not necessarily) in the index,
    /// e.g. one embedded in a presentation.
    pub fn verify_credential(
        &self,
        credential: &VerifiableCredential,
        holder_did: Option<&str>,
    ) -> VerificationResult {
        self.verifier
            .verify_credential(credential, holder_did, Utc::now())
    }

    pub async fn create_presentation(
        &self,
        wallet: &Wallet,
        credential_ids: &[String],
        expires_in_hours: Option<u32>,
        require_access_code: bool,
    ) -> Result<ShareablePresentation, CredentialError> {
        self.presentations
            .create_presentation(wallet, credential_ids, expires_in_hours, require_access_code)
            .await
    }

    pub async fn get_presentation(
        &self,
        presentation_id: &str,
        access_code: Option<&str>,
    ) -> Result<Option<ShareablePresentation>, CredentialError> {
        self.presentations
            .get_presentation(presentation_id, access_code)
            .await
    }

    pub fn export_wallet(&self, wallet: &Wallet) -> Result<String, CredentialError> {
        export_wallet(wallet)
    }

    pub fn import_wallet(&self, json: &str) -> Option<Wallet> {
        import_wallet(json)
    }

    pub fn explorer_url(&self, credential: &VerifiableCredential) -> String {
        explorer_url(credential)
    }

    pub async fn wallet_count(&self) -> Result<usize, CredentialError> {
        Ok(self.wallets.wallet_count().await?)
    }

    pub async fn presentation_count(&self) -> Result<usize, CredentialError> {
        Ok(self.presentation_store.presentation_count().await?)
    }
}
