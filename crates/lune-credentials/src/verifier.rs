use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use lune_crypto::Signer;
use lune_identity::{IssuerInfo, IssuerRegistry, VerifiableCredential};

use crate::error::CredentialError;
use crate::repository::WalletRepository;

pub const CHECK_CREDENTIAL_EXISTS: &str = "Credential Exists";
pub const CHECK_ISSUER: &str = "Issuer Verification";
pub const CHECK_SIGNATURE: &str = "Signature Valid";
pub const CHECK_NOT_REVOKED: &str = "Not Revoked";
pub const CHECK_NOT_EXPIRED: &str = "Not Expired";
pub const CHECK_HOLDER: &str = "Holder Match";

/// Outcome of a single check. Only `Failed` invalidates a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Warning,
    Failed,
}

/// An individual verification check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCheck {
    pub name: String,
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl VerificationCheck {
    fn passed(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Passed,
            detail: None,
        }
    }

    fn with(name: &str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            detail: Some(detail.into()),
        }
    }

    /// `passed` when `ok`, otherwise `failed` with `detail`.
    fn pass_or_fail(name: &str, ok: bool, detail: impl FnOnce() -> String) -> Self {
        if ok {
            Self::passed(name)
        } else {
            Self::with(name, CheckStatus::Failed, detail())
        }
    }
}

/// Result of credential verification.
///
/// Always fully populated, including for invalid credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub is_valid: bool,
    /// Checks in their fixed evaluation order.
    pub checks: Vec<VerificationCheck>,
    /// Registry entry of the issuer; `None` if the issuer is unknown.
    pub issuer: Option<IssuerInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<VerifiableCredential>,
    pub timestamp: DateTime<Utc>,
}

impl VerificationResult {
    fn not_found(credential_id: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            is_valid: false,
            checks: vec![VerificationCheck::with(
                CHECK_CREDENTIAL_EXISTS,
                CheckStatus::Failed,
                format!("no credential with id {}", credential_id),
            )],
            issuer: None,
            credential: None,
            timestamp,
        }
    }

    /// Look up a check by name.
    pub fn check(&self, name: &str) -> Option<&VerificationCheck> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn failed_checks(&self) -> impl Iterator<Item = &VerificationCheck> {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Failed)
    }
}

/// Verifies credentials resolved through the credential index.
///
/// Read-only: never mutates credentials, wallets or the registry.
pub struct CredentialVerifier {
    wallets: Arc<dyn WalletRepository>,
    registry: Arc<IssuerRegistry>,
    signer: Arc<dyn Signer>,
}

impl CredentialVerifier {
    pub fn new(
        wallets: Arc<dyn WalletRepository>,
        registry: Arc<IssuerRegistry>,
        signer: Arc<dyn Signer>,
    ) -> Self {
        Self {
            wallets,
            registry,
            signer,
        }
    }

    /// Resolve `credential_id` and run every check.
    ///
    /// Only storage failures are errors; an unknown id yields a result with
    /// a single failed "Credential Exists" check.
    pub async fn verify(
        &self,
        credential_id: &str,
        claimed_holder: Option<&str>,
    ) -> Result<VerificationResult, CredentialError> {
        let now = Utc::now();
        let result = match self.wallets.locate(credential_id).await? {
            Some(location) => self.verify_credential(&location.credential, claimed_holder, now),
            None => VerificationResult::not_found(credential_id, now),
        };

        tracing::debug!(
            credential_id = %credential_id,
            valid = result.is_valid,
            failed = result.failed_checks().count(),
            "credential verified"
        );
        Ok(result)
    }

    /// Run the checks against a credential already in hand.
    pub fn verify_credential(
        &self,
        credential: &VerifiableCredential,
        claimed_holder: Option<&str>,
        now: DateTime<Utc>,
    ) -> VerificationResult {
        let issuer = self.registry.get(&credential.issuer);

        let issuer_check = match &issuer {
            Some(_) => VerificationCheck::passed(CHECK_ISSUER),
            None => VerificationCheck::with(
                CHECK_ISSUER,
                CheckStatus::Warning,
                format!("issuer {} is not in the trusted registry", credential.issuer),
            ),
        };

        let checks = vec![
            VerificationCheck::passed(CHECK_CREDENTIAL_EXISTS),
            issuer_check,
            self.signature_check(credential, issuer.as_ref()),
            VerificationCheck::pass_or_fail(CHECK_NOT_REVOKED, !credential.is_revoked(), || {
                "credential has been revoked".into()
            }),
            VerificationCheck::pass_or_fail(
                CHECK_NOT_EXPIRED,
                !credential.is_expired_at(now),
                || match credential.expiration_date {
                    Some(exp) => format!("credential expired at {}", exp.to_rfc3339()),
                    None => "credential has expired".into(),
                },
            ),
            Self::holder_check(credential, claimed_holder),
        ];

        let is_valid = !checks.iter().any(|c| c.status == CheckStatus::Failed);

        VerificationResult {
            is_valid,
            checks,
            issuer,
            credential: Some(credential.clone()),
            timestamp: now,
        }
    }

    /// The registry key is authoritative when present; otherwise fall back
    /// to the key embedded in the proof's verification method.
    fn signature_check(
        &self,
        credential: &VerifiableCredential,
        issuer: Option<&IssuerInfo>,
    ) -> VerificationCheck {
        let key = issuer
            .and_then(|info| info.public_key.as_deref())
            .or_else(|| credential.embedded_verification_key());

        match key {
            Some(key) => VerificationCheck::pass_or_fail(
                CHECK_SIGNATURE,
                credential.verify_proof(self.signer.as_ref(), key),
                || "proof does not match credential payload and issuer key".into(),
            ),
            None => VerificationCheck::with(
                CHECK_SIGNATURE,
                CheckStatus::Failed,
                "no verification key available for issuer",
            ),
        }
    }

    fn holder_check(credential: &VerifiableCredential, claimed: Option<&str>) -> VerificationCheck {
        match claimed {
            Some(claimed) => {
                VerificationCheck::pass_or_fail(CHECK_HOLDER, credential.holder() == claimed, || {
                    format!("credential is held by {}, not {}", credential.holder(), claimed)
                })
            }
            None => VerificationCheck::passed(CHECK_HOLDER),
        }
    }
}
