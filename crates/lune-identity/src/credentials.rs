use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lune_core::types::{Did, SkillLevel};
use lune_core::CredentialStatus;
use lune_crypto::{KeyMaterial, Signer};

use crate::error::IdentityError;

/// Base entry of every credential's `type` list.
pub const BASE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

const PROOF_PURPOSE: &str = "assertionMethod";
const MAX_SCORE: u8 = 100;

/// A W3C-inspired Verifiable Credential for the Lune skills wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    /// Unique credential identifier (`urn:uuid:<v7>`).
    pub id: String,
    /// `["VerifiableCredential", <subtype>]`.
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,
    /// DID of the issuer.
    pub issuer: Did,
    pub issuance_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    pub credential_subject: CredentialSubject,
    /// Signature over [`signing_payload`](Self::signing_payload).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<CredentialProof>,
    /// Stored status. Expiry is derived, see [`effective_status`](Self::effective_status).
    #[serde(default)]
    pub status: CredentialStatus,
    /// Where issuance was published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
}

/// The holder and the achievement being attested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSubject {
    /// Holder DID.
    pub id: Did,
    pub name: String,
    #[serde(flatten)]
    pub achievement: AchievementClaims,
}

/// Typed claims, one variant per credential subtype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "achievementType")]
pub enum AchievementClaims {
    SkillCertification {
        skill: String,
        score: u8,
        level: SkillLevel,
    },
    AssessmentCompletion {
        assessment: String,
        score: u8,
        passed: bool,
    },
}

impl AchievementClaims {
    /// Build skill claims from raw scoring output.
    pub fn skill(skill: impl Into<String>, score: u32, level: &str) -> Result<Self, IdentityError> {
        let level = level
            .parse::<SkillLevel>()
            .map_err(|e| IdentityError::InvalidClaims(e.to_string()))?;
        let claims = Self::SkillCertification {
            skill: skill.into(),
            score: checked_score(score)?,
            level,
        };
        claims.validate()?;
        Ok(claims)
    }

    /// The subtype appended to the credential's `type`.
    pub fn credential_type(&self) -> &'static str {
        match self {
            Self::SkillCertification { .. } => "SkillCertification",
            Self::AssessmentCompletion { .. } => "AssessmentCompletion",
        }
    }

    pub fn score(&self) -> u8 {
        match self {
            Self::SkillCertification { score, .. } | Self::AssessmentCompletion { score, .. } => {
                *score
            }
        }
    }

    /// Name of the skill or assessment.
    pub fn title(&self) -> &str {
        match self {
            Self::SkillCertification { skill, .. } => skill,
            Self::AssessmentCompletion { assessment, .. } => assessment,
        }
    }

    pub fn validate(&self) -> Result<(), IdentityError> {
        if self.title().trim().is_empty() {
            return Err(IdentityError::InvalidClaims(format!(
                "{} requires a non-empty name",
                self.credential_type()
            )));
        }
        checked_score(u32::from(self.score()))?;
        Ok(())
    }
}

fn checked_score(score: u32) -> Result<u8, IdentityError> {
    u8::try_from(score)
        .ok()
        .filter(|s| *s <= MAX_SCORE)
        .ok_or_else(|| {
            IdentityError::InvalidClaims(format!("score must be 0-{}, got {}", MAX_SCORE, score))
        })
}

/// Proof attached to a verifiable credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialProof {
    #[serde(rename = "type")]
    pub proof_type: String,
    pub created: DateTime<Utc>,
    /// `<issuer DID>#<encoded public key>`.
    pub verification_method: String,
    pub proof_purpose: String,
    pub proof_value: String,
}

/// Record of where a credential's issuance was published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub network: String,
    pub contract_address: String,
    pub token_id: u64,
    pub transaction_hash: String,
    pub block_number: u64,
}

impl Anchor {
    /// Network name of anchors that never reached a ledger.
    pub const LOCAL_NETWORK: &'static str = "local-unanchored";

    /// Whether this anchor references a real ledger transaction.
    pub fn is_anchored(&self) -> bool {
        self.network != Self::LOCAL_NETWORK
    }
}

impl VerifiableCredential {
    /// Create a new unsigned, unanchored credential.
    pub fn new(issuer: Did, holder: Did, name: impl Into<String>, claims: AchievementClaims) -> Self {
        Self {
            id: format!("urn:uuid:{}", Uuid::now_v7()),
            credential_type: vec![
                BASE_CREDENTIAL_TYPE.to_string(),
                claims.credential_type().to_string(),
            ],
            issuer,
            issuance_date: Utc::now(),
            expiration_date: None,
            credential_subject: CredentialSubject {
                id: holder,
                name: name.into(),
                achievement: claims,
            },
            proof: None,
            status: CredentialStatus::Active,
            anchor: None,
        }
    }

    /// Set the expiration date.
    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration_date = Some(expiration);
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Compute the canonical signing payload for this credential.
    ///
    /// Deterministic JSON over everything except proof, status and anchor,
    /// so revocation and anchoring never invalidate the signature.
    pub fn signing_payload(&self) -> Result<Vec<u8>, IdentityError> {
        let canonical = serde_json::json!({
            "id": self.id,
            "type": self.credential_type,
            "issuer": self.issuer,
            "issuanceDate": self.issuance_date.to_rfc3339(),
            "expirationDate": self.expiration_date.map(|d| d.to_rfc3339()),
            "credentialSubject": self.credential_subject,
        });
        Ok(serde_json::to_vec(&canonical)?)
    }

    /// Sign this credential with the issuer's key.
    pub fn sign(mut self, signer: &dyn Signer, key: &KeyMaterial) -> Result<Self, IdentityError> {
        let payload = self.signing_payload()?;
        let proof_value = signer
            .sign(&payload, &key.secret_key)
            .map_err(|e| IdentityError::CredentialSigning(e.to_string()))?;

        self.proof = Some(CredentialProof {
            proof_type: signer.proof_type().to_string(),
            created: Utc::now(),
            verification_method: format!("{}#{}", self.issuer, key.public_key),
            proof_purpose: PROOF_PURPOSE.to_string(),
            proof_value,
        });
        Ok(self)
    }

    /// Check the proof against `public_key`. Unsigned credentials never verify.
    pub fn verify_proof(&self, signer: &dyn Signer, public_key: &str) -> bool {
        let Some(proof) = &self.proof else {
            return false;
        };
        match self.signing_payload() {
            Ok(payload) => signer.verify(&payload, &proof.proof_value, public_key),
            Err(e) => {
                tracing::debug!(credential_id = %self.id, error = %e, "credential payload unavailable");
                false
            }
        }
    }

    /// Key fragment of the proof's verification method, if it names this issuer.
    pub fn embedded_verification_key(&self) -> Option<&str> {
        let proof = self.proof.as_ref()?;
        let (did, key) = proof.verification_method.split_once('#')?;
        (did == self.issuer.uri() && !key.is_empty()).then_some(key)
    }

    pub fn holder(&self) -> &Did {
        &self.credential_subject.id
    }

    /// Whether `credential_type` contains `ty`.
    pub fn has_type(&self, ty: &str) -> bool {
        self.credential_type.iter().any(|t| t == ty)
    }

    pub fn is_signed(&self) -> bool {
        self.proof.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date.map(|exp| now > exp).unwrap_or(false)
    }

    /// Check if the credential has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_revoked(&self) -> bool {
        self.status == CredentialStatus::Revoked
    }

    /// Status as seen at `now`: stored status, with expiry derived from the date.
    pub fn effective_status(&self, now: DateTime<Utc>) -> CredentialStatus {
        self.status.effective(self.is_expired_at(now))
    }
}
