use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use lune_core::types::Did;
use lune_crypto::SecretKey;
use lune_identity::VerifiableCredential;

use crate::error::CredentialError;

/// Fields an imported wallet document must carry before it is parsed further.
const REQUIRED_IMPORT_FIELDS: [&str; 3] = ["walletId", "did", "credentials"];

/// A holder's credential wallet.
///
/// Owned by exactly one principal (`owner_id`). `did` never changes after
/// creation and credential ids are unique within the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub wallet_id: String,
    pub owner_id: String,
    pub did: Did,
    /// Encoded holder verification key.
    pub public_key: String,
    pub private_key: SecretKey,
    /// Insertion-ordered.
    pub credentials: Vec<VerifiableCredential>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Wallet {
    /// Get a credential by ID.
    pub fn get(&self, credential_id: &str) -> Option<&VerifiableCredential> {
        self.credentials.iter().find(|c| c.id == credential_id)
    }

    pub fn contains(&self, credential_id: &str) -> bool {
        self.get(credential_id).is_some()
    }

    /// List credentials by type.
    pub fn list_by_type(&self, credential_type: &str) -> Vec<&VerifiableCredential> {
        self.credentials
            .iter()
            .filter(|c| c.has_type(credential_type))
            .collect()
    }

    /// Credentials that are neither revoked nor expired at `now`.
    pub fn active_credentials(&self, now: DateTime<Utc>) -> Vec<&VerifiableCredential> {
        self.credentials
            .iter()
            .filter(|c| !c.is_revoked() && !c.is_expired_at(now))
            .collect()
    }

    /// Number of credentials in the wallet.
    pub fn count(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Parse and validate an exported wallet document.
    pub fn from_json(json: &str) -> Result<Self, CredentialError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| CredentialError::ImportValidation(format!("malformed JSON: {}", e)))?;

        for field in REQUIRED_IMPORT_FIELDS {
            if value.get(field).is_none() {
                return Err(CredentialError::ImportValidation(format!(
                    "missing required field '{}'",
                    field
                )));
            }
        }
        if !value["credentials"].is_array() {
            return Err(CredentialError::ImportValidation(
                "'credentials' must be an array".into(),
            ));
        }

        let wallet: Wallet = serde_json::from_value(value)
            .map_err(|e| CredentialError::ImportValidation(e.to_string()))?;
        wallet.validate()?;
        Ok(wallet)
    }

    fn validate(&self) -> Result<(), CredentialError> {
        if self.wallet_id.trim().is_empty() {
            return Err(CredentialError::ImportValidation("empty walletId".into()));
        }
        Did::new(self.did.uri())
            .map_err(|e| CredentialError::ImportValidation(e.to_string()))?;

        let mut seen = HashSet::new();
        for credential in &self.credentials {
            if !seen.insert(credential.id.as_str()) {
                return Err(CredentialError::ImportValidation(format!(
                    "duplicate credential id {}",
                    credential.id
                )));
            }
            if credential.holder() != &self.did {
                return Err(CredentialError::ImportValidation(format!(
                    "credential {} is not held by {}",
                    credential.id, self.did
                )));
            }
        }
        Ok(())
    }
}

/// Serialize a wallet to pretty-printed JSON.
pub fn export_wallet(wallet: &Wallet) -> Result<String, CredentialError> {
    Ok(serde_json::to_string_pretty(wallet)?)
}

/// Parse an exported wallet. Malformed or incomplete input yields `None`,
/// never a partially populated wallet.
pub fn import_wallet(json: &str) -> Option<Wallet> {
    match Wallet::from_json(json) {
        Ok(wallet) => Some(wallet),
        Err(e) => {
            tracing::debug!(error = %e, "wallet import rejected");
            None
        }
    }
}
