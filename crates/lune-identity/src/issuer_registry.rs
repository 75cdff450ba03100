use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use lune_core::types::Did;

/// Public information about a known issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerInfo {
    pub did: Did,
    pub name: String,
    pub website: String,
    /// Whether the platform has vetted this issuer.
    pub verified: bool,
    /// Encoded verification key. Authoritative over the key named in a proof.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

/// Trusted issuer DIDs -> issuer info.
///
/// Lookups never fail; an unknown issuer simply has no entry.
#[derive(Debug, Default)]
pub struct IssuerRegistry {
    issuers: DashMap<Did, IssuerInfo>,
}

impl IssuerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a trusted issuer.
    pub fn register(&self, info: IssuerInfo) {
        tracing::debug!(issuer = %info.did, name = %info.name, "trusted issuer registered");
        self.issuers.insert(info.did.clone(), info);
    }

    /// Remove a trusted issuer.
    pub fn remove(&self, did: &Did) -> bool {
        self.issuers.remove(did).is_some()
    }

    pub fn get(&self, did: &Did) -> Option<IssuerInfo> {
        self.issuers.get(did).map(|entry| entry.value().clone())
    }

    /// Check if an issuer is trusted.
    pub fn is_trusted(&self, did: &Did) -> bool {
        self.issuers.contains_key(did)
    }

    /// Registered verification key for `did`, if any.
    pub fn public_key(&self, did: &Did) -> Option<String> {
        self.issuers.get(did).and_then(|entry| entry.public_key.clone())
    }

    pub fn count(&self) -> usize {
        self.issuers.len()
    }

    /// All registered issuers, ordered by DID.
    pub fn list(&self) -> Vec<IssuerInfo> {
        let mut all: Vec<IssuerInfo> = self.issuers.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| a.did.cmp(&b.did));
        all
    }
}
