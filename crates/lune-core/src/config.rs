use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::DEFAULT_DID_NAMESPACE;

/// Configuration for the credential service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// The fixed issuer identity. Always trusted.
    #[serde(default)]
    pub issuer: IssuerConfig,
    /// Additional trusted issuers.
    #[serde(default)]
    pub trusted_issuers: Vec<TrustedIssuerConfig>,
    /// Namespace for generated wallet DIDs.
    #[serde(default = "default_namespace")]
    pub did_namespace: String,
    /// Ledger anchoring settings.
    #[serde(default)]
    pub anchor: AnchorConfig,
    /// Shareable presentation settings.
    #[serde(default)]
    pub presentation: PresentationConfig,
    /// Default validity period for issued credentials. `None` means no expiration.
    #[serde(default)]
    pub credential_validity_days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuerConfig {
    /// DID of the issuing platform.
    #[serde(default = "default_issuer_did")]
    pub did: String,
    /// Display name.
    #[serde(default = "default_issuer_name")]
    pub name: String,
    /// Public website.
    #[serde(default = "default_issuer_website")]
    pub website: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustedIssuerConfig {
    pub did: String,
    pub name: String,
    #[serde(default)]
    pub website: String,
    /// Base58 Ed25519 verification key, if known.
    #[serde(default)]
    pub public_key: Option<String>,
}

/// What to do when the ledger cannot be reached after retrying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorFallback {
    /// Abort issuance; the wallet stays unchanged.
    #[default]
    Fail,
    /// Issue with an explicit `local-unanchored` anchor.
    LocalOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorConfig {
    /// Ledger network identifier (e.g. "polygon-amoy").
    #[serde(default = "default_network")]
    pub network: String,
    /// Address of the credential registry contract.
    #[serde(default = "default_contract_address")]
    pub contract_address: String,
    /// Upper bound for a single ledger submission.
    #[serde(default = "default_anchor_timeout_ms")]
    pub timeout_ms: u64,
    /// Retries after a transient failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default)]
    pub fallback: AnchorFallback,
    /// Confirmation latency of the simulated ledger.
    #[serde(default = "default_simulated_latency_ms")]
    pub simulated_latency_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Base URL that presentation ids are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Length of generated access codes.
    #[serde(default = "default_access_code_length")]
    pub access_code_length: usize,
}

fn default_namespace() -> String {
    DEFAULT_DID_NAMESPACE.into()
}
fn default_issuer_did() -> String {
    "did:lune:4c756e6543726564656e7469616c497373756572".into()
}
fn default_issuer_name() -> String {
    "Lune Skills Assessment".into()
}
fn default_issuer_website() -> String {
    "https://lune.careers".into()
}
fn default_network() -> String {
    "polygon-amoy".into()
}
fn default_contract_address() -> String {
    "0x5fbdb2315678afecb367f032d93f642f64180aa3".into()
}
fn default_anchor_timeout_ms() -> u64 {
    5_000
}
fn default_max_retries() -> u32 {
    1
}
fn default_simulated_latency_ms() -> u64 {
    500
}
fn default_base_url() -> String {
    "https://lune.careers/verify".into()
}
fn default_access_code_length() -> usize {
    6
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            issuer: IssuerConfig::default(),
            trusted_issuers: Vec::new(),
            did_namespace: default_namespace(),
            anchor: AnchorConfig::default(),
            presentation: PresentationConfig::default(),
            credential_validity_days: None,
        }
    }
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            did: default_issuer_did(),
            name: default_issuer_name(),
            website: default_issuer_website(),
        }
    }
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            contract_address: default_contract_address(),
            timeout_ms: default_anchor_timeout_ms(),
            max_retries: default_max_retries(),
            fallback: AnchorFallback::default(),
            simulated_latency_ms: default_simulated_latency_ms(),
        }
    }
}

impl AnchorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_code_length: default_access_code_length(),
        }
    }
}
