use lune_core::types::Did;
use lune_core::CoreError;
use lune_crypto::random_fingerprint;

/// Mints wallet DIDs of the form `did:<namespace>:<40 hex>`.
///
/// The fingerprint comes from OS entropy, never from caller input.
#[derive(Debug, Clone)]
pub struct DidGenerator {
    namespace: String,
}

impl DidGenerator {
    pub fn new(namespace: impl Into<String>) -> Result<Self, CoreError> {
        let namespace = namespace.into();
        if namespace.is_empty() || !namespace.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidDid(format!(
                "namespace must be non-empty and alphanumeric, got: {}",
                namespace
            )));
        }
        Ok(Self { namespace })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Generate a fresh DID.
    pub fn generate(&self) -> Did {
        let did = Did::from_parts(&self.namespace, &random_fingerprint());
        tracing::debug!(did = %did, "DID generated");
        did
    }
}
