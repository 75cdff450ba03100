/// Identity-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid DID: {0}")]
    InvalidDid(#[from] lune_core::CoreError),

    #[error("invalid claims: {0}")]
    InvalidClaims(String),

    #[error("credential serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("credential signing failed: {0}")]
    CredentialSigning(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] lune_crypto::CryptoError),
}
