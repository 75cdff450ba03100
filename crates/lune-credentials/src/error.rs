/// Credential engine errors.
///
/// Expected absence (unknown credential, expired presentation) is reported
/// through `bool`/`Option`/result values, not through this type.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("invalid owner id: {0}")]
    InvalidOwner(String),

    #[error("wallet not found: {0}")]
    WalletNotFound(String),

    #[error("credential not found: {0}")]
    CredentialNotFound(String),

    #[error("wallet import rejected: {0}")]
    ImportValidation(String),

    #[error("issuance failed: {0}")]
    IssuanceFailed(String),

    #[error("invalid claims: {0}")]
    InvalidClaims(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("core error: {0}")]
    Core(#[from] lune_core::CoreError),

    #[error("crypto error: {0}")]
    Crypto(#[from] lune_crypto::CryptoError),

    #[error("identity error: {0}")]
    Identity(#[from] lune_identity::IdentityError),
}

/// Repository backend failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Ledger submission failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Worth retrying: network hiccup, node busy.
    #[error("transient ledger failure: {0}")]
    Transient(String),

    /// The ledger refused the record. Retrying will not help.
    #[error("ledger rejected submission: {0}")]
    Rejected(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
