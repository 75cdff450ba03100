//! Lune Identity Layer
//!
//! Provides decentralised identity primitives for the Lune credential wallet:
//! - DID generation from OS entropy
//! - Verifiable Credentials with typed achievement claims, signer-produced
//!   proofs and ledger anchors
//! - Registry of trusted issuers consulted during verification

pub mod credentials;
pub mod did;
pub mod error;
pub mod issuer_registry;

pub use credentials::{
    AchievementClaims, Anchor, CredentialProof, CredentialSubject, VerifiableCredential,
    BASE_CREDENTIAL_TYPE,
};
pub use did::DidGenerator;
pub use error::IdentityError;
pub use issuer_registry::{IssuerInfo, IssuerRegistry};
