//! Lune Crypto: Ed25519 keys, BLAKE3 hashing, and the
//! `Signer` capability used to produce and check credential proofs.

pub mod error;
pub mod hashing;
pub mod keys;
pub mod signer;

pub use error::CryptoError;
pub use hashing::{fingerprint, hash, hash_hex, random_fingerprint};
pub use keys::{KeyPair, PublicKey, SecretKey};
pub use signer::{Ed25519Signer, KeyMaterial, Signer};
