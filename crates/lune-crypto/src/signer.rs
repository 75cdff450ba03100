use ed25519_dalek::{Signature, Signer as _, Verifier as _};

use crate::error::CryptoError;
use crate::keys::{KeyPair, PublicKey, SecretKey};

/// Length of an Ed25519 proof value once hex-decoded.
const SIGNATURE_LEN: usize = 64;

/// A freshly generated key pair in its exported form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    /// Encoded verification key, safe to publish.
    pub public_key: String,
    /// Encoded private key.
    pub secret_key: SecretKey,
}

/// Signature scheme used to produce and check credential proofs.
///
/// Issuance and verification only see encoded keys and proof values, so a
/// different scheme can be substituted without touching either.
pub trait Signer: Send + Sync {
    /// Proof suite name written into `proof.type`.
    fn proof_type(&self) -> &str;

    /// Generate a new key pair.
    fn generate_key(&self) -> KeyMaterial;

    /// Sign `payload`, returning the encoded proof value.
    fn sign(&self, payload: &[u8], secret_key: &SecretKey) -> Result<String, CryptoError>;

    /// Check a proof value against `payload` and an encoded public key.
    /// Malformed keys or proof values verify as `false`.
    fn verify(&self, payload: &[u8], proof_value: &str, public_key: &str) -> bool;
}

/// Ed25519 signer: base58 public keys, hex-encoded signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Signer;

impl Ed25519Signer {
    pub const PROOF_TYPE: &'static str = "Ed25519Signature2020";

    pub fn new() -> Self {
        Self
    }

    /// Export an existing key pair.
    pub fn key_material(keypair: &KeyPair) -> KeyMaterial {
        KeyMaterial {
            public_key: keypair.public_key().to_bs58(),
            secret_key: keypair.secret_key(),
        }
    }
}

/// Decode a hex `proofValue` into a signature.
fn decode_proof_value(proof_value: &str) -> Result<Signature, CryptoError> {
    let bytes = hex::decode(proof_value)
        .map_err(|e| CryptoError::InvalidInput(format!("proof value is not hex: {}", e)))?;
    let bytes: [u8; SIGNATURE_LEN] = bytes.as_slice().try_into().map_err(|_| {
        CryptoError::InvalidInput(format!(
            "proof value must be {} bytes, got {}",
            SIGNATURE_LEN,
            bytes.len()
        ))
    })?;
    Ok(Signature::from_bytes(&bytes))
}

impl Signer for Ed25519Signer {
    fn proof_type(&self) -> &str {
        Self::PROOF_TYPE
    }

    fn generate_key(&self) -> KeyMaterial {
        Self::key_material(&KeyPair::generate())
    }

    fn sign(&self, payload: &[u8], secret_key: &SecretKey) -> Result<String, CryptoError> {
        let keypair = KeyPair::from_secret_key(secret_key)
            .map_err(|e| CryptoError::SigningError(e.to_string()))?;
        let signature = keypair.signing_key().sign(payload);
        Ok(hex::encode(signature.to_bytes()))
    }

    fn verify(&self, payload: &[u8], proof_value: &str, public_key: &str) -> bool {
        let pubkey = match PublicKey::from_bs58(public_key) {
            Ok(pubkey) => pubkey,
            Err(e) => {
                tracing::debug!(error = %e, "unusable verification key");
                return false;
            }
        };
        let signature = match decode_proof_value(proof_value) {
            Ok(signature) => signature,
            Err(e) => {
                tracing::debug!(error = %e, "unusable proof value");
                return false;
            }
        };
        pubkey.verifying_key().verify(payload, &signature).is_ok()
    }
}
