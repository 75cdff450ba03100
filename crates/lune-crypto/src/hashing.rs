use rand::rngs::OsRng;
use rand::RngCore;

/// BLAKE3 hash (32 bytes).
pub type Hash = [u8; 32];

/// Number of hash bytes kept in a fingerprint (40 hex chars).
const FINGERPRINT_BYTES: usize = 20;

/// Hash arbitrary data using BLAKE3.
pub fn hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Hash arbitrary data and hex-encode the digest.
pub fn hash_hex(data: &[u8]) -> String {
    hex::encode(hash(data))
}

/// Truncated BLAKE3 digest as 40 lowercase hex chars.
pub fn fingerprint(data: &[u8]) -> String {
    hex::encode(&hash(data)[..FINGERPRINT_BYTES])
}

/// Fingerprint of 32 bytes drawn from the OS entropy source.
pub fn random_fingerprint() -> String {
    let mut seed = [0u8; 32];
    OsRng.fill_bytes(&mut seed);
    fingerprint(&seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(hash(b"lune"), hash(b"lune"));
        assert_ne!(hash(b"data A"), hash(b"data B"));
    }

    #[test]
    fn test_hash_hex_length() {
        assert_eq!(hash_hex(b"").len(), 64);
    }

    #[test]
    fn test_fingerprint_shape() {
        let fp = fingerprint(b"holder");
        assert_eq!(fp.len(), 40);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(fp, fingerprint(b"holder"));
    }

    #[test]
    fn test_random_fingerprints_differ() {
        let a = random_fingerprint();
        let b = random_fingerprint();
        assert_eq!(a.len(), 40);
        assert_ne!(a, b);
    }
}
