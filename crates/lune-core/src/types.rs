use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Namespace used when none is configured.
pub const DEFAULT_DID_NAMESPACE: &str = "lune";

/// Length of the hex fingerprint that identifies a DID.
pub const FINGERPRINT_HEX_LEN: usize = 40;

/// Decentralized Identifier (DID) in the Lune protocol.
/// Format: `did:<namespace>:<40-hex-char fingerprint>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Did(pub String);

impl Did {
    /// Parse and validate a full DID URI.
    pub fn new(uri: impl Into<String>) -> Result<Self, CoreError> {
        let uri = uri.into();
        let parts: Vec<&str> = uri.split(':').collect();
        if parts.len() != 3 || parts[0] != "did" {
            return Err(CoreError::InvalidDid(format!(
                "DID must have format 'did:<namespace>:<fingerprint>', got: {}",
                uri
            )));
        }
        if parts[1].is_empty() || !parts[1].chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidDid(format!(
                "DID namespace must be alphanumeric, got: {}",
                uri
            )));
        }
        let fingerprint = parts[2];
        if fingerprint.len() != FINGERPRINT_HEX_LEN
            || !fingerprint
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(CoreError::InvalidDid(format!(
                "DID fingerprint must be {} lowercase hex chars, got: {}",
                FINGERPRINT_HEX_LEN, uri
            )));
        }
        Ok(Self(uri))
    }

    /// Create a DID from namespace and fingerprint components without validation.
    pub fn from_parts(namespace: &str, fingerprint: &str) -> Self {
        Self(format!("did:{}:{}", namespace, fingerprint))
    }

    /// Get the full DID URI.
    pub fn uri(&self) -> &str {
        &self.0
    }

    /// Extract the namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.0.split(':').nth(1)
    }

    /// Extract the fingerprint.
    pub fn fingerprint(&self) -> Option<&str> {
        let parts: Vec<&str> = self.0.splitn(3, ':').collect();
        parts.get(2).copied()
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for Did {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Proficiency level attached to a skill certification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    /// All levels, lowest first.
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::InvalidSkillLevel(s.to_string()))
    }
}
