use std::fmt;

use crate::error::CoreError;

/// The states of a Verifiable Credential lifecycle.
///
/// Only `Active` and `Revoked` are ever stored. `Expired` is derived at read
/// time from the credential's expiration date.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    /// Credential is active and can be presented.
    #[default]
    Active,
    /// Credential has been permanently revoked. Final state.
    Revoked,
    /// Credential is past its expiration date. Final state.
    Expired,
}

impl CredentialStatus {
    /// Whether this is a final (terminal) state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Revoked | Self::Expired)
    }

    /// Combine a stored status with the expiration check.
    ///
    /// Revocation dominates expiry.
    pub fn effective(self, expired: bool) -> Self {
        match self {
            Self::Revoked => Self::Revoked,
            _ if expired => Self::Expired,
            other => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events that trigger credential status transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialEvent {
    /// Issuer or holder permanently revokes the credential.
    Revoke,
    /// The credential's expiration date has passed.
    Expire,
}

/// Manages credential status transitions.
///
/// Valid transitions:
/// - Active → Revoked (Revoke)
/// - Active → Expired (Expire)
/// - Expired → Revoked (Revoke)
/// - Revoked → Revoked (Revoke, idempotent)
/// - Expired → Expired (Expire, idempotent)
pub struct CredentialStateMachine;

impl CredentialStateMachine {
    /// Attempt a status transition based on an event.
    /// Returns the new status on success, or an error for invalid transitions.
    pub fn transition(
        current: CredentialStatus,
        event: CredentialEvent,
    ) -> Result<CredentialStatus, CoreError> {
        let new_status = match (current, event) {
            (CredentialStatus::Active, CredentialEvent::Revoke) => CredentialStatus::Revoked,
            (CredentialStatus::Active, CredentialEvent::Expire) => CredentialStatus::Expired,
            (CredentialStatus::Expired, CredentialEvent::Revoke) => CredentialStatus::Revoked,
            (CredentialStatus::Revoked, CredentialEvent::Revoke) => CredentialStatus::Revoked,
            (CredentialStatus::Expired, CredentialEvent::Expire) => CredentialStatus::Expired,
            (CredentialStatus::Revoked, CredentialEvent::Expire) => {
                return Err(CoreError::InvalidStateTransition {
                    from: current,
                    to: CredentialStatus::Expired,
                });
            }
        };

        tracing::debug!(
            from = %current,
            to = %new_status,
            event = ?event,
            "credential status transition"
        );

        Ok(new_status)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: CredentialStatus, event: CredentialEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}
