//! Lune Core: fundamental types, errors, and configuration for the
//! Lune credential wallet and verification engine.

pub mod config;
pub mod credential_state;
pub mod error;
pub mod types;

pub use config::{
    AnchorConfig, AnchorFallback, IssuerConfig, PresentationConfig, ServiceConfig,
    TrustedIssuerConfig,
};
pub use credential_state::{CredentialEvent, CredentialStatus, CredentialStateMachine};
pub use error::CoreError;
pub use types::{Did, SkillLevel, DEFAULT_DID_NAMESPACE};
