//! Lune Credentials: the credential wallet and verification engine.
//!
//! - [`WalletManager`] creates one DID-bearing wallet per owner
//! - [`CredentialIssuer`] signs, anchors and appends credentials
//! - [`RevocationManager`] moves credentials to the terminal `revoked` state
//! - [`CredentialVerifier`] resolves credentials through the credential index
//!   and runs the ordered verification checks
//! - [`PresentationService`] shares time-boxed snapshots of selected credentials
//!
//! [`CredentialService`] wires them together over the repository and ledger seams.

pub mod error;
pub mod issuer;
pub mod ledger;
pub mod locks;
pub mod manager;
pub mod presentation;
pub mod repository;
pub mod revocation;
pub mod service;
pub mod verifier;
pub mod wallet;

pub use error::{CredentialError, LedgerError, StoreError};
pub use issuer::CredentialIssuer;
pub use ledger::{explorer_url, AnchorRequest, Ledger, LocalLedger, SimulatedLedger};
pub use locks::{KeyedGuard, KeyedLocks};
pub use manager::WalletManager;
pub use presentation::{PresentationService, ShareablePresentation};
pub use repository::{
    CredentialLocation, InMemoryPresentationRepository, InMemoryWalletRepository,
    PresentationRepository, WalletRepository,
};
pub use revocation::RevocationManager;
pub use service::CredentialService;
pub use verifier::{CheckStatus, CredentialVerifier, VerificationCheck, VerificationResult};
pub use wallet::{export_wallet, import_wallet, Wallet};
