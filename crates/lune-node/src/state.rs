//! Shared state handed to every API handler.

use std::sync::Arc;
use std::time::Instant;

use lune_credentials::CredentialService;

pub struct AppState {
    pub service: Arc<CredentialService>,
    /// Network name of the configured ledger.
    pub ledger_network: String,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(service: Arc<CredentialService>, ledger_network: impl Into<String>) -> Self {
        Self {
            service,
            ledger_network: ledger_network.into(),
            start_time: Instant::now(),
        }
    }
}
