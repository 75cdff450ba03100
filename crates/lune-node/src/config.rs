//! Node configuration loading and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use lune_core::ServiceConfig;

/// Full configuration for the Lune node.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LuneConfig {
    /// API server settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Ledger backend selection.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Issuer key settings.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Credential engine settings.
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API listen address.
    #[serde(default = "default_api_addr")]
    pub listen_addr: String,
    /// API port.
    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Rocksdb,
    /// Nothing survives a restart.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Path to the data directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerMode {
    /// Simulated chain on `service.anchor.network`.
    #[default]
    Simulated,
    /// No chain; every anchor is `local-unanchored`.
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LedgerConfig {
    #[serde(default)]
    pub mode: LedgerMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IdentityConfig {
    /// Path to the issuer signing key. Without it the node signs with an
    /// ephemeral key and earlier credentials stop verifying after a restart.
    #[serde(default)]
    pub issuer_key_path: Option<PathBuf>,
}

// Default value functions
fn default_api_addr() -> String {
    "127.0.0.1".into()
}
fn default_api_port() -> u16 {
    9101
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_api_addr(),
            port: default_api_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LuneConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: LuneConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Socket address string for the API server.
    pub fn api_addr(&self) -> String {
        format!("{}:{}", self.api.listen_addr, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lune_core::AnchorFallback;

    #[test]
    fn test_default_config() {
        let config = LuneConfig::default();
        assert_eq!(config.api.port, 9101);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.storage.backend, StorageBackend::Rocksdb);
        assert_eq!(config.ledger.mode, LedgerMode::Simulated);
        assert!(config.identity.issuer_key_path.is_none());
        assert_eq!(config.service.did_namespace, "lune");
    }

    #[test]
    fn test_api_addr() {
        let config = LuneConfig::default();
        assert_eq!(config.api_addr(), "127.0.0.1:9101");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = LuneConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let decoded: LuneConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(decoded.api.port, config.api.port);
        assert_eq!(decoded.service.issuer.did, config.service.issuer.did);
        assert_eq!(decoded.service.anchor.timeout_ms, config.service.anchor.timeout_ms);
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let config = LuneConfig::load(Path::new("/nonexistent/lune.toml")).unwrap();
        assert_eq!(config.api.port, 9101);
    }

    #[test]
    fn test_config_from_toml_partial() {
        let toml_str = r#"
[api]
port = 8001

[storage]
backend = "memory"

[ledger]
mode = "local"

[service.anchor]
fallback = "local_only"
timeout_ms = 1500

[[service.trusted_issuers]]
did = "did:lune:0000000000000000000000000000000000000002"
name = "Partner Academy"
"#;
        let config: LuneConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.api.port, 8001);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.ledger.mode, LedgerMode::Local);
        assert_eq!(config.service.anchor.fallback, AnchorFallback::LocalOnly);
        assert_eq!(config.service.anchor.timeout_ms, 1500);
        assert_eq!(config.service.trusted_issuers.len(), 1);
        // Defaults for unspecified
        assert_eq!(config.logging.format, "text");
        assert_eq!(config.service.anchor.max_retries, 1);
    }
}
