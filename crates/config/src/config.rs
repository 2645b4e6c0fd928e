//! Configuration files.

use alloy_primitives::Address;
use ornode_backfill::BackfillConfig;
use ornode_chain::Contracts;
use ornode_reconciler::ReconcilerConfig;
use ornode_rpc::RpcConfig;
use ornode_transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Default websocket endpoint of the Ethereum node.
pub const DEFAULT_WS_URL: &str = "ws://127.0.0.1:8545";

/// Default HTTP endpoint of the Ethereum node.
pub const DEFAULT_HTTP_URL: &str = "http://127.0.0.1:8545";

/// Default location of the redb file.
pub const DEFAULT_DB_PATH: &str = "ornode.redb";

/// Errors loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read, parsed or created.
    #[error("failed to load config from {path}: {source}")]
    Load {
        /// Path of the file.
        path: PathBuf,
        /// Underlying error.
        source: confy::ConfyError,
    },
    /// A url does not parse.
    #[error("invalid {field}: {source}")]
    InvalidUrl {
        /// Name of the field.
        field: &'static str,
        /// Parse error.
        source: url::ParseError,
    },
    /// A contract address was left unset.
    #[error("{0} address is not configured")]
    MissingContract(&'static str),
    /// Backfill mode is configured with an empty range.
    #[error("backfill range ends at {to} before it starts at {from}")]
    InvalidRange {
        /// First block.
        from: u64,
        /// Last block.
        to: u64,
    },
    /// The configuration cannot be rendered as TOML.
    #[error(transparent)]
    Render(#[from] toml::ser::Error),
}

/// Configuration for the ornode node.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct Config {
    /// Ethereum endpoints and contract addresses.
    pub chain: ChainConfig,
    /// Keep-alive and reconnect timing of the live subscription.
    pub transport: TransportConfig,
    /// What the node does at startup.
    pub sync: SyncConfig,
    /// Where the view is kept.
    pub storage: StorageConfig,
    /// The RPC server.
    pub rpc: RpcConfig,
    /// Event application and stub pruning.
    pub reconciler: ReconcilerConfig,
}

impl Config {
    /// Loads the configuration at `path`, writing the defaults there if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        confy::load_path(path).map_err(|source| ConfigError::Load { path: path.into(), source })
    }

    /// Checks the values that have no usable default.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chain.ws_url()?;
        self.chain.http_url()?;
        if self.chain.orec.is_zero() {
            return Err(ConfigError::MissingContract("orec"))
        }
        if self.chain.respect.is_zero() {
            return Err(ConfigError::MissingContract("respect"))
        }
        if let Some(to) = self.sync.to_block {
            if self.sync.mode == SyncMode::Backfill && to < self.sync.from_block {
                return Err(ConfigError::InvalidRange { from: self.sync.from_block, to })
            }
        }
        Ok(())
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Ethereum endpoints and contract addresses.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Websocket endpoint used for the live log subscription.
    pub ws_url: String,
    /// HTTP endpoint used for state reads and backfill.
    pub http_url: String,
    /// Address of the Orec contract.
    pub orec: Address,
    /// Address of the Respect1155 contract.
    pub respect: Address,
}

impl ChainConfig {
    /// Returns the parsed websocket endpoint.
    pub fn ws_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.ws_url)
            .map_err(|source| ConfigError::InvalidUrl { field: "ws_url", source })
    }

    /// Returns the parsed HTTP endpoint.
    pub fn http_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.http_url)
            .map_err(|source| ConfigError::InvalidUrl { field: "http_url", source })
    }

    /// Returns the configured contract addresses.
    pub const fn contracts(&self) -> Contracts {
        Contracts { orec: self.orec, respect: self.respect }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            ws_url: DEFAULT_WS_URL.to_string(),
            http_url: DEFAULT_HTTP_URL.to_string(),
            orec: Address::ZERO,
            respect: Address::ZERO,
        }
    }
}

/// Startup mode of the node.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Follow new events through the websocket subscription.
    #[default]
    Listen,
    /// Replay a historical block range, then keep serving the view.
    Backfill,
}

/// What the node does at startup.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Startup mode.
    pub mode: SyncMode,
    /// First block of the backfill range.
    pub from_block: u64,
    /// Last block of the backfill range. Unset means the chain head at startup.
    pub to_block: Option<u64>,
    /// Window size and retries of the backfill.
    pub backfill: BackfillConfig,
}

/// Storage backend of the view.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Kept in memory and lost on restart.
    Memory,
    /// Persisted to a redb file.
    #[default]
    Redb,
}

/// Where the view is kept.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend.
    pub backend: StorageBackend,
    /// Database file of the redb backend.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: StorageBackend::default(), path: PathBuf::from(DEFAULT_DB_PATH) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use std::time::Duration;

    const OREC: Address = address!("0x5fbdb2315678afecb367f032d93f642f64180aa3");
    const RESPECT: Address = address!("0xe7f1725e7734ce288f8367e1bb143e90bb3f0512");

    fn with_config_file(f: fn(&Path)) {
        let dir = tempfile::tempdir().unwrap();
        f(&dir.path().join("ornode.toml"));
    }

    #[test]
    fn writes_defaults_when_missing() {
        with_config_file(|path| {
            let config = Config::load(path).unwrap();
            assert_eq!(config, Config::default());
            assert!(path.exists());
            assert_eq!(Config::load(path).unwrap(), config);
        })
    }

    #[test]
    fn partial_file_keeps_defaults() {
        with_config_file(|path| {
            let toml = r#"
[chain]
orec = "0x5fbdb2315678afecb367f032d93f642f64180aa3"
respect = "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512"

[transport]
ping_interval = "30s"

[sync]
mode = "backfill"
from_block = 100

[storage]
backend = "memory"

[reconciler]
stub_retention = "1day"
"#;
            std::fs::write(path, toml).unwrap();
            let config = Config::load(path).unwrap();

            assert_eq!(config.chain.contracts(), Contracts { orec: OREC, respect: RESPECT });
            assert_eq!(config.chain.ws_url, DEFAULT_WS_URL);
            assert_eq!(config.transport.ping_interval, Duration::from_secs(30));
            assert_eq!(config.transport.pong_timeout, TransportConfig::default().pong_timeout);
            assert_eq!(config.sync.mode, SyncMode::Backfill);
            assert_eq!(config.sync.from_block, 100);
            assert_eq!(config.sync.to_block, None);
            assert_eq!(config.storage.backend, StorageBackend::Memory);
            assert_eq!(config.reconciler.stub_retention, Some(Duration::from_secs(86_400)));
            assert_eq!(config.rpc, RpcConfig::default());
            config.validate().unwrap();
        })
    }

    #[test]
    fn rendered_config_parses_back() {
        let mut config = Config::default();
        config.chain.orec = OREC;
        config.reconciler.stub_retention = Some(Duration::from_secs(3600));
        config.sync.to_block = Some(9);
        let parsed: Config = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn validation() {
        let mut config = Config::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingContract("orec"))));

        config.chain.orec = OREC;
        config.chain.respect = RESPECT;
        config.validate().unwrap();

        config.chain.http_url = "not a url".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { field: "http_url", .. })
        ));
        config.chain.http_url = DEFAULT_HTTP_URL.into();

        config.sync = SyncConfig {
            mode: SyncMode::Backfill,
            from_block: 10,
            to_block: Some(5),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRange { from: 10, to: 5 })));
    }
}
