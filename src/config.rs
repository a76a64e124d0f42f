use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::state::WalletState;

/// Errors raised while reading settings or network definitions
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid network definition: {0}")]
    Invalid(String),
}

/// Which chain family a network belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NetworkKind {
    Ethereum,
    Cosmos,
    /// Kept verbatim so the fetch step can report it
    Other(String),
}

impl From<String> for NetworkKind {
    fn from(kind: String) -> Self {
        match kind.to_ascii_lowercase().as_str() {
            "ethereum" => Self::Ethereum,
            "cosmos" => Self::Cosmos,
            _ => Self::Other(kind),
        }
    }
}

impl From<NetworkKind> for String {
    fn from(kind: NetworkKind) -> Self {
        match kind {
            NetworkKind::Ethereum => "ethereum".to_string(),
            NetworkKind::Cosmos => "cosmos".to_string(),
            NetworkKind::Other(name) => name,
        }
    }
}

/// Wallet with its alert threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    #[serde(rename = "walletAddress")]
    pub address: String,
    pub use_case: String,
    /// Threshold in the network's smallest currency unit
    pub min_balance: f64,
    /// Runtime state, never read from or written to the definitions document
    #[serde(skip)]
    pub state: WalletState,
}

impl Wallet {
    pub fn new(address: impl Into<String>, use_case: impl Into<String>, min_balance: f64) -> Self {
        Self {
            address: address.into(),
            use_case: use_case.into(),
            min_balance,
            state: WalletState::default(),
        }
    }
}

/// Network definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub identifier: String,
    pub kind: NetworkKind,
    #[serde(default)]
    pub endpoint: String,
    pub currency_unit: String,
    pub conversion_factor: f64,
    /// Hours of sustained failure before an RPC alert
    pub failure_threshold: f64,
    #[serde(default)]
    pub price_source: String,
    pub wallets: Vec<Wallet>,
}

impl Network {
    /// Number of consecutive failed polls that make up one RPC alert period.
    ///
    /// Zero means the threshold is shorter than one poll interval, in which
    /// case every failure alerts.
    pub fn rpc_error_threshold(&self, poll_interval: Duration) -> u64 {
        let interval_hours = poll_interval.as_secs_f64() / 3600.0;
        if interval_hours <= 0.0 {
            return 0;
        }
        let cycles = (self.failure_threshold / interval_hours).floor();
        if cycles.is_finite() && cycles > 0.0 {
            cycles as u64
        } else {
            0
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.wallets.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "network {} has no wallets",
                self.identifier
            )));
        }
        if self.failure_threshold.is_nan() || self.failure_threshold <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "network {} has non-positive failureThreshold {}",
                self.identifier, self.failure_threshold
            )));
        }
        if self.conversion_factor.is_nan() || self.conversion_factor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "network {} has non-positive conversionFactor {}",
                self.identifier, self.conversion_factor
            )));
        }
        if let Some(wallet) = self.wallets.iter().find(|w| w.min_balance.is_nan() || w.min_balance < 0.0) {
            return Err(ConfigError::Invalid(format!(
                "wallet {} in {} has negative minBalance",
                wallet.address, self.identifier
            )));
        }
        Ok(())
    }
}

/// Top-level network definitions document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkDefinitions {
    #[serde(rename = "blockchainNetworks", default)]
    pub networks: Vec<Network>,
}

/// Reads network definitions and resolves default endpoints
#[derive(Debug, Clone)]
pub struct NetworkLoader {
    path: PathBuf,
    default_endpoint_base: String,
}

impl NetworkLoader {
    pub fn new(path: impl Into<PathBuf>, default_endpoint_base: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            default_endpoint_base: default_endpoint_base.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and validate all networks from the definitions document
    pub fn load(&self) -> Result<Vec<Network>, ConfigError> {
        let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        self.parse(&content)
    }

    /// Parse a definitions document already in memory
    pub fn parse(&self, content: &str) -> Result<Vec<Network>, ConfigError> {
        let definitions: NetworkDefinitions =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let mut networks = definitions.networks;
        for network in &mut networks {
            network.validate()?;
            network.endpoint = resolve_endpoint(network, &self.default_endpoint_base);
        }
        Ok(networks)
    }
}

/// Source of network definitions, consulted before every cycle
pub trait DefinitionSource {
    fn load_networks(&self) -> Result<Vec<Network>, ConfigError>;
}

impl DefinitionSource for NetworkLoader {
    fn load_networks(&self) -> Result<Vec<Network>, ConfigError> {
        self.load()
    }
}

/// Endpoint to query for a network, derived from the base URL when unset
pub fn resolve_endpoint(network: &Network, base_url: &str) -> String {
    if network.endpoint.is_empty() {
        format!("{}/{}", base_url.trim_end_matches('/'), network.identifier)
    } else {
        network.endpoint.clone()
    }
}

/// How runtime state is carried across definition reloads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Match wallets by network identifier and address
    #[default]
    Keyed,
    /// Match wallets by network index, then wallet index
    Positional,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
}

/// Where alerts go
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Webhook URL or Telegram chat id for balance alerts; empty logs only
    #[serde(default)]
    pub balance_destination: String,
    /// Webhook URL or Telegram chat id for RPC health alerts; empty logs only
    #[serde(default)]
    pub rpc_destination: String,
    pub telegram: Option<TelegramConfig>,
}

/// USD price lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceConfig {
    #[serde(default = "default_price_base_url")]
    pub base_url: String,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            base_url: default_price_base_url(),
        }
    }
}

/// Application settings from YAML, read once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_networks_path")]
    pub networks_path: String,
    #[serde(default = "default_endpoint_base")]
    pub default_endpoint_base: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default)]
    pub merge_strategy: MergeStrategy,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub price: PriceConfig,
}

fn default_interval_secs() -> u64 {
    1800
}

fn default_networks_path() -> String {
    "networks.yaml".to_string()
}

fn default_endpoint_base() -> String {
    "https://rest.cosmos.directory".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    40
}

fn default_price_base_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            networks_path: default_networks_path(),
            default_endpoint_base: default_endpoint_base(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            merge_strategy: MergeStrategy::default(),
            notifications: NotificationConfig::default(),
            price: PriceConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// A zero interval would turn the poll loop into a busy loop
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::Invalid("interval_secs must be positive".to_string()));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid("fetch_timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn network_loader(&self) -> NetworkLoader {
        NetworkLoader::new(&self.networks_path, &self.default_endpoint_base)
    }
}
