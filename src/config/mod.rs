use alloy::primitives::utils::parse_units;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid threshold {threshold:?} for {symbol} ({decimals} decimals): {reason}")]
    InvalidThreshold {
        symbol: String,
        threshold: String,
        decimals: u8,
        reason: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Networks to monitor. Defaults to the built-in registry below.
    #[serde(default = "default_networks")]
    pub networks: Vec<NetworkConfig>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// One monitored network: a chain id, a WebSocket RPC endpoint, and the
/// ERC-20 assets watched on it. Loaded once at startup, never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: String,
    pub ws_url: String,
    pub explorer_url: String,
    pub assets: Vec<AssetConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    /// ERC-20 contract address (0x-prefixed hex).
    pub address: String,
    pub symbol: String,
    /// Base-unit decimal exponent (e.g. 6 for USDC, 18 for BSC USDT).
    pub decimals: u8,
    /// Minimum approval value to record, in human units (e.g. "1000").
    pub threshold: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP API.
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Start monitoring immediately on launch rather than waiting for
    /// POST /api/monitor/start.
    #[serde(default = "default_true")]
    pub autostart: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            autostart: default_true(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            networks: default_networks(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Built-in registry: USDT/USDC on the five networks we watch by default.
/// Thresholds are 1000 human units across the board.
fn default_networks() -> Vec<NetworkConfig> {
    fn asset(address: &str, symbol: &str, decimals: u8) -> AssetConfig {
        AssetConfig {
            address: address.to_string(),
            symbol: symbol.to_string(),
            decimals,
            threshold: "1000".to_string(),
        }
    }

    vec![
        NetworkConfig {
            chain_id: 1,
            name: "Ethereum".to_string(),
            ws_url: "wss://ethereum-rpc.publicnode.com".to_string(),
            explorer_url: "https://etherscan.io".to_string(),
            assets: vec![
                asset("0xdAC17F958D2ee523a2206206994597C13D831ec7", "USDT", 6),
                asset("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "USDC", 6),
            ],
        },
        NetworkConfig {
            chain_id: 56,
            name: "BSC".to_string(),
            ws_url: "wss://bsc-rpc.publicnode.com".to_string(),
            explorer_url: "https://bscscan.com".to_string(),
            assets: vec![
                asset("0x55d398326f99059fF775485246999027B3197955", "USDT", 18),
                asset("0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d", "USDC", 18),
            ],
        },
        NetworkConfig {
            chain_id: 42161,
            name: "Arbitrum".to_string(),
            ws_url: "wss://arbitrum-one-rpc.publicnode.com".to_string(),
            explorer_url: "https://arbiscan.io".to_string(),
            assets: vec![
                asset("0xFd086bC7CD5C481DCC9C85ebE478A1C0b69FCbb9", "USDT", 6),
                asset("0xaf88d065e77c8cC2239327C5EDb3A432268e5831", "USDC", 6),
            ],
        },
        NetworkConfig {
            chain_id: 10,
            name: "Optimism".to_string(),
            ws_url: "wss://optimism-rpc.publicnode.com".to_string(),
            explorer_url: "https://optimistic.etherscan.io".to_string(),
            assets: vec![
                asset("0x94b008aA00579c1307B0EF2c499aD98a8ce58e58", "USDT", 6),
                asset("0x0b2C639c533813f4Aa9D7837CAf62653d097Ff85", "USDC", 6),
            ],
        },
        NetworkConfig {
            chain_id: 8453,
            name: "Base".to_string(),
            ws_url: "wss://base-rpc.publicnode.com".to_string(),
            explorer_url: "https://basescan.org".to_string(),
            assets: vec![asset(
                "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
                "USDC",
                6,
            )],
        },
    ]
}

impl Config {
    /// Load config from a TOML file. Thresholds are validated up front so a
    /// malformed registry fails at startup, not mid-subscription.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Every asset threshold must parse as a decimal amount at its configured
    /// exponent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for network in &self.networks {
            for asset in &network.assets {
                if let Err(e) = parse_units(&asset.threshold, asset.decimals) {
                    return Err(ConfigError::InvalidThreshold {
                        symbol: asset.symbol.clone(),
                        threshold: asset.threshold.clone(),
                        decimals: asset.decimals,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Total number of (network, asset) pairs to monitor.
    pub fn pair_count(&self) -> usize {
        self.networks.iter().map(|n| n.assets.len()).sum()
    }
}
