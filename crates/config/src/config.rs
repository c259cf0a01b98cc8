//! Core configuration structures for the Axis launchpad

use axis_types::{DEFAULT_BONDING_CURVE_K, FACTORY_CONTRACT_ADDRESS};
use serde::{Deserialize, Serialize};

const MIDL_STAGING_MEMPOOL: &str = "https://mempool.staging.midl.xyz";
const MIDL_STAGING_BLOCKSCOUT: &str = "https://blockscout.staging.midl.xyz";

/// Main launchpad configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaunchpadConfig {
    /// Network and explorer endpoints
    #[serde(default)]
    pub network: NetworkConfig,

    /// Token factory contract
    #[serde(default)]
    pub factory: FactoryConfig,

    /// Wallet bridge
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Launch terminal behaviour
    #[serde(default)]
    pub launch: LaunchConfig,
}

impl LaunchpadConfig {
    /// MIDL staging regtest endpoints
    pub fn regtest() -> Self {
        Self::default()
    }

    /// Everything on localhost, demo mode on
    pub fn local() -> Self {
        Self {
            network: NetworkConfig {
                environment: Environment::Local,
                log_level: "debug".to_string(),
                utxo_index_url: "http://localhost:3002/api".to_string(),
                btc_explorer_url: "http://localhost:3002".to_string(),
                evm_explorer_url: "http://localhost:4000".to_string(),
            },
            wallet: WalletConfig {
                bridge_url: "http://localhost:8545".to_string(),
                signer_url: Some("http://localhost:8546".to_string()),
                ..WalletConfig::default()
            },
            launch: LaunchConfig {
                demo_mode: true,
                ..LaunchConfig::default()
            },
            ..Self::default()
        }
    }

    /// Explorer link for a Bitcoin transaction
    pub fn btc_tx_url(&self, tx_id: &str) -> String {
        format!("{}/tx/{}", self.network.btc_explorer_url.trim_end_matches('/'), tx_id)
    }

    /// Explorer link for an EVM transaction
    pub fn evm_tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.network.evm_explorer_url.trim_end_matches('/'), tx_hash)
    }

    /// Explorer link for a contract / token address
    pub fn evm_address_url(&self, address: &str) -> String {
        format!(
            "{}/address/{}",
            self.network.evm_explorer_url.trim_end_matches('/'),
            address
        )
    }
}

/// Network environment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Environment type (regtest, testnet, local)
    #[serde(default)]
    pub environment: Environment,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Esplora-compatible API used for UTXO lookups
    #[serde(default = "default_utxo_index_url")]
    pub utxo_index_url: String,

    /// Bitcoin explorer base URL
    #[serde(default = "default_btc_explorer_url")]
    pub btc_explorer_url: String,

    /// EVM explorer base URL
    #[serde(default = "default_evm_explorer_url")]
    pub evm_explorer_url: String,
}

/// Environment types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Regtest,
    Testnet,
    Local,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Regtest => "regtest",
            Environment::Testnet => "testnet",
            Environment::Local => "local",
        }
    }
}

/// Token factory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactoryConfig {
    /// Factory contract address (0x-prefixed, 20 bytes)
    #[serde(default = "default_factory_address")]
    pub address: String,

    /// Bonding curve pricing constant passed to `createToken`
    #[serde(default = "default_bonding_curve_k")]
    pub bonding_curve_k: u64,
}

/// Wallet bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// JSON-RPC endpoint of the browser-wallet bridge
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,

    /// Connector requested on `connect`
    #[serde(default = "default_connector_id")]
    pub connector_id: String,

    /// Per-request timeout in milliseconds (confirmation waits excluded)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Bridge backed by a locally held credential, used by `create-token`
    #[serde(default)]
    pub signer_url: Option<String>,
}

/// Launch terminal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Run the scripted simulation instead of calling the wallet
    #[serde(default)]
    pub demo_mode: bool,

    /// Multiplier applied to demo step delays (0 disables pacing)
    #[serde(default = "default_demo_delay_scale")]
    pub demo_delay_scale: f64,

    /// Run the advisory UTXO check before queueing
    #[serde(default = "default_true")]
    pub preflight_enabled: bool,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_utxo_index_url() -> String {
    format!("{MIDL_STAGING_MEMPOOL}/api")
}

fn default_btc_explorer_url() -> String {
    MIDL_STAGING_MEMPOOL.to_string()
}

fn default_evm_explorer_url() -> String {
    MIDL_STAGING_BLOCKSCOUT.to_string()
}

fn default_factory_address() -> String {
    FACTORY_CONTRACT_ADDRESS.to_string()
}

fn default_bonding_curve_k() -> u64 {
    DEFAULT_BONDING_CURVE_K as u64
}

fn default_bridge_url() -> String {
    "http://127.0.0.1:8787/rpc".to_string()
}

fn default_connector_id() -> String {
    "xverse".to_string()
}

fn default_timeout_ms() -> u64 {
    30000
}

fn default_demo_delay_scale() -> f64 {
    1.0
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Regtest,
            log_level: default_log_level(),
            utxo_index_url: default_utxo_index_url(),
            btc_explorer_url: default_btc_explorer_url(),
            evm_explorer_url: default_evm_explorer_url(),
        }
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            address: default_factory_address(),
            bonding_curve_k: default_bonding_curve_k(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            bridge_url: default_bridge_url(),
            connector_id: default_connector_id(),
            timeout_ms: default_timeout_ms(),
            signer_url: None,
        }
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            demo_mode: false,
            demo_delay_scale: default_demo_delay_scale(),
            preflight_enabled: default_true(),
        }
    }
}
