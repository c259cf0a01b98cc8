//! Configuration loading from multiple sources

use crate::{ConfigError, LaunchpadConfig, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use std::path::Path;
use tracing::debug;

/// Default prefix for environment overrides, e.g. `AXIS_LAUNCH__DEMO_MODE=true`
pub const ENV_PREFIX: &str = "AXIS";

/// Configuration loader with support for multiple formats and sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file
    ///
    /// Supports TOML, YAML, and JSON formats based on file extension
    pub fn from_file(path: &Path) -> Result<LaunchpadConfig> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::LoadError("No file extension found".to_string()))?;

        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "Loading launchpad config");

        match extension {
            "toml" => Self::from_toml(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            "json" => Self::from_json(&content),
            _ => Err(ConfigError::LoadError(format!(
                "Unsupported file extension: {}",
                extension
            ))),
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<LaunchpadConfig> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration from YAML string
    pub fn from_yaml(content: &str) -> Result<LaunchpadConfig> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration from JSON string
    pub fn from_json(content: &str) -> Result<LaunchpadConfig> {
        serde_json::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration from environment variables
    ///
    /// Uses default prefix "AXIS"
    pub fn from_env() -> Result<LaunchpadConfig> {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Load configuration from environment variables with custom prefix
    ///
    /// Variables are in the format PREFIX_SECTION__KEY, for example
    /// AXIS_NETWORK__ENVIRONMENT=local. Unset keys keep their defaults.
    pub fn from_env_with_prefix(prefix: &str) -> Result<LaunchpadConfig> {
        Self::builder().add_env(prefix).build()
    }

    /// Load configuration from file with environment variable overrides
    pub fn from_file_with_env(path: &Path, env_prefix: &str) -> Result<LaunchpadConfig> {
        if !path.exists() {
            return Err(ConfigError::LoadError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        Self::builder().add_file(path, true).add_env(env_prefix).build()
    }

    /// Build configuration using the config crate's builder pattern
    pub fn builder() -> ConfigLoaderBuilder {
        ConfigLoaderBuilder {
            builder: Config::builder(),
        }
    }
}

/// Builder for layered configuration loading
pub struct ConfigLoaderBuilder {
    builder: ConfigBuilder<config::builder::DefaultState>,
}

impl ConfigLoaderBuilder {
    /// Add a configuration file source
    pub fn add_file(mut self, path: &Path, required: bool) -> Self {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => FileFormat::Toml,
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            Some("json") => FileFormat::Json,
            _ => FileFormat::Toml,
        };

        self.builder = self
            .builder
            .add_source(File::from(path).format(format).required(required));
        self
    }

    /// Add environment variable source with prefix
    pub fn add_env(mut self, prefix: &str) -> Self {
        self.builder = self.builder.add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        self
    }

    /// Set a default value for a key
    pub fn set_default(mut self, key: &str, value: &str) -> Result<Self> {
        self.builder = self.builder.set_default(key, value)?;
        Ok(self)
    }

    /// Build the final configuration
    pub fn build(self) -> Result<LaunchpadConfig> {
        let config = self.builder.build()?;
        config.try_deserialize().map_err(ConfigError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Environment as NetworkEnvironment;
    use std::io::Write;

    #[test]
    fn test_load_from_toml() {
        let toml = r#"
            [network]
            environment = "local"
            log_level = "debug"

            [factory]
            address = "0x5447Ef425888C2f464F53B485B5E2fFCD4Df168f"
            bonding_curve_k = 5000

            [launch]
            demo_mode = true
            demo_delay_scale = 0.5
        "#;

        let config = ConfigLoader::from_toml(toml).unwrap();
        assert_eq!(config.network.environment, NetworkEnvironment::Local);
        assert_eq!(config.network.log_level, "debug");
        assert_eq!(config.factory.bonding_curve_k, 5000);
        assert!(config.launch.demo_mode);
        assert_eq!(config.launch.demo_delay_scale, 0.5);
        // untouched sections keep defaults
        assert_eq!(config.wallet.connector_id, "xverse");
    }

    #[test]
    fn test_load_from_yaml() {
        let yaml = r#"
network:
  environment: testnet
  utxo_index_url: "https://indexer.example.org/api"
wallet:
  bridge_url: "http://localhost:9000/rpc"
  timeout_ms: 1000
"#;

        let config = ConfigLoader::from_yaml(yaml).unwrap();
        assert_eq!(config.network.environment, NetworkEnvironment::Testnet);
        assert_eq!(config.wallet.bridge_url, "http://localhost:9000/rpc");
        assert_eq!(config.wallet.timeout_ms, 1000);
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"{ "launch": { "preflight_enabled": false } }"#;
        let config = ConfigLoader::from_json(json).unwrap();
        assert!(!config.launch.preflight_enabled);
        assert!(!config.launch.demo_mode);
    }

    #[test]
    fn test_empty_toml_is_regtest_default() {
        let config = ConfigLoader::from_toml("").unwrap();
        assert_eq!(config.network.environment, NetworkEnvironment::Regtest);
        assert_eq!(config.factory.address, axis_types::FACTORY_CONTRACT_ADDRESS);
    }

    #[test]
    fn test_from_file_detects_format() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[launch]\ndemo_mode = true").unwrap();

        let config = ConfigLoader::from_file(file.path()).unwrap();
        assert!(config.launch.demo_mode);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let result = ConfigLoader::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_builder_layers_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "network": {{ "log_level": "warn" }} }}"#).unwrap();

        let config = ConfigLoader::builder()
            .add_file(file.path(), true)
            .build()
            .unwrap();
        assert_eq!(config.network.log_level, "warn");
    }

    #[test]
    fn test_missing_file_with_env() {
        let result = ConfigLoader::from_file_with_env(
            std::path::Path::new("/nonexistent/axis.toml"),
            ENV_PREFIX,
        );
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
