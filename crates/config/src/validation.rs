//! Configuration validation

use crate::{ConfigError, LaunchpadConfig, Result};

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the entire launchpad configuration
pub fn validate_config(config: &LaunchpadConfig) -> Result<()> {
    let mut errors = Vec::new();

    // Network
    if let Err(e) = validate_log_level(&config.network.log_level) {
        errors.push(e);
    }

    for (field, url) in [
        ("network.utxo_index_url", &config.network.utxo_index_url),
        ("network.btc_explorer_url", &config.network.btc_explorer_url),
        ("network.evm_explorer_url", &config.network.evm_explorer_url),
        ("wallet.bridge_url", &config.wallet.bridge_url),
    ] {
        if let Err(e) = validate_url(url) {
            errors.push(ValidationError::new(field, e));
        }
    }

    // Factory
    if let Err(e) = validate_evm_address(&config.factory.address) {
        errors.push(ValidationError::new("factory.address", e));
    }

    if config.factory.bonding_curve_k == 0 {
        errors.push(ValidationError::new(
            "factory.bonding_curve_k",
            "must be greater than 0",
        ));
    }

    // Wallet
    if config.wallet.connector_id.trim().is_empty() {
        errors.push(ValidationError::new(
            "wallet.connector_id",
            "connector id is required",
        ));
    }

    if config.wallet.timeout_ms == 0 {
        errors.push(ValidationError::new(
            "wallet.timeout_ms",
            "must be greater than 0",
        ));
    }

    if let Some(signer_url) = &config.wallet.signer_url {
        if let Err(e) = validate_url(signer_url) {
            errors.push(ValidationError::new("wallet.signer_url", e));
        }
    }

    // Launch
    if !config.launch.demo_delay_scale.is_finite() || config.launch.demo_delay_scale < 0.0 {
        errors.push(ValidationError::new(
            "launch.demo_delay_scale",
            "must be a finite number >= 0",
        ));
    }

    // Return all errors if any were found
    if !errors.is_empty() {
        let error_msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ConfigError::ValidationError(error_msg));
    }

    Ok(())
}

/// Validate a URL
pub fn validate_url(url: &str) -> std::result::Result<(), String> {
    if url.is_empty() {
        return Err("URL cannot be empty".to_string());
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err("URL must start with http:// or https://".to_string());
    }

    Ok(())
}

/// Validate a 0x-prefixed 20-byte hex address
pub fn validate_evm_address(address: &str) -> std::result::Result<(), String> {
    let hex = address
        .strip_prefix("0x")
        .ok_or_else(|| "address must be 0x-prefixed".to_string())?;

    if hex.len() != 40 {
        return Err(format!(
            "address must be 20 bytes (40 hex chars), got {}",
            hex.len()
        ));
    }

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("address contains non-hex characters".to_string());
    }

    Ok(())
}

/// Validate log level
fn validate_log_level(level: &str) -> std::result::Result<(), ValidationError> {
    match level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new(
            "network.log_level",
            format!(
                "invalid log level '{level}', must be one of: trace, debug, info, warn, error"
            ),
        )),
    }
}
