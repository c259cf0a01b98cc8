use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FALLBACK_TOKEN_NAME: &str = "AxisToken";
pub const FALLBACK_TOKEN_TICKER: &str = "AXIS";

pub const MAX_NAME_LEN: usize = 24;
pub const MAX_TICKER_LEN: usize = 6;

/// Name and ticker handed to the factory contract.
///
/// Once built, a config is never edited: the name holds only ASCII
/// alphanumerics and spaces (at most 24 chars) and the ticker is a non-empty
/// upper-case alphanumeric string of at most 6 chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenConfig {
    name: String,
    ticker: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenConfigError {
    #[error("token name is empty")]
    EmptyName,

    #[error("token ticker is empty")]
    EmptyTicker,
}

impl TokenConfig {
    /// Build a config from explicit fields (advanced mode).
    ///
    /// Both fields are sanitized the same way derived values are; if either
    /// ends up empty the submission is rejected.
    pub fn from_fields(name: &str, ticker: &str) -> Result<Self, TokenConfigError> {
        let name = sanitize_name(name);
        if name.is_empty() {
            return Err(TokenConfigError::EmptyName);
        }

        let ticker = sanitize_ticker(ticker);
        if ticker.is_empty() {
            return Err(TokenConfigError::EmptyTicker);
        }

        Ok(Self { name, ticker })
    }

    /// Fixed config used when nothing meaningful can be derived
    pub fn fallback() -> Self {
        Self {
            name: FALLBACK_TOKEN_NAME.to_string(),
            ticker: FALLBACK_TOKEN_TICKER.to_string(),
        }
    }

    /// Build from already-derived parts, falling back per field when a part
    /// sanitizes to nothing.
    pub fn from_parts_or_fallback(name: &str, ticker: &str) -> Self {
        let name = sanitize_name(name);
        let ticker = sanitize_ticker(ticker);
        Self {
            name: if name.is_empty() {
                FALLBACK_TOKEN_NAME.to_string()
            } else {
                name
            },
            ticker: if ticker.is_empty() {
                FALLBACK_TOKEN_TICKER.to_string()
            } else {
                ticker
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Keep ASCII alphanumerics and spaces, trim, cap at 24 chars.
pub fn sanitize_name(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();
    let capped: String = kept.trim().chars().take(MAX_NAME_LEN).collect();
    capped.trim_end().to_string()
}

/// Keep ASCII alphanumerics, upper-case, cap at 6 chars.
pub fn sanitize_ticker(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .take(MAX_TICKER_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fields_uppercases_and_trims() {
        let config = TokenConfig::from_fields("  Orbital ", " orb ").unwrap();
        assert_eq!(config.name(), "Orbital");
        assert_eq!(config.ticker(), "ORB");
    }

    #[test]
    fn test_from_fields_rejects_empty() {
        assert_eq!(
            TokenConfig::from_fields("   ", "ORB"),
            Err(TokenConfigError::EmptyName)
        );
        assert_eq!(
            TokenConfig::from_fields("Orbital", "$$"),
            Err(TokenConfigError::EmptyTicker)
        );
    }

    #[test]
    fn test_limits_enforced() {
        let config =
            TokenConfig::from_fields("An extremely long token name indeed", "toolongticker")
                .unwrap();
        assert!(config.name().len() <= MAX_NAME_LEN);
        assert_eq!(config.ticker(), "TOOLON");
    }

    #[test]
    fn test_leading_spaces_do_not_eat_the_name_budget() {
        let name = sanitize_name("          Supercalifragilistic Token");
        assert_eq!(name, "Supercalifragilistic Tok");
        assert_eq!(name.len(), MAX_NAME_LEN);

        // a cut that lands on a space leaves no trailing blank
        assert_eq!(sanitize_name("  Supercalifragilisticexp Z"), "Supercalifragilisticexp");
    }

    #[test]
    fn test_name_strips_punctuation() {
        assert_eq!(sanitize_name("Cat's-Coin!"), "CatsCoin");
    }

    #[test]
    fn test_parts_fall_back_independently() {
        let config = TokenConfig::from_parts_or_fallback("!!!", "mc");
        assert_eq!(config.name(), FALLBACK_TOKEN_NAME);
        assert_eq!(config.ticker(), "MC");
    }
}
