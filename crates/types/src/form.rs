use serde::{Deserialize, Serialize};

use crate::{TokenConfig, TokenConfigError, DEFAULT_SUPPLY};

/// Input mode of the launch terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchMode {
    /// Free-text description, token config is derived
    #[default]
    Simple,
    /// Explicit name / ticker / supply fields
    Advanced,
}

/// Editable state behind the launch terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchForm {
    pub mode: LaunchMode,
    pub prompt: String,
    pub name: String,
    pub ticker: String,
    pub supply: String,
}

impl Default for LaunchForm {
    fn default() -> Self {
        Self {
            mode: LaunchMode::Simple,
            prompt: String::new(),
            name: String::new(),
            ticker: String::new(),
            supply: DEFAULT_SUPPLY.to_string(),
        }
    }
}

/// Why a submission never left the entry guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormRejection {
    EmptyPrompt,
    MissingFields(TokenConfigError),
}

impl LaunchForm {
    pub fn simple(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn advanced(
        name: impl Into<String>,
        ticker: impl Into<String>,
        supply: impl Into<String>,
    ) -> Self {
        Self {
            mode: LaunchMode::Advanced,
            name: name.into(),
            ticker: ticker.into(),
            supply: supply.into(),
            ..Self::default()
        }
    }

    pub fn is_advanced(&self) -> bool {
        self.mode == LaunchMode::Advanced
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            LaunchMode::Simple => LaunchMode::Advanced,
            LaunchMode::Advanced => LaunchMode::Simple,
        };
    }

    /// Entry-guard field check. Simple mode only needs non-blank text; the
    /// advanced fields are turned into a config right away so a bad name or
    /// ticker is rejected before any async work.
    pub fn check(&self) -> Result<Option<TokenConfig>, FormRejection> {
        match self.mode {
            LaunchMode::Simple if self.prompt.trim().is_empty() => {
                Err(FormRejection::EmptyPrompt)
            }
            LaunchMode::Simple => Ok(None),
            LaunchMode::Advanced => TokenConfig::from_fields(&self.name, &self.ticker)
                .map(Some)
                .map_err(FormRejection::MissingFields),
        }
    }

    /// Echo of the request as shown on the user's log line
    pub fn echo(&self, config: &TokenConfig) -> String {
        match self.mode {
            LaunchMode::Simple => self.prompt.clone(),
            LaunchMode::Advanced => format!(
                "deploy --name=\"{}\" --ticker=\"{}\" --supply={}",
                config.name(),
                config.ticker(),
                self.supply
            ),
        }
    }

    /// Exit cleanup: free text always cleared, advanced fields back to defaults
    pub fn reset(&mut self) {
        self.reset_for(self.mode);
    }

    /// Exit cleanup for an attempt submitted in `mode`, whatever the form
    /// shows now
    pub fn reset_for(&mut self, mode: LaunchMode) {
        self.prompt.clear();
        if mode == LaunchMode::Advanced {
            self.name.clear();
            self.ticker.clear();
            self.supply = DEFAULT_SUPPLY.to_string();
        }
    }
}
