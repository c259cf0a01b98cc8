use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gateway operation a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayStep {
    Connect,
    Queue,
    Finalize,
    Sign,
    Broadcast,
    Confirm,
}

/// Wallet / chain gateway errors, tagged by cause
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GatewayError {
    #[error("wallet not connected")]
    NotConnected,

    #[error("wallet connection failed: {message}")]
    Connection { message: String },

    #[error("failed to queue intention: {message}")]
    Queue { message: String },

    #[error("failed to finalize BTC transaction: {message}")]
    Finalize { message: String },

    /// Wallet fetched data from the wrong network's indexer and got an HTML
    /// page back instead of JSON
    #[error("wallet/indexer network mismatch: {message}")]
    IndexerMismatch { message: String },

    #[error("signing failed: {message}")]
    Sign { message: String },

    #[error("broadcast failed: {message}")]
    Broadcast { message: String },

    #[error("insufficient funds: {message}")]
    InsufficientFunds { message: String },

    #[error("confirmation wait failed: {message}")]
    ConfirmationTimeout { message: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("transport error: {message}")]
    Transport { message: String },
}

impl GatewayError {
    /// Plain error for a step, without looking at the message
    pub fn for_step(step: GatewayStep, message: impl Into<String>) -> Self {
        let message = message.into();
        match step {
            GatewayStep::Connect => GatewayError::Connection { message },
            GatewayStep::Queue => GatewayError::Queue { message },
            GatewayStep::Finalize => GatewayError::Finalize { message },
            GatewayStep::Sign => GatewayError::Sign { message },
            GatewayStep::Broadcast => GatewayError::Broadcast { message },
            GatewayStep::Confirm => GatewayError::ConfirmationTimeout { message },
        }
    }

    /// Tag a raw failure message coming out of an adapter.
    ///
    /// The indexer mismatch and funding signatures win over the step so
    /// callers can branch on the variant alone.
    pub fn tagged(step: GatewayStep, message: impl Into<String>) -> Self {
        let message = message.into();
        if looks_like_indexer_mismatch(&message) {
            GatewayError::IndexerMismatch { message }
        } else if looks_like_insufficient_funds(&message) {
            GatewayError::InsufficientFunds { message }
        } else {
            Self::for_step(step, message)
        }
    }

    /// Raw message as reported by the wallet, without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            GatewayError::NotConnected => "wallet not connected",
            GatewayError::Cancelled => "operation cancelled",
            GatewayError::Connection { message }
            | GatewayError::Queue { message }
            | GatewayError::Finalize { message }
            | GatewayError::IndexerMismatch { message }
            | GatewayError::Sign { message }
            | GatewayError::Broadcast { message }
            | GatewayError::InsufficientFunds { message }
            | GatewayError::ConfirmationTimeout { message }
            | GatewayError::Transport { message } => message,
        }
    }

    /// JSON rendering used in broadcast failure logs
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_string())
    }
}

/// UTXO index query errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UtxoError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),
}

const HTML_MARKERS: &[&str] = &[
    "unexpected '<'",
    "unexpected token '<'",
    "unexpected token <",
    "<!doctype",
];

const WRONG_NETWORK_MARKERS: &[&str] = &["mempool.space", "-32603"];

const FUNDING_MARKERS: &[&str] = &["no utxo", "insufficient", "no selected"];

/// HTML came back where JSON was expected, from the public mempool or as a
/// JSON-RPC internal error
pub fn looks_like_indexer_mismatch(message: &str) -> bool {
    let lower = message.to_lowercase();
    HTML_MARKERS.iter().any(|m| lower.contains(m))
        && WRONG_NETWORK_MARKERS.iter().any(|m| lower.contains(m))
}

/// Coin selection found nothing to spend
pub fn looks_like_insufficient_funds(message: &str) -> bool {
    let lower = message.to_lowercase();
    FUNDING_MARKERS.iter().any(|m| lower.contains(m))
}
