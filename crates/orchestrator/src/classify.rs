//! Failure classification and the log text each class produces

use axis_gateway::{GatewayError, GatewayStep};
use axis_types::{LogLine, TokenConfig};
use serde::{Deserialize, Serialize};

pub use axis_gateway::{
    looks_like_indexer_mismatch as is_known_wallet_bug,
    looks_like_insufficient_funds as is_insufficient_funds,
};

/// Longest raw wallet message echoed on a signing failure
pub const MAX_SIGN_ERROR_CHARS: usize = 300;

/// What went wrong, as far as the user-facing log is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotConnected,
    Queue,
    Finalize,
    /// Wallet read the wrong network's indexer and got HTML back
    KnownWalletBug,
    Sign,
    Broadcast,
    InsufficientFunds,
    ConfirmationTimeout,
    Cancelled,
    Unclassified,
}

impl FailureKind {
    /// Whether the log gets structured multi-line remediation
    pub fn has_remediation(&self) -> bool {
        matches!(
            self,
            FailureKind::KnownWalletBug | FailureKind::InsufficientFunds
        )
    }
}

/// Classify a failure raised at `step`.
///
/// The error tag decides first. Untagged messages (transport errors, or
/// adapters that only pass text through) fall back to the substring checks.
/// Funding and indexer-mismatch causes take precedence over the step.
pub fn classify(step: GatewayStep, error: &GatewayError) -> FailureKind {
    match error {
        GatewayError::IndexerMismatch { .. } => return FailureKind::KnownWalletBug,
        GatewayError::InsufficientFunds { .. } => return FailureKind::InsufficientFunds,
        GatewayError::NotConnected => return FailureKind::NotConnected,
        GatewayError::Cancelled => return FailureKind::Cancelled,
        _ => {}
    }

    let message = error.message();
    if is_known_wallet_bug(message) {
        return FailureKind::KnownWalletBug;
    }
    if is_insufficient_funds(message) {
        return FailureKind::InsufficientFunds;
    }

    match step {
        GatewayStep::Connect => FailureKind::Unclassified,
        GatewayStep::Queue => FailureKind::Queue,
        GatewayStep::Finalize => FailureKind::Finalize,
        GatewayStep::Sign => FailureKind::Sign,
        GatewayStep::Broadcast => FailureKind::Broadcast,
        GatewayStep::Confirm => FailureKind::ConfirmationTimeout,
    }
}

/// Log lines for a classified failure
pub fn failure_lines(
    kind: FailureKind,
    error: &GatewayError,
    config: &TokenConfig,
    payment_address: Option<&str>,
) -> Vec<LogLine> {
    match kind {
        FailureKind::NotConnected => {
            vec![LogLine::error(
                "Wallet not connected. Connect wallet in header and retry.",
            )]
        }
        FailureKind::InsufficientFunds => funding_remediation(payment_address),
        FailureKind::KnownWalletBug => known_bug_diagnostic(config),
        FailureKind::Sign => vec![LogLine::error(format!(
            "Signing failed: {}",
            truncate_chars(error.message(), MAX_SIGN_ERROR_CHARS)
        ))],
        FailureKind::Broadcast => {
            vec![LogLine::error(format!("Broadcast failed: {}", error.to_json()))]
        }
        FailureKind::Cancelled => vec![LogLine::error(
            "Deployment cancelled: launchpad is shutting down. Check the explorer before retrying.",
        )],
        FailureKind::Queue
        | FailureKind::Finalize
        | FailureKind::ConfirmationTimeout
        | FailureKind::Unclassified => vec![LogLine::error(format!(
            "Deployment failed: {}",
            error.message()
        ))],
    }
}

/// Three-step funding remediation: fund, re-sync, retry
pub fn funding_remediation(payment_address: Option<&str>) -> Vec<LogLine> {
    let target = match payment_address {
        Some(address) => format!("payment address {}", address),
        None => "your payment address".to_string(),
    };
    vec![
        LogLine::error(format!(
            "Insufficient funds: no spendable UTXOs. Fund {} from the MIDL regtest faucet.",
            target
        )),
        LogLine::warning(
            "After funding, re-sync the network in your wallet so it picks up the new UTXOs.",
        ),
        LogLine::info("Then retry the deployment."),
    ]
}

/// Diagnostic for the wallet/indexer network mismatch, with both workarounds
pub fn known_bug_diagnostic(config: &TokenConfig) -> Vec<LogLine> {
    vec![
        LogLine::error(
            "Wallet returned an HTML page instead of JSON while building the BTC transaction.",
        ),
        LogLine::warning(
            "Known wallet bug: it queries the public mempool.space indexer instead of the MIDL regtest indexer.",
        ),
        LogLine::info("Workaround 1: enable demo mode to run the launch without the wallet."),
        LogLine::info(format!(
            "Workaround 2: axis create-token --name \"{}\" --symbol \"{}\"",
            config.name(),
            config.ticker()
        )),
    ]
}

/// Truncate on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
