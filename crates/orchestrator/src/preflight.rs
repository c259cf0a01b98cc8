//! Advisory balance check before a live launch

use axis_gateway::{UtxoError, UtxoIndex};
use axis_types::{total_value, LogLine, SATS_PER_BTC};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::TerminalLog;

const BTC_DISPLAY_DECIMALS: u32 = 4;

/// Query the index for `address` and log what it says.
///
/// Returns whether spendable outputs were found. Never fails: every problem
/// turns into a warning line and the launch goes on.
pub async fn preflight(index: &dyn UtxoIndex, address: &str, log: &TerminalLog) -> bool {
    match index.address_utxos(address).await {
        Ok(utxos) if utxos.is_empty() => {
            debug!(address = %address, "Pre-flight found no UTXOs");
            log.push(LogLine::warning(format!(
                "Pre-flight: no UTXOs for {}. Fund it from the MIDL regtest faucet first.",
                address
            )))
            .await;
            false
        }
        Ok(utxos) => {
            let total = total_value(&utxos);
            debug!(address = %address, count = utxos.len(), total_sats = total, "Pre-flight ok");
            log.push(LogLine::success(format!(
                "Pre-flight: {} UTXO(s) available, {} BTC",
                utxos.len(),
                format_btc(total)
            )))
            .await;
            true
        }
        Err(UtxoError::Status(code)) => {
            warn!(address = %address, status = code, "Pre-flight UTXO query rejected");
            log.push(LogLine::warning(format!(
                "Pre-flight: UTXO index returned HTTP {}. Continuing anyway.",
                code
            )))
            .await;
            false
        }
        Err(e) => {
            warn!(address = %address, error = %e, "Pre-flight UTXO query failed");
            log.push(LogLine::warning(format!(
                "Pre-flight check failed: {}. Continuing anyway.",
                e
            )))
            .await;
            false
        }
    }
}

/// Satoshis as BTC with four decimal places
pub fn format_btc(sats: u64) -> String {
    let mut btc = (Decimal::from(sats) / Decimal::from(SATS_PER_BTC))
        .round_dp(BTC_DISPLAY_DECIMALS);
    btc.rescale(BTC_DISPLAY_DECIMALS);
    btc.to_string()
}
