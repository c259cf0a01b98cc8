//! Scripted launch with no wallet or chain traffic

use std::time::Duration;

use axis_config::LaunchpadConfig;
use axis_types::{LogLine, TokenConfig};
use tracing::debug;

use crate::TerminalLog;

pub const DEMO_BTC_TX_ID: &str =
    "e5fcba91e606cd0860e2e6e2adb9445766fc686cc227c2418aecc65df906bbb8";
pub const DEMO_EVM_TX_HASH: &str =
    "0xf6d0442ab2cb4ba7ec47400234014b1a1afab1539268db32c1a23793e042e073";
pub const DEMO_TOKEN_ADDRESS: &str = "0x26f1c3d6e497320ab1ef9dc8998387902cc419c8";

/// One scripted line and the pause before it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoStep {
    pub delay: Duration,
    pub line: LogLine,
}

impl DemoStep {
    fn new(delay_ms: u64, line: LogLine) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            line,
        }
    }
}

/// The fixed demo script for `token`, with explorer links from `config`
pub fn demo_script(token: &TokenConfig, config: &LaunchpadConfig) -> Vec<DemoStep> {
    vec![
        DemoStep::new(
            400,
            LogLine::info("Demo mode: simulating deployment, no wallet or chain calls."),
        ),
        DemoStep::new(
            600,
            LogLine::system(format!(
                "Queueing createToken({}, {}) intention...",
                token.name(),
                token.ticker()
            )),
        ),
        DemoStep::new(1200, LogLine::system("Finalizing BTC transaction...")),
        DemoStep::new(
            500,
            LogLine::system(format!("BTC tx prepared: {}", DEMO_BTC_TX_ID)),
        ),
        DemoStep::new(1500, LogLine::system("Signing intention with wallet...")),
        DemoStep::new(1000, LogLine::system("Broadcasting BTC + EVM transactions...")),
        DemoStep::new(
            400,
            LogLine::system(format!("EVM tx hash: {}", DEMO_EVM_TX_HASH))
                .with_link(config.evm_tx_url(DEMO_EVM_TX_HASH)),
        ),
        DemoStep::new(
            800,
            LogLine::system(format!("Waiting for BTC confirmation: {}", DEMO_BTC_TX_ID)),
        ),
        DemoStep::new(
            1500,
            LogLine::success(format!(
                "Deployment successful. Token {} created at {}.",
                token.ticker(),
                DEMO_TOKEN_ADDRESS
            ))
            .with_link(config.evm_address_url(DEMO_TOKEN_ADDRESS)),
        ),
        DemoStep::new(
            400,
            LogLine::success(format!("BTC transaction confirmed: {}", DEMO_BTC_TX_ID))
                .with_link(config.btc_tx_url(DEMO_BTC_TX_ID)),
        ),
    ]
}

/// Play the script into `log`. A `delay_scale` of 0 skips the pauses.
pub async fn play_demo(script: Vec<DemoStep>, delay_scale: f64, log: &TerminalLog) {
    for step in script {
        let delay = scaled(step.delay, delay_scale);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        debug!(text = %step.line.text, "Demo line");
        log.push(step.line).await;
    }
}

fn scaled(delay: Duration, scale: f64) -> Duration {
    if scale.is_finite() && scale > 0.0 {
        delay.mul_f64(scale)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axis_types::LogKind;

    fn script() -> Vec<DemoStep> {
        demo_script(
            &TokenConfig::from_fields("Orbital", "ORB").unwrap(),
            &LaunchpadConfig::regtest(),
        )
    }

    #[test]
    fn test_delays_stay_in_range() {
        for step in script() {
            let ms = step.delay.as_millis();
            assert!((400..=1500).contains(&ms), "delay {}ms out of range", ms);
        }
    }

    #[test]
    fn test_script_ends_in_success_with_links() {
        let steps = script();
        let tail: Vec<_> = steps.iter().rev().take(2).collect();
        assert!(tail.iter().all(|s| s.line.kind == LogKind::Success));
        assert!(tail.iter().all(|s| s.line.link.is_some()));
        assert!(steps
            .iter()
            .any(|s| s.line.text.contains("createToken(Orbital, ORB)")));
    }

    #[test]
    fn test_scaling() {
        let delay = Duration::from_millis(1000);
        assert_eq!(scaled(delay, 0.0), Duration::ZERO);
        assert_eq!(scaled(delay, 0.5), Duration::from_millis(500));
        assert_eq!(scaled(delay, f64::NAN), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_demo_respects_pacing() {
        let log = TerminalLog::default();
        let started = tokio::time::Instant::now();
        play_demo(script(), 1.0, &log).await;

        let total: Duration = script().iter().map(|s| s.delay).sum();
        assert!(started.elapsed() >= total);
        assert_eq!(log.len().await, script().len());
    }

    #[tokio::test]
    async fn test_play_demo_unpaced() {
        let log = TerminalLog::default();
        play_demo(script(), 0.0, &log).await;
        assert_eq!(log.len().await, script().len());
    }
}
