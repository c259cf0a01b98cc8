use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axis_config::LaunchpadConfig;
use axis_gateway::{EsploraClient, RpcWalletGateway, UtxoIndex, WalletGateway};
use tokio::sync::broadcast;
use tracing::info;

/// Everything a launch needs from the outside world.
///
/// Built once at application start and handed to the orchestrator. Calling
/// [`LaunchContext::shutdown`] releases any attempt stuck waiting on a
/// confirmation; it is one-way.
pub struct LaunchContext {
    config: LaunchpadConfig,
    gateway: Arc<dyn WalletGateway>,
    utxo_index: Arc<dyn UtxoIndex>,
    shutdown_tx: broadcast::Sender<()>,
    shut_down: AtomicBool,
}

impl LaunchContext {
    pub fn new(
        config: LaunchpadConfig,
        gateway: Arc<dyn WalletGateway>,
        utxo_index: Arc<dyn UtxoIndex>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            gateway,
            utxo_index,
            shutdown_tx,
            shut_down: AtomicBool::new(false),
        }
    }

    /// Wire the JSON-RPC wallet bridge and the Esplora index from config
    pub fn from_config(config: LaunchpadConfig) -> Self {
        let gateway = RpcWalletGateway::new(&config.wallet.bridge_url, config.wallet.timeout_ms);
        let utxo_index =
            EsploraClient::new(&config.network.utxo_index_url, config.wallet.timeout_ms);
        Self::new(config, Arc::new(gateway), Arc::new(utxo_index))
    }

    pub fn config(&self) -> &LaunchpadConfig {
        &self.config
    }

    pub fn gateway(&self) -> &dyn WalletGateway {
        self.gateway.as_ref()
    }

    pub fn utxo_index(&self) -> &dyn UtxoIndex {
        self.utxo_index.as_ref()
    }

    /// Subscribe to the shutdown signal.
    ///
    /// Check [`LaunchContext::is_shut_down`] after subscribing; a signal sent
    /// before the subscription is not replayed.
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    /// Tear down: wake everything waiting on the signal. Idempotent.
    pub fn shutdown(&self) {
        if self
            .shut_down
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            info!("Launch context shutting down");
            let _ = self.shutdown_tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axis_gateway::{MockUtxoIndex, MockWalletGateway};

    fn context() -> LaunchContext {
        LaunchContext::new(
            LaunchpadConfig::regtest(),
            Arc::new(MockWalletGateway::new()),
            Arc::new(MockUtxoIndex::empty()),
        )
    }

    #[tokio::test]
    async fn test_shutdown_wakes_subscribers_once() {
        let ctx = context();
        let mut rx = ctx.subscribe_shutdown();
        assert!(!ctx.is_shut_down());

        ctx.shutdown();
        ctx.shutdown();

        assert!(ctx.is_shut_down());
        assert!(rx.recv().await.is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_from_config_uses_configured_endpoints() {
        let ctx = LaunchContext::from_config(LaunchpadConfig::local());
        assert!(ctx.config().launch.demo_mode);
    }
}
