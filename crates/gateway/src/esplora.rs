use std::time::Duration;

use async_trait::async_trait;
use axis_types::Utxo;
use tracing::debug;

use crate::UtxoError;

/// Address-scoped unspent output lookup
#[async_trait]
pub trait UtxoIndex: Send + Sync {
    async fn address_utxos(&self, address: &str) -> Result<Vec<Utxo>, UtxoError>;
}

/// Esplora REST client (`GET {base}/address/{address}/utxo`)
pub struct EsploraClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl EsploraClient {
    pub fn new(base_url: &str, timeout_ms: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn utxo_url(&self, address: &str) -> String {
        format!("{}/address/{}/utxo", self.base_url, address)
    }
}

#[async_trait]
impl UtxoIndex for EsploraClient {
    async fn address_utxos(&self, address: &str) -> Result<Vec<Utxo>, UtxoError> {
        let url = self.utxo_url(address);
        debug!(url = %url, "Fetching address UTXOs");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| UtxoError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UtxoError::Status(status.as_u16()));
        }

        response
            .json::<Vec<Utxo>>()
            .await
            .map_err(|e| UtxoError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utxo_url_strips_trailing_slash() {
        let client = EsploraClient::new("https://mempool.staging.midl.xyz/api/", 1000);
        assert_eq!(
            client.utxo_url("bcrt1qxyz"),
            "https://mempool.staging.midl.xyz/api/address/bcrt1qxyz/utxo"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = EsploraClient::new("http://127.0.0.1:1", 500);
        let result = client.address_utxos("bcrt1qxyz").await;
        assert!(matches!(result, Err(UtxoError::Network(_))));
    }
}
