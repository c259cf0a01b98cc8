//! JSON-RPC client for the wallet bridge
//!
//! The bridge exposes the connected wallet and the MIDL executor over
//! JSON-RPC 2.0. Error payloads are tagged here, once, so the launch flow
//! only ever sees [`GatewayError`] variants.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axis_types::{
    BroadcastOutcome, BroadcastRequest, FinalizedTransaction, IntentionHandle, SignedPayload,
    TxIntention,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{GatewayError, GatewayStep, WalletGateway};

/// EIP-1193 "unauthorized": no account connected
const RPC_UNAUTHORIZED: i64 = 4100;

mod methods {
    pub const IS_CONNECTED: &str = "wallet_isConnected";
    pub const CONNECT: &str = "wallet_connect";
    pub const DISCONNECT: &str = "wallet_disconnect";
    pub const PAYMENT_ADDRESS: &str = "wallet_paymentAddress";
    pub const ADD_TX_INTENTION: &str = "midl_addTxIntention";
    pub const FINALIZE_BTC_TRANSACTION: &str = "midl_finalizeBTCTransaction";
    pub const SIGN_INTENTION: &str = "midl_signIntention";
    pub const SEND_BTC_TRANSACTIONS: &str = "midl_sendBTCTransactions";
    pub const WAIT_FOR_TRANSACTION: &str = "midl_waitForTransaction";
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

/// Response envelope. `result` is `Some(Value::Null)` for a `null` result
/// and `None` only when the member is missing.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl RpcErrorObject {
    fn into_gateway_error(self, step: GatewayStep) -> GatewayError {
        if self.code == RPC_UNAUTHORIZED {
            return GatewayError::NotConnected;
        }

        let mut message = format!("{} (code {})", self.message, self.code);
        match self.data {
            Some(Value::String(data)) => {
                message.push_str(": ");
                message.push_str(&data);
            }
            Some(Value::Null) | None => {}
            Some(other) => {
                message.push_str(": ");
                message.push_str(&other.to_string());
            }
        }
        GatewayError::tagged(step, message)
    }
}

#[derive(Debug, Deserialize)]
struct FinalizeResult {
    tx: FinalizedTransaction,
}

/// Wallet gateway backed by a JSON-RPC bridge
pub struct RpcWalletGateway {
    endpoint: String,
    client: reqwest::Client,
    timeout: Duration,
    next_id: AtomicU64,
}

impl RpcWalletGateway {
    pub fn new(endpoint: &str, timeout_ms: u64) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client: reqwest::Client::new(),
            timeout: Duration::from_millis(timeout_ms),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue one call. `bounded` applies the per-request timeout; the
    /// confirmation wait runs unbounded.
    async fn call<T: DeserializeOwned>(
        &self,
        step: GatewayStep,
        method: &str,
        params: Value,
        bounded: bool,
    ) -> Result<T, GatewayError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        debug!(method = %method, id = request.id, "Wallet bridge request");

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if bounded {
            builder = builder.timeout(self.timeout);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() && step == GatewayStep::Confirm {
                GatewayError::ConfirmationTimeout {
                    message: e.to_string(),
                }
            } else {
                GatewayError::Transport {
                    message: format!("{} request failed: {}", method, e),
                }
            }
        })?;

        let body = response.text().await.map_err(|e| GatewayError::Transport {
            message: format!("{} response unreadable: {}", method, e),
        })?;

        let parsed: RpcResponse =
            serde_json::from_str(&body).map_err(|e| GatewayError::Transport {
                message: format!("invalid JSON-RPC response to {}: {}", method, e),
            })?;

        if let Some(error) = parsed.error {
            return Err(error.into_gateway_error(step));
        }

        let result = parsed.result.ok_or_else(|| GatewayError::Transport {
            message: format!("{} returned neither result nor error", method),
        })?;
        serde_json::from_value(result).map_err(|e| GatewayError::Transport {
            message: format!("unexpected result from {}: {}", method, e),
        })
    }
}

#[async_trait]
impl WalletGateway for RpcWalletGateway {
    async fn is_connected(&self) -> bool {
        match self
            .call::<bool>(GatewayStep::Connect, methods::IS_CONNECTED, json!([]), true)
            .await
        {
            Ok(connected) => connected,
            Err(e) => {
                warn!(error = %e, "Could not query wallet connection state");
                false
            }
        }
    }

    async fn connect(&self, connector_id: &str) -> Result<(), GatewayError> {
        self.call::<Value>(
            GatewayStep::Connect,
            methods::CONNECT,
            json!([connector_id]),
            true,
        )
        .await
        .map(|_| ())
    }

    async fn disconnect(&self) -> Result<(), GatewayError> {
        self.call::<Value>(GatewayStep::Connect, methods::DISCONNECT, json!([]), true)
            .await
            .map(|_| ())
    }

    async fn payment_address(&self) -> Option<String> {
        match self
            .call::<Option<String>>(
                GatewayStep::Connect,
                methods::PAYMENT_ADDRESS,
                json!([]),
                true,
            )
            .await
        {
            Ok(address) => address.filter(|a| !a.is_empty()),
            Err(e) => {
                warn!(error = %e, "Could not read payment address");
                None
            }
        }
    }

    async fn add_tx_intention(
        &self,
        intention: TxIntention,
        reset: bool,
    ) -> Result<IntentionHandle, GatewayError> {
        self.call(
            GatewayStep::Queue,
            methods::ADD_TX_INTENTION,
            json!([{ "reset": reset, "intention": intention }]),
            true,
        )
        .await
    }

    async fn finalize_transaction(&self) -> Result<FinalizedTransaction, GatewayError> {
        self.call::<FinalizeResult>(
            GatewayStep::Finalize,
            methods::FINALIZE_BTC_TRANSACTION,
            json!([]),
            true,
        )
        .await
        .map(|r| r.tx)
    }

    async fn sign_intention(
        &self,
        tx_id: &str,
        intention: &IntentionHandle,
    ) -> Result<SignedPayload, GatewayError> {
        self.call(
            GatewayStep::Sign,
            methods::SIGN_INTENTION,
            json!([{ "txId": tx_id, "intention": intention }]),
            true,
        )
        .await
    }

    async fn broadcast(
        &self,
        request: BroadcastRequest,
    ) -> Result<BroadcastOutcome, GatewayError> {
        self.call(
            GatewayStep::Broadcast,
            methods::SEND_BTC_TRANSACTIONS,
            json!([request]),
            true,
        )
        .await
    }

    async fn wait_for_confirmation(&self, tx_id: &str) -> Result<(), GatewayError> {
        self.call::<Value>(
            GatewayStep::Confirm,
            methods::WAIT_FOR_TRANSACTION,
            json!([{ "txId": tx_id }]),
            false,
        )
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpc_error(code: i64, message: &str, data: Option<Value>) -> RpcErrorObject {
        RpcErrorObject {
            code,
            message: message.to_string(),
            data,
        }
    }

    #[test]
    fn test_internal_error_with_html_is_indexer_mismatch() {
        let err = rpc_error(
            -32603,
            "Internal error",
            Some(json!("Unexpected token '<', \"<!DOCTYPE \"... is not valid JSON")),
        )
        .into_gateway_error(GatewayStep::Finalize);
        assert!(matches!(err, GatewayError::IndexerMismatch { .. }));
    }

    #[test]
    fn test_unauthorized_is_not_connected() {
        let err = rpc_error(4100, "Unauthorized", None).into_gateway_error(GatewayStep::Queue);
        assert_eq!(err, GatewayError::NotConnected);
    }

    #[test]
    fn test_plain_error_keeps_step() {
        let err = rpc_error(4001, "User rejected the request", None)
            .into_gateway_error(GatewayStep::Sign);
        assert_eq!(
            err,
            GatewayError::Sign {
                message: "User rejected the request (code 4001)".to_string()
            }
        );
    }

    #[test]
    fn test_response_parsing() {
        let ok: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"result":{"tx":{"id":"abc","hex":"0200"}}}"#,
        )
        .unwrap();
        let finalized: FinalizeResult = serde_json::from_value(ok.result.unwrap()).unwrap();
        assert_eq!(finalized.tx.id, "abc");

        let err: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":2,"error":{"code":-32000,"message":"No UTXOs"}}"#,
        )
        .unwrap();
        assert!(matches!(
            err.error.unwrap().into_gateway_error(GatewayStep::Finalize),
            GatewayError::InsufficientFunds { .. }
        ));
    }

    #[test]
    fn test_null_result_is_present() {
        let null: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":3,"result":null}"#).unwrap();
        assert_eq!(null.result, Some(Value::Null));
        assert!(null.error.is_none());

        let missing: RpcResponse = serde_json::from_str(r#"{"jsonrpc":"2.0","id":4}"#).unwrap();
        assert!(missing.result.is_none());

        let with_null_error: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":5,"result":true,"error":null}"#)
                .unwrap();
        assert!(with_null_error.error.is_none());
        assert_eq!(with_null_error.result, Some(Value::Bool(true)));
    }

    #[test]
    fn test_request_ids_increase() {
        let gateway = RpcWalletGateway::new("http://127.0.0.1:1/rpc", 100);
        let first = gateway.next_id.fetch_add(1, Ordering::Relaxed);
        let second = gateway.next_id.fetch_add(1, Ordering::Relaxed);
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_unreachable_bridge_reports_disconnected() {
        let gateway = RpcWalletGateway::new("http://127.0.0.1:1/rpc", 500);
        assert!(!gateway.is_connected().await);
        assert_eq!(gateway.payment_address().await, None);

        let err = gateway.finalize_transaction().await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport { .. }));
    }
}
