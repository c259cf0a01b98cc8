use axis_launchpad::config::LaunchpadConfig;
use axis_launchpad::gateway::{GatewayError, MockUtxoIndex, RpcWalletGateway, WalletGateway};
use axis_launchpad::orchestrator::{LaunchContext, LaunchOrchestrator, Phase};
use axis_launchpad::types::{LaunchForm, LogKind, Utxo};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// ═══════════════════════════════════════════════════════════════════════════
// LOCAL WALLET BRIDGE
// ═══════════════════════════════════════════════════════════════════════════

const BRIDGE_TX_ID: &str = "c0ffee00aa11bb22cc33dd44ee55ff6600112233445566778899aabbccddeeff";
const BRIDGE_EVM_HASH: &str = "0x7e57ab1e00000000000000000000000000000000000000000000000000000001";

/// Maps a method and its params to the response members (`result` or `error`)
type Handler = fn(&str, &Value) -> Value;

/// Serve JSON-RPC over HTTP on an ephemeral port, one request per connection
async fn spawn_bridge(handler: Handler) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                let method = request["method"].as_str().unwrap_or_default().to_string();
                let mut reply = handler(&method, &request["params"]);
                reply["jsonrpc"] = json!("2.0");
                reply["id"] = request["id"].clone();

                let body = reply.to_string();
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}/rpc", addr)
}

async fn read_request(socket: &mut TcpStream) -> Option<Value> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
        let len = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        let body_start = end + 4;
        if buf.len() >= body_start + len {
            return serde_json::from_slice(&buf[body_start..body_start + len]).ok();
        }
    }
}

/// A connected wallet whose every call succeeds; void methods answer `null`
fn healthy(method: &str, params: &Value) -> Value {
    match method {
        "wallet_isConnected" => json!({ "result": true }),
        "wallet_paymentAddress" => json!({ "result": "bcrt1qlocalbridge" }),
        "midl_addTxIntention" => json!({
            "result": { "id": "bridge-1", "intention": params[0]["intention"] }
        }),
        "midl_finalizeBTCTransaction" => json!({
            "result": { "tx": { "id": BRIDGE_TX_ID, "hex": "02000000000101" } }
        }),
        "midl_signIntention" => json!({ "result": "0xsignedpayload" }),
        "midl_sendBTCTransactions" => json!({ "result": [BRIDGE_EVM_HASH] }),
        _ => json!({ "result": null }),
    }
}

/// Every call answers with a JSON-RPC error
fn failing(method: &str, _params: &Value) -> Value {
    match method {
        "midl_finalizeBTCTransaction" => json!({
            "error": {
                "code": -32603,
                "message": "Internal error",
                "data": "Unexpected token '<', \"<!DOCTYPE \"... is not valid JSON"
            }
        }),
        "midl_addTxIntention" => json!({
            "error": { "code": 4100, "message": "Unauthorized" }
        }),
        _ => json!({ "error": { "code": -32000, "message": "bridge offline" } }),
    }
}

/// Replies that carry neither member
fn empty(_method: &str, _params: &Value) -> Value {
    json!({})
}

// ═══════════════════════════════════════════════════════════════════════════
// ADAPTER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_null_results_are_success_for_void_methods() {
    let gateway = RpcWalletGateway::new(&spawn_bridge(healthy).await, 2_000);

    assert_eq!(gateway.connect("xverse").await, Ok(()));
    assert_eq!(gateway.disconnect().await, Ok(()));
    assert_eq!(gateway.wait_for_confirmation(BRIDGE_TX_ID).await, Ok(()));
}

#[tokio::test]
async fn test_null_payment_address_is_none() {
    fn no_address(_method: &str, _params: &Value) -> Value {
        json!({ "result": null })
    }
    let gateway = RpcWalletGateway::new(&spawn_bridge(no_address).await, 2_000);
    assert_eq!(gateway.payment_address().await, None);
}

#[tokio::test]
async fn test_successful_finalize_returns_the_transaction() {
    let gateway = RpcWalletGateway::new(&spawn_bridge(healthy).await, 2_000);

    assert!(gateway.is_connected().await);
    assert_eq!(
        gateway.payment_address().await.as_deref(),
        Some("bcrt1qlocalbridge")
    );

    let tx = gateway.finalize_transaction().await.unwrap();
    assert_eq!(tx.id, BRIDGE_TX_ID);
    assert_eq!(tx.hex, "02000000000101");
}

#[tokio::test]
async fn test_error_replies_are_tagged() {
    let gateway = RpcWalletGateway::new(&spawn_bridge(failing).await, 2_000);

    let finalize = gateway.finalize_transaction().await.unwrap_err();
    assert!(matches!(finalize, GatewayError::IndexerMismatch { .. }));

    let queue = gateway
        .add_tx_intention(
            axis_launchpad::types::TxIntention::contract_call("0xfactory", "0x5b060530"),
            true,
        )
        .await
        .unwrap_err();
    assert_eq!(queue, GatewayError::NotConnected);

    assert!(!gateway.is_connected().await);
}

#[tokio::test]
async fn test_reply_without_result_or_error_is_transport_failure() {
    let gateway = RpcWalletGateway::new(&spawn_bridge(empty).await, 2_000);

    let err = gateway.wait_for_confirmation(BRIDGE_TX_ID).await.unwrap_err();
    assert_eq!(
        err,
        GatewayError::Transport {
            message: "midl_waitForTransaction returned neither result nor error".to_string()
        }
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// LAUNCH THROUGH THE BRIDGE
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_live_launch_through_the_bridge_completes() {
    let mut config = LaunchpadConfig::regtest();
    config.launch.demo_mode = false;
    config.wallet.bridge_url = spawn_bridge(healthy).await;

    let gateway = RpcWalletGateway::new(&config.wallet.bridge_url, 2_000);
    let index = MockUtxoIndex::with_utxos(vec![Utxo {
        txid: "aa".to_string(),
        vout: 0,
        value: 150_000,
    }]);
    let context = LaunchContext::new(config, Arc::new(gateway), Arc::new(index));
    let orchestrator = LaunchOrchestrator::new(Arc::new(context));
    orchestrator.set_form(LaunchForm::simple("A meme coin about cats on Bitcoin"));

    let report = orchestrator.submit().await.unwrap();

    assert!(report.succeeded());
    assert_eq!(report.phase, Phase::Completed);
    assert_eq!(report.failure, None);
    assert_eq!(report.btc_tx_id.as_deref(), Some(BRIDGE_TX_ID));
    assert_eq!(report.evm_tx_hash.as_deref(), Some(BRIDGE_EVM_HASH));

    let lines = orchestrator.log().snapshot().await;
    let tail = &lines[lines.len() - 2..];
    assert_eq!(tail[0].kind, LogKind::Success);
    assert_eq!(tail[0].text, "Deployment successful. Token MCC created.");
    assert_eq!(
        tail[1].text,
        format!("BTC transaction confirmed: {}", BRIDGE_TX_ID)
    );
    assert!(!lines.iter().any(|l| l.kind == LogKind::Error));
}
