//! `axis create-token`: the factory call without the launch terminal.
//!
//! Talks to a signer bridge holding a local key instead of the browser
//! wallet, so it sidesteps the wallet/indexer mismatch entirely.

use anyhow::Context;
use axis_config::LaunchpadConfig;
use axis_gateway::{encode_create_token, GatewayError, RpcWalletGateway, WalletGateway};
use axis_types::{BroadcastRequest, TxIntention};
use tracing::info;

const RULE: &str = "═══════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────";

/// What a successful factory call left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedToken {
    pub calldata: String,
    pub btc_tx_id: String,
    pub evm_tx_hash: Option<String>,
}

pub async fn run(
    config: &LaunchpadConfig,
    name: &str,
    symbol: &str,
    k: Option<u128>,
    factory: Option<String>,
) -> anyhow::Result<()> {
    let signer_url = config
        .wallet
        .signer_url
        .as_deref()
        .context("wallet.signer_url is not set; create-token needs a signer bridge")?;
    let factory = factory.unwrap_or_else(|| config.factory.address.clone());
    let k = k.unwrap_or(u128::from(config.factory.bonding_curve_k));

    println!("{}", RULE);
    println!("  AXIS Token Creator (CLI)");
    println!("{}", RULE);
    println!("  Name:    {}", name);
    println!("  Symbol:  {}", symbol);
    println!("  K:       {}", k);
    println!("  Factory: {}", factory);
    println!("  Signer:  {}", signer_url);
    println!("{}", THIN_RULE);

    let signer = RpcWalletGateway::new(signer_url, config.wallet.timeout_ms);
    let created = execute(&signer, &factory, name, symbol, k)
        .await
        .context("create-token failed")?;

    println!("\n{}", RULE);
    println!("  TOKEN CREATED SUCCESSFULLY");
    println!("{}", RULE);
    println!("  BTC tx:  {}", config.btc_tx_url(&created.btc_tx_id));
    if let Some(hash) = &created.evm_tx_hash {
        println!("  EVM tx:  {}", config.evm_tx_url(hash));
    }
    println!("  Factory: {}", config.evm_address_url(&factory));
    Ok(())
}

/// Queue, finalize, sign, broadcast and confirm one `createToken` call
pub async fn execute(
    gateway: &dyn WalletGateway,
    factory: &str,
    name: &str,
    symbol: &str,
    k: u128,
) -> Result<CreatedToken, GatewayError> {
    println!("\n1. Encoding createToken intention...");
    let calldata = encode_create_token(name, symbol, k);
    println!("   Calldata: {}...", calldata.get(..42).unwrap_or(&calldata));

    println!("\n2. Queueing EVM transaction intention...");
    let intention = TxIntention::contract_call(factory, calldata.clone());
    let handle = gateway.add_tx_intention(intention, true).await?;

    println!("\n3. Finalizing BTC transaction...");
    let tx = gateway.finalize_transaction().await?;
    println!("   BTC tx: {}", tx.id);

    println!("\n4. Signing and broadcasting...");
    let signed = gateway.sign_intention(&tx.id, &handle).await?;
    let outcome = gateway
        .broadcast(BroadcastRequest {
            serialized_transactions: vec![signed],
            btc_transaction: tx.hex.clone(),
        })
        .await?;
    let evm_tx_hash = outcome.evm_tx_hash().map(str::to_string);

    println!("\n5. Waiting for BTC confirmation...");
    gateway.wait_for_confirmation(&tx.id).await?;

    info!(tx_id = %tx.id, evm_tx_hash = ?evm_tx_hash, symbol = %symbol, "Token created");
    Ok(CreatedToken {
        calldata,
        btc_tx_id: tx.id,
        evm_tx_hash,
    })
}
