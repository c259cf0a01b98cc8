//! Axis launchpad CLI
//!
//! Drives the launch terminal from a shell:
//! - `derive` / `encode`: inspect what a submission would send
//! - `preflight`: advisory balance check for an address
//! - `launch`: one submission through the orchestrator, demo or live
//! - `wallet`: connect / disconnect the bridge's wallet
//! - `create-token`: direct factory call through a local signer, the
//!   workaround for the wallet/indexer mismatch

mod create_token;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axis_config::{validate_config, ConfigLoader, LaunchpadConfig, ENV_PREFIX};
use axis_gateway::{
    encode_create_token, EsploraClient, MockUtxoIndex, MockWalletGateway, RpcWalletGateway,
    WalletGateway,
};
use axis_orchestrator::{
    derive_token_config, preflight, LaunchContext, LaunchOrchestrator, TerminalLog,
};
use axis_types::{LaunchForm, Utxo, DEFAULT_SUPPLY};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Axis launchpad CLI
#[derive(Parser, Debug)]
#[command(name = "axis", author, version, about, long_about = None)]
struct Cli {
    /// Config file (TOML, YAML or JSON); AXIS_* variables override it
    #[arg(long, global = true, env = "AXIS_CONFIG")]
    config: Option<PathBuf>,

    /// Emit tracing output as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive a token name and ticker from a description
    Derive {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Print createToken calldata
    Encode {
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
        /// Bonding curve constant (defaults to factory.bonding_curve_k)
        #[arg(long)]
        k: Option<u128>,
    },

    /// Check an address for spendable UTXOs
    Preflight { address: String },

    /// Run one launch submission, streaming the terminal log
    Launch {
        /// Play the demo script instead of calling the wallet
        #[arg(long)]
        demo: bool,

        /// Use the in-memory gateway
        #[arg(long)]
        dry_run: bool,

        /// Connect the wallet before submitting
        #[arg(long)]
        connect: bool,

        /// Token name (advanced mode, requires --ticker)
        #[arg(long, requires = "ticker")]
        name: Option<String>,

        /// Token ticker (advanced mode, requires --name)
        #[arg(long, requires = "name")]
        ticker: Option<String>,

        #[arg(long, default_value = DEFAULT_SUPPLY)]
        supply: String,

        /// Free-text description (simple mode)
        text: Vec<String>,
    },

    /// Wallet connection on the bridge
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },

    /// Create a token directly through the factory with a local signer
    CreateToken {
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        k: Option<u128>,
        #[arg(long)]
        factory: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum WalletAction {
    Connect,
    Disconnect,
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    init_tracing(&config.network.log_level, cli.json_logs);

    debug!(environment = %config.network.environment.as_str(), "Configuration loaded");

    match cli.command {
        Command::Derive { text } => {
            let token = derive_token_config(&text.join(" "));
            println!("name:   {}", token.name());
            println!("ticker: {}", token.ticker());
        }
        Command::Encode { name, symbol, k } => {
            let k = k.unwrap_or(u128::from(config.factory.bonding_curve_k));
            println!("{}", encode_create_token(&name, &symbol, k));
        }
        Command::Preflight { address } => run_preflight(&config, &address).await,
        Command::Launch {
            demo,
            dry_run,
            connect,
            name,
            ticker,
            supply,
            text,
        } => {
            let form = match (name, ticker) {
                (Some(name), Some(ticker)) => LaunchForm::advanced(name, ticker, supply),
                _ => LaunchForm::simple(text.join(" ")),
            };
            run_launch(config, form, demo, dry_run, connect).await?;
        }
        Command::Wallet { action } => run_wallet(&config, action).await?,
        Command::CreateToken {
            name,
            symbol,
            k,
            factory,
        } => create_token::run(&config, &name, &symbol, k, factory).await?,
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<LaunchpadConfig> {
    let config = match path {
        Some(path) => ConfigLoader::from_file_with_env(path, ENV_PREFIX)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ConfigLoader::from_env().context("loading configuration from environment")?,
    };
    validate_config(&config)?;
    Ok(config)
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("info,axis={}", level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run_preflight(config: &LaunchpadConfig, address: &str) {
    let index = EsploraClient::new(&config.network.utxo_index_url, config.wallet.timeout_ms);
    let log = TerminalLog::default();
    let ready = preflight(&index, address, &log).await;
    for line in log.snapshot().await {
        println!("{}", line);
    }
    debug!(ready = ready, "Pre-flight finished");
}

async fn run_launch(
    mut config: LaunchpadConfig,
    form: LaunchForm,
    demo: bool,
    dry_run: bool,
    connect: bool,
) -> anyhow::Result<()> {
    if demo {
        config.launch.demo_mode = true;
    }

    let context = Arc::new(if dry_run {
        info!("Dry run: using the in-memory wallet gateway");
        let index = MockUtxoIndex::with_utxos(vec![Utxo {
            txid: String::new(),
            vout: 0,
            value: 100_000,
        }]);
        LaunchContext::new(config, Arc::new(MockWalletGateway::new()), Arc::new(index))
    } else {
        LaunchContext::from_config(config)
    });

    if connect && !context.config().launch.demo_mode {
        let connector = context.config().wallet.connector_id.clone();
        context
            .gateway()
            .connect(&connector)
            .await
            .with_context(|| format!("connecting wallet via {}", connector))?;
    }

    let signal_context = context.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, shutting down");
            signal_context.shutdown();
        }
    });

    let orchestrator = LaunchOrchestrator::new(context.clone());
    orchestrator.set_form(form);

    for line in orchestrator.log().snapshot().await {
        println!("{}", line);
    }
    let mut lines = orchestrator.log().subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match lines.recv().await {
                Ok(line) => println!("{}", line),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped = skipped, "Log printer fell behind")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let result = orchestrator.submit().await;
    // Closing the log channel lets the printer drain and stop
    drop(orchestrator);
    printer.await.context("log printer")?;

    let report = result?;
    if !report.succeeded() {
        anyhow::bail!(
            "launch of {} failed ({:?})",
            report.token.ticker(),
            report.failure
        );
    }
    info!(attempt_id = %report.attempt_id, ticker = %report.token.ticker(), "Launch completed");
    Ok(())
}

async fn run_wallet(config: &LaunchpadConfig, action: WalletAction) -> anyhow::Result<()> {
    let gateway = RpcWalletGateway::new(&config.wallet.bridge_url, config.wallet.timeout_ms);

    match action {
        WalletAction::Connect => {
            gateway.connect(&config.wallet.connector_id).await?;
            println!("connected via {}", config.wallet.connector_id);
        }
        WalletAction::Disconnect => {
            gateway.disconnect().await?;
            println!("disconnected");
        }
        WalletAction::Status => {
            let status = serde_json::json!({
                "bridge": gateway.endpoint(),
                "connected": gateway.is_connected().await,
                "payment_address": gateway.payment_address().await,
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}
