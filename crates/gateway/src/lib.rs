//! Gateway layer for the Axis launchpad
//!
//! Everything that touches the wallet, the MIDL executor or the Bitcoin
//! index sits behind the traits in this crate. Adapters tag failures at the
//! boundary so callers never have to parse free-text messages.

pub mod abi;
pub mod error;
pub mod esplora;
pub mod mock;
pub mod rpc;
pub mod wallet;

pub use abi::{encode_create_token, function_selector, CreateTokenCall, CREATE_TOKEN_SIGNATURE};
pub use error::{
    looks_like_indexer_mismatch, looks_like_insufficient_funds, GatewayError, GatewayStep,
    UtxoError,
};
pub use esplora::{EsploraClient, UtxoIndex};
pub use mock::{MockUtxoIndex, MockWalletGateway};
pub use rpc::RpcWalletGateway;
pub use wallet::WalletGateway;
