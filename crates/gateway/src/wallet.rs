use async_trait::async_trait;
use axis_types::{
    BroadcastOutcome, BroadcastRequest, FinalizedTransaction, IntentionHandle, SignedPayload,
    TxIntention,
};

use crate::GatewayError;

/// Wallet and MIDL executor capabilities the launch flow relies on
#[async_trait]
pub trait WalletGateway: Send + Sync {
    /// Whether a wallet account is currently connected
    async fn is_connected(&self) -> bool;

    /// Connect through the given connector (e.g. "xverse")
    async fn connect(&self, connector_id: &str) -> Result<(), GatewayError>;

    async fn disconnect(&self) -> Result<(), GatewayError>;

    /// Bitcoin payment address of the connected account, if any
    async fn payment_address(&self) -> Option<String>;

    /// Queue a contract call for the next hybrid transaction.
    /// `reset` drops intentions left over from earlier attempts.
    async fn add_tx_intention(
        &self,
        intention: TxIntention,
        reset: bool,
    ) -> Result<IntentionHandle, GatewayError>;

    /// Build and finalize the Bitcoin transaction wrapping the queued intentions
    async fn finalize_transaction(&self) -> Result<FinalizedTransaction, GatewayError>;

    /// Sign the intention bound to the finalized transaction
    async fn sign_intention(
        &self,
        tx_id: &str,
        intention: &IntentionHandle,
    ) -> Result<SignedPayload, GatewayError>;

    /// Broadcast the signed Bitcoin transaction and the EVM leg
    async fn broadcast(&self, request: BroadcastRequest)
        -> Result<BroadcastOutcome, GatewayError>;

    /// Block until the Bitcoin transaction confirms. No timeout is applied
    /// here; whatever bound exists belongs to the implementation.
    async fn wait_for_confirmation(&self, tx_id: &str) -> Result<(), GatewayError>;
}
