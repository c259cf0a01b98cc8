use serde::{Deserialize, Serialize};

/// EVM leg of a hybrid transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmTransaction {
    /// Target contract, 0x-prefixed
    pub to: String,
    /// ABI calldata, 0x-prefixed hex
    pub data: String,
}

/// A contract call queued for inclusion in the next hybrid transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxIntention {
    pub evm_transaction: EvmTransaction,
}

impl TxIntention {
    pub fn contract_call(to: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            evm_transaction: EvmTransaction {
                to: to.into(),
                data: data.into(),
            },
        }
    }
}

/// Handle the wallet returns for a queued intention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentionHandle {
    pub id: String,
    pub intention: TxIntention,
}

/// Bitcoin transaction built around the queued intentions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedTransaction {
    pub id: String,
    pub hex: String,
}

/// Serialized EVM transaction signed by the wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedPayload(pub String);

/// Both legs of the hybrid transaction, ready to broadcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastRequest {
    pub serialized_transactions: Vec<SignedPayload>,
    pub btc_transaction: String,
}

/// Broadcast result: gateways return either one EVM hash or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BroadcastOutcome {
    Single(String),
    Many(Vec<String>),
}

impl BroadcastOutcome {
    /// EVM transaction hash of the first leg, if one came back
    pub fn evm_tx_hash(&self) -> Option<&str> {
        let hash = match self {
            BroadcastOutcome::Single(hash) => Some(hash.as_str()),
            BroadcastOutcome::Many(hashes) => hashes.first().map(String::as_str),
        };
        hash.filter(|h| !h.is_empty())
    }
}
