//! In-memory gateways for tests and dry runs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axis_types::{
    BroadcastOutcome, BroadcastRequest, FinalizedTransaction, IntentionHandle, SignedPayload,
    TxIntention, Utxo,
};

use crate::{GatewayError, GatewayStep, UtxoError, UtxoIndex, WalletGateway};

pub const MOCK_PAYMENT_ADDRESS: &str = "bcrt1qmockpaymentaddress0000000000000000000";
pub const MOCK_BTC_TX_ID: &str =
    "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";
pub const MOCK_EVM_TX_HASH: &str =
    "0x8f3c2a1b9d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8";

#[derive(Debug)]
struct MockState {
    connected: bool,
    payment_address: Option<String>,
    failures: HashMap<GatewayStep, GatewayError>,
    broadcast_outcome: BroadcastOutcome,
    hang_on_confirmation: bool,
    queued: Vec<TxIntention>,
    journal: Vec<GatewayStep>,
}

/// Scriptable wallet gateway. Every step succeeds unless a failure has been
/// registered for it.
#[derive(Debug, Clone)]
pub struct MockWalletGateway {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockWalletGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWalletGateway {
    /// Connected wallet with a payment address
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                connected: true,
                payment_address: Some(MOCK_PAYMENT_ADDRESS.to_string()),
                failures: HashMap::new(),
                broadcast_outcome: BroadcastOutcome::Many(vec![MOCK_EVM_TX_HASH.to_string()]),
                hang_on_confirmation: false,
                queued: Vec::new(),
                journal: Vec::new(),
            })),
        }
    }

    pub fn disconnected() -> Self {
        let mock = Self::new();
        {
            let mut state = mock.lock();
            state.connected = false;
            state.payment_address = None;
        }
        mock
    }

    /// Fail the given step with `error`
    pub fn fail_at(self, step: GatewayStep, error: GatewayError) -> Self {
        self.lock().failures.insert(step, error);
        self
    }

    /// Fail the given step with a raw wallet message, tagged the way a real
    /// adapter would tag it
    pub fn fail_with_message(self, step: GatewayStep, message: &str) -> Self {
        self.fail_at(step, GatewayError::tagged(step, message))
    }

    pub fn with_broadcast_outcome(self, outcome: BroadcastOutcome) -> Self {
        self.lock().broadcast_outcome = outcome;
        self
    }

    pub fn with_payment_address(self, address: Option<&str>) -> Self {
        self.lock().payment_address = address.map(str::to_string);
        self
    }

    /// Never resolve the confirmation wait
    pub fn hang_on_confirmation(self) -> Self {
        self.lock().hang_on_confirmation = true;
        self
    }

    /// Steps invoked so far, in order
    pub fn journal(&self) -> Vec<GatewayStep> {
        self.lock().journal.clone()
    }

    pub fn call_count(&self, step: GatewayStep) -> usize {
        self.lock().journal.iter().filter(|s| **s == step).count()
    }

    /// Intentions currently queued
    pub fn queued(&self) -> Vec<TxIntention> {
        self.lock().queued.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A test that panicked while holding the lock already failed
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, step: GatewayStep) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.journal.push(step);
        match state.failures.get(&step) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl WalletGateway for MockWalletGateway {
    async fn is_connected(&self) -> bool {
        self.lock().connected
    }

    async fn connect(&self, _connector_id: &str) -> Result<(), GatewayError> {
        self.record(GatewayStep::Connect)?;
        let mut state = self.lock();
        state.connected = true;
        if state.payment_address.is_none() {
            state.payment_address = Some(MOCK_PAYMENT_ADDRESS.to_string());
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.connected = false;
        state.payment_address = None;
        Ok(())
    }

    async fn payment_address(&self) -> Option<String> {
        let state = self.lock();
        if state.connected {
            state.payment_address.clone()
        } else {
            None
        }
    }

    async fn add_tx_intention(
        &self,
        intention: TxIntention,
        reset: bool,
    ) -> Result<IntentionHandle, GatewayError> {
        self.record(GatewayStep::Queue)?;
        let mut state = self.lock();
        if reset {
            state.queued.clear();
        }
        state.queued.push(intention.clone());
        Ok(IntentionHandle {
            id: format!("intention-{}", state.queued.len()),
            intention,
        })
    }

    async fn finalize_transaction(&self) -> Result<FinalizedTransaction, GatewayError> {
        self.record(GatewayStep::Finalize)?;
        Ok(FinalizedTransaction {
            id: MOCK_BTC_TX_ID.to_string(),
            hex: "02000000000100".to_string(),
        })
    }

    async fn sign_intention(
        &self,
        tx_id: &str,
        intention: &IntentionHandle,
    ) -> Result<SignedPayload, GatewayError> {
        self.record(GatewayStep::Sign)?;
        Ok(SignedPayload(format!("signed:{}:{}", tx_id, intention.id)))
    }

    async fn broadcast(
        &self,
        _request: BroadcastRequest,
    ) -> Result<BroadcastOutcome, GatewayError> {
        self.record(GatewayStep::Broadcast)?;
        Ok(self.lock().broadcast_outcome.clone())
    }

    async fn wait_for_confirmation(&self, _tx_id: &str) -> Result<(), GatewayError> {
        self.record(GatewayStep::Confirm)?;
        let hang = self.lock().hang_on_confirmation;
        if hang {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}

/// UTXO index returning a fixed answer
#[derive(Debug, Clone)]
pub struct MockUtxoIndex {
    response: Result<Vec<Utxo>, UtxoError>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockUtxoIndex {
    pub fn with_utxos(utxos: Vec<Utxo>) -> Self {
        Self {
            response: Ok(utxos),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn empty() -> Self {
        Self::with_utxos(Vec::new())
    }

    pub fn failing(error: UtxoError) -> Self {
        Self {
            response: Err(error),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Addresses queried so far
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }
}

#[async_trait]
impl UtxoIndex for MockUtxoIndex {
    async fn address_utxos(&self, address: &str) -> Result<Vec<Utxo>, UtxoError> {
        match self.queries.lock() {
            Ok(mut q) => q.push(address.to_string()),
            Err(e) => e.into_inner().push(address.to_string()),
        }
        self.response.clone()
    }
}
