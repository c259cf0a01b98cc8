use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axis_gateway::{encode_create_token, GatewayError, GatewayStep};
use axis_types::{
    BroadcastRequest, FinalizedTransaction, FormRejection, IntentionHandle, LaunchForm,
    LaunchMode, LogBuffer, LogLine, SignedPayload, TokenConfig, TxIntention,
};
use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::classify::{classify, failure_lines, FailureKind};
use crate::context::LaunchContext;
use crate::demo::{demo_script, play_demo};
use crate::deriver::derive_token_config;
use crate::preflight::preflight;
use crate::state::{transition, Effect, Phase, PhaseEvent, StateError};
use crate::TerminalLog;

/// Why a submission never started
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a launch is already in flight")]
    InFlight,

    #[error("launchpad is shut down")]
    ShutDown,

    #[error("submission rejected: {0:?}")]
    Rejected(FormRejection),

    #[error(transparent)]
    State(#[from] StateError),
}

/// Summary of a finished attempt
#[derive(Debug, Clone)]
pub struct LaunchReport {
    pub attempt_id: Uuid,
    pub token: TokenConfig,
    /// `Completed` or `Failed`
    pub phase: Phase,
    pub demo: bool,
    pub failure: Option<FailureKind>,
    /// `createToken` calldata sent to the factory, live runs only
    pub calldata: Option<String>,
    pub btc_tx_id: Option<String>,
    pub evm_tx_hash: Option<String>,
}

impl LaunchReport {
    pub fn succeeded(&self) -> bool {
        self.phase == Phase::Completed
    }
}

/// State of one submission, discarded when it ends
#[derive(Debug)]
struct DeploymentAttempt {
    id: Uuid,
    form: LaunchForm,
    demo: bool,
    token: Option<TokenConfig>,
    rejection: Option<FormRejection>,
    payment_address: Option<String>,
    calldata: Option<String>,
    intention: Option<IntentionHandle>,
    finalized: Option<FinalizedTransaction>,
    signed: Option<SignedPayload>,
    evm_tx_hash: Option<String>,
    failure: Option<(GatewayStep, GatewayError)>,
    failure_kind: Option<FailureKind>,
}

impl DeploymentAttempt {
    fn new(form: LaunchForm, demo: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            form,
            demo,
            token: None,
            rejection: None,
            payment_address: None,
            calldata: None,
            intention: None,
            finalized: None,
            signed: None,
            evm_tx_hash: None,
            failure: None,
            failure_kind: None,
        }
    }

    fn token(&self) -> TokenConfig {
        self.token.clone().unwrap_or_default()
    }

    fn fail(&mut self, step: GatewayStep, error: GatewayError) -> PhaseEvent {
        warn!(step = ?step, error = %error, "Launch step failed");
        self.failure = Some((step, error));
        PhaseEvent::StepFailed
    }

    /// An earlier step should have left a result behind
    fn missing(&mut self, step: GatewayStep, what: &str) -> PhaseEvent {
        self.fail(
            step,
            GatewayError::Transport {
                message: format!("{} unavailable", what),
            },
        )
    }

    fn report(&self, phase: Phase) -> LaunchReport {
        LaunchReport {
            attempt_id: self.id,
            token: self.token(),
            phase,
            demo: self.demo,
            failure: self.failure_kind,
            calldata: self.calldata.clone(),
            btc_tx_id: self.finalized.as_ref().map(|tx| tx.id.clone()),
            evm_tx_hash: self.evm_tx_hash.clone(),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Releases the in-flight flag however the attempt ends, including when the
/// submission future is dropped mid-step. Accepted attempts also reset the
/// form, against the mode they were submitted in.
struct AttemptGuard<'a> {
    in_flight: &'a AtomicBool,
    form: &'a Mutex<LaunchForm>,
    phase: &'a Mutex<Phase>,
    accepted: Option<LaunchMode>,
}

impl AttemptGuard<'_> {
    fn accept(&mut self, mode: LaunchMode) {
        self.accepted = Some(mode);
    }
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        if let Some(mode) = self.accepted {
            lock(self.form).reset_for(mode);
        }
        *lock(self.phase) = Phase::Idle;
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

/// Runs launch submissions, one at a time, through the phase table
pub struct LaunchOrchestrator {
    context: Arc<LaunchContext>,
    form: Mutex<LaunchForm>,
    phase: Mutex<Phase>,
    in_flight: AtomicBool,
    demo_mode: AtomicBool,
    log: TerminalLog,
    activity: TerminalLog,
}

impl LaunchOrchestrator {
    pub fn new(context: Arc<LaunchContext>) -> Self {
        let config = context.config();
        let demo_mode = config.launch.demo_mode;
        let log = TerminalLog::with_banner(config.network.environment.as_str());
        Self {
            context,
            form: Mutex::new(LaunchForm::default()),
            phase: Mutex::new(Phase::Idle),
            in_flight: AtomicBool::new(false),
            demo_mode: AtomicBool::new(demo_mode),
            log,
            activity: TerminalLog::new(LogBuffer::activity_feed()),
        }
    }

    pub fn context(&self) -> &LaunchContext {
        &self.context
    }

    /// Orchestration log
    pub fn log(&self) -> &TerminalLog {
        &self.log
    }

    /// Most recent launches, capped
    pub fn activity(&self) -> &TerminalLog {
        &self.activity
    }

    pub fn phase(&self) -> Phase {
        *lock(&self.phase)
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn demo_mode(&self) -> bool {
        self.demo_mode.load(Ordering::SeqCst)
    }

    pub fn set_demo_mode(&self, enabled: bool) {
        self.demo_mode.store(enabled, Ordering::SeqCst);
    }

    pub fn form(&self) -> LaunchForm {
        lock(&self.form).clone()
    }

    pub fn set_form(&self, form: LaunchForm) {
        *lock(&self.form) = form;
    }

    pub fn update_form(&self, edit: impl FnOnce(&mut LaunchForm)) {
        edit(&mut lock(&self.form));
    }

    /// Submit the current form.
    ///
    /// A second call while an attempt is running is dropped with
    /// [`SubmitError::InFlight`] and leaves the log untouched.
    pub async fn submit(&self) -> Result<LaunchReport, SubmitError> {
        if self.context.is_shut_down() {
            return Err(SubmitError::ShutDown);
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Submission dropped: attempt already in flight");
            return Err(SubmitError::InFlight);
        }

        let mut guard = AttemptGuard {
            in_flight: &self.in_flight,
            form: &self.form,
            phase: &self.phase,
            accepted: None,
        };
        let mut attempt = DeploymentAttempt::new(self.form(), self.demo_mode());
        let span = info_span!("launch", attempt_id = %attempt.id, demo = attempt.demo);

        self.drive(&mut attempt, &mut guard).instrument(span).await
    }

    async fn drive(
        &self,
        attempt: &mut DeploymentAttempt,
        guard: &mut AttemptGuard<'_>,
    ) -> Result<LaunchReport, SubmitError> {
        let mut phase = Phase::Idle;
        let mut event = PhaseEvent::Submitted;

        loop {
            let (next, effect) = transition(phase, event)?;
            debug!(from = %phase, to = %next, event = ?event, effect = ?effect, "Phase transition");
            phase = next;
            *lock(&self.phase) = phase;

            match self.run_effect(effect, attempt, guard).await {
                Some(next_event) => event = next_event,
                None => break,
            }
        }

        match (phase, attempt.rejection.take()) {
            (Phase::Idle, Some(rejection)) => Err(SubmitError::Rejected(rejection)),
            _ => {
                info!(phase = %phase, failure = ?attempt.failure_kind, "Launch attempt finished");
                Ok(attempt.report(phase))
            }
        }
    }

    async fn run_effect(
        &self,
        effect: Effect,
        attempt: &mut DeploymentAttempt,
        guard: &mut AttemptGuard<'_>,
    ) -> Option<PhaseEvent> {
        match effect {
            Effect::Validate => Some(self.validate(attempt, guard).await),
            Effect::Discard => None,
            Effect::PlayDemo => {
                let config = self.context.config();
                let script = demo_script(&attempt.token(), config);
                play_demo(script, config.launch.demo_delay_scale, &self.log).await;
                Some(PhaseEvent::DemoFinished)
            }
            Effect::Queue => Some(self.queue(attempt).await),
            Effect::Finalize => Some(self.finalize(attempt).await),
            Effect::Sign => Some(self.sign(attempt).await),
            Effect::Broadcast => Some(self.broadcast(attempt).await),
            Effect::Confirm => Some(self.confirm(attempt).await),
            Effect::ReportSuccess => {
                self.report_success(attempt).await;
                None
            }
            Effect::ReportFailure => {
                self.report_failure(attempt).await;
                None
            }
            Effect::Finish => {
                self.activity
                    .push(LogLine::info(format!(
                        "{} launched (demo)",
                        attempt.token().ticker()
                    )))
                    .await;
                None
            }
        }
    }

    async fn validate(
        &self,
        attempt: &mut DeploymentAttempt,
        guard: &mut AttemptGuard<'_>,
    ) -> PhaseEvent {
        let explicit = match attempt.form.check() {
            Ok(explicit) => explicit,
            Err(rejection) => {
                debug!(rejection = ?rejection, "Submission rejected at entry guard");
                attempt.rejection = Some(rejection);
                return PhaseEvent::Rejected;
            }
        };

        let token = explicit.unwrap_or_else(|| derive_token_config(&attempt.form.prompt));
        guard.accept(attempt.form.mode);
        info!(name = %token.name(), ticker = %token.ticker(), "Token config ready");

        self.log.push(LogLine::user(attempt.form.echo(&token))).await;
        attempt.token = Some(token);

        if attempt.demo {
            PhaseEvent::DemoSelected
        } else {
            PhaseEvent::LiveSelected
        }
    }

    async fn queue(&self, attempt: &mut DeploymentAttempt) -> PhaseEvent {
        let gateway = self.context.gateway();
        let config = self.context.config();

        if !gateway.is_connected().await {
            return attempt.fail(GatewayStep::Connect, GatewayError::NotConnected);
        }

        attempt.payment_address = gateway.payment_address().await;
        if config.launch.preflight_enabled {
            if let Some(address) = attempt.payment_address.as_deref() {
                preflight(self.context.utxo_index(), address, &self.log).await;
            }
        }

        let token = attempt.token();
        let calldata = encode_create_token(
            token.name(),
            token.ticker(),
            u128::from(config.factory.bonding_curve_k),
        );
        self.log
            .push(LogLine::system(format!(
                "Queueing createToken({}, {}) intention...",
                token.name(),
                token.ticker()
            )))
            .await;

        let intention =
            TxIntention::contract_call(config.factory.address.clone(), calldata.clone());
        attempt.calldata = Some(calldata);

        match gateway.add_tx_intention(intention, true).await {
            Ok(handle) => {
                debug!(intention_id = %handle.id, "Intention queued");
                attempt.intention = Some(handle);
                PhaseEvent::Queued
            }
            Err(e) => attempt.fail(GatewayStep::Queue, e),
        }
    }

    async fn finalize(&self, attempt: &mut DeploymentAttempt) -> PhaseEvent {
        self.log
            .push(LogLine::system("Finalizing BTC transaction..."))
            .await;

        match self.context.gateway().finalize_transaction().await {
            Ok(tx) => {
                info!(tx_id = %tx.id, "BTC transaction finalized");
                self.log
                    .push(LogLine::system(format!("BTC tx prepared: {}", tx.id)))
                    .await;
                attempt.finalized = Some(tx);
                PhaseEvent::Finalized
            }
            Err(e) => attempt.fail(GatewayStep::Finalize, e),
        }
    }

    async fn sign(&self, attempt: &mut DeploymentAttempt) -> PhaseEvent {
        let (Some(tx), Some(intention)) = (attempt.finalized.as_ref(), attempt.intention.as_ref())
        else {
            return attempt.missing(GatewayStep::Sign, "finalized transaction or intention");
        };

        self.log
            .push(LogLine::system("Signing intention with wallet..."))
            .await;

        match self.context.gateway().sign_intention(&tx.id, intention).await {
            Ok(signed) => {
                attempt.signed = Some(signed);
                PhaseEvent::Signed
            }
            Err(e) => attempt.fail(GatewayStep::Sign, e),
        }
    }

    async fn broadcast(&self, attempt: &mut DeploymentAttempt) -> PhaseEvent {
        let (Some(tx), Some(signed)) = (attempt.finalized.as_ref(), attempt.signed.clone()) else {
            return attempt.missing(GatewayStep::Broadcast, "signed payload");
        };

        self.log
            .push(LogLine::system("Broadcasting BTC + EVM transactions..."))
            .await;

        let request = BroadcastRequest {
            serialized_transactions: vec![signed],
            btc_transaction: tx.hex.clone(),
        };

        match self.context.gateway().broadcast(request).await {
            Ok(outcome) => {
                if let Some(hash) = outcome.evm_tx_hash() {
                    info!(evm_tx_hash = %hash, "Hybrid transaction broadcast");
                    self.log
                        .push(
                            LogLine::system(format!("EVM tx hash: {}", hash))
                                .with_link(self.context.config().evm_tx_url(hash)),
                        )
                        .await;
                    attempt.evm_tx_hash = Some(hash.to_string());
                }
                PhaseEvent::Broadcast
            }
            Err(e) => attempt.fail(GatewayStep::Broadcast, e),
        }
    }

    async fn confirm(&self, attempt: &mut DeploymentAttempt) -> PhaseEvent {
        let Some(tx_id) = attempt.finalized.as_ref().map(|tx| tx.id.clone()) else {
            return attempt.missing(GatewayStep::Confirm, "finalized transaction");
        };

        self.log
            .push(LogLine::system(format!(
                "Waiting for BTC confirmation: {}",
                tx_id
            )))
            .await;

        // Subscribe before checking the flag so a shutdown in between is seen
        let mut shutdown = self.context.subscribe_shutdown();
        let result = if self.context.is_shut_down() {
            Err(GatewayError::Cancelled)
        } else {
            tokio::select! {
                result = self.context.gateway().wait_for_confirmation(&tx_id) => result,
                _ = shutdown.recv() => {
                    warn!(tx_id = %tx_id, "Confirmation wait cancelled by shutdown");
                    Err(GatewayError::Cancelled)
                }
            }
        };

        match result {
            Ok(()) => {
                info!(tx_id = %tx_id, "BTC transaction confirmed");
                PhaseEvent::Confirmed
            }
            Err(e) => attempt.fail(GatewayStep::Confirm, e),
        }
    }

    async fn report_success(&self, attempt: &DeploymentAttempt) {
        let config = self.context.config();
        let token = attempt.token();
        let mut created = LogLine::success(format!(
            "Deployment successful. Token {} created.",
            token.ticker()
        ));
        if let Some(hash) = attempt.evm_tx_hash.as_deref() {
            created = created.with_link(config.evm_tx_url(hash));
        }

        let mut lines = vec![created];
        if let Some(tx) = attempt.finalized.as_ref() {
            lines.push(
                LogLine::success(format!("BTC transaction confirmed: {}", tx.id))
                    .with_link(config.btc_tx_url(&tx.id)),
            );
        }
        self.log.extend(lines).await;

        self.activity
            .push(LogLine::success(format!(
                "{} launched ({})",
                token.ticker(),
                token.name()
            )))
            .await;
    }

    async fn report_failure(&self, attempt: &mut DeploymentAttempt) {
        let token = attempt.token();
        let Some((step, error)) = attempt.failure.as_ref() else {
            self.log
                .push(LogLine::error("Deployment failed: unknown error"))
                .await;
            attempt.failure_kind = Some(FailureKind::Unclassified);
            return;
        };

        let kind = classify(*step, error);
        info!(step = ?step, kind = ?kind, error = %error, "Launch failed");
        self.log
            .extend(failure_lines(
                kind,
                error,
                &token,
                attempt.payment_address.as_deref(),
            ))
            .await;
        attempt.failure_kind = Some(kind);

        self.activity
            .push(LogLine::warning(format!("{} launch failed", token.ticker())))
            .await;
    }
}
