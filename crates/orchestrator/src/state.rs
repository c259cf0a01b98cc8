//! Launch phases and the transition table that drives them
//!
//! Every step of a submission is a row in [`TRANSITIONS`]: the current phase
//! and the event that just happened select the next phase and the effect to
//! run. The orchestrator executes the effect, which yields the next event,
//! until an effect ends the attempt. What happens when step N fails is a
//! table lookup.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a submission currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    DemoRun,
    Queueing,
    Finalizing,
    Signing,
    Broadcasting,
    Confirming,
    Completed,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Validating => "validating",
            Phase::DemoRun => "demo_run",
            Phase::Queueing => "queueing",
            Phase::Finalizing => "finalizing",
            Phase::Signing => "signing",
            Phase::Broadcasting => "broadcasting",
            Phase::Confirming => "confirming",
            Phase::Completed => "completed",
            Phase::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the previous effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseEvent {
    Submitted,
    /// Entry guard refused the form
    Rejected,
    DemoSelected,
    LiveSelected,
    DemoFinished,
    Queued,
    Finalized,
    Signed,
    Broadcast,
    Confirmed,
    /// A step failed; details travel with the attempt
    StepFailed,
}

/// Work to run on entering the next phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Check the form and derive the token config
    Validate,
    /// Drop the submission without touching the log
    Discard,
    PlayDemo,
    /// Wallet check, pre-flight, encode and queue the intention
    Queue,
    Finalize,
    Sign,
    Broadcast,
    Confirm,
    ReportSuccess,
    ReportFailure,
    /// Nothing left to do
    Finish,
}

impl Effect {
    /// Whether running this effect ends the attempt
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Effect::Discard | Effect::ReportSuccess | Effect::ReportFailure | Effect::Finish
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("no transition from {phase} on {event:?}")]
    IllegalTransition { phase: Phase, event: PhaseEvent },
}

/// (from, event, to, effect)
pub const TRANSITIONS: &[(Phase, PhaseEvent, Phase, Effect)] = &[
    (Phase::Idle, PhaseEvent::Submitted, Phase::Validating, Effect::Validate),
    (Phase::Validating, PhaseEvent::Rejected, Phase::Idle, Effect::Discard),
    (Phase::Validating, PhaseEvent::DemoSelected, Phase::DemoRun, Effect::PlayDemo),
    (Phase::Validating, PhaseEvent::LiveSelected, Phase::Queueing, Effect::Queue),
    (Phase::DemoRun, PhaseEvent::DemoFinished, Phase::Completed, Effect::Finish),
    (Phase::Queueing, PhaseEvent::Queued, Phase::Finalizing, Effect::Finalize),
    (Phase::Queueing, PhaseEvent::StepFailed, Phase::Failed, Effect::ReportFailure),
    (Phase::Finalizing, PhaseEvent::Finalized, Phase::Signing, Effect::Sign),
    (Phase::Finalizing, PhaseEvent::StepFailed, Phase::Failed, Effect::ReportFailure),
    (Phase::Signing, PhaseEvent::Signed, Phase::Broadcasting, Effect::Broadcast),
    (Phase::Signing, PhaseEvent::StepFailed, Phase::Failed, Effect::ReportFailure),
    (Phase::Broadcasting, PhaseEvent::Broadcast, Phase::Confirming, Effect::Confirm),
    (Phase::Broadcasting, PhaseEvent::StepFailed, Phase::Failed, Effect::ReportFailure),
    (Phase::Confirming, PhaseEvent::Confirmed, Phase::Completed, Effect::ReportSuccess),
    (Phase::Confirming, PhaseEvent::StepFailed, Phase::Failed, Effect::ReportFailure),
];

/// Look up the next phase and effect
pub fn transition(phase: Phase, event: PhaseEvent) -> Result<(Phase, Effect), StateError> {
    TRANSITIONS
        .iter()
        .find(|(from, on, _, _)| *from == phase && *on == event)
        .map(|(_, _, to, effect)| (*to, *effect))
        .ok_or(StateError::IllegalTransition { phase, event })
}
