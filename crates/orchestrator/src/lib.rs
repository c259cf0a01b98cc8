//! Launch orchestration for the Axis launchpad
//!
//! Takes a launch form (free text or explicit fields) to a confirmed
//! BTC + EVM hybrid transaction, or through the demo script, writing a
//! human-readable log as it goes.
//!
//! - [`derive_token_config`]: free text to name / ticker
//! - [`LaunchOrchestrator`]: one submission at a time through the [`Phase`] table
//! - [`classify`]: failure classes and their remediation text
//! - [`preflight`]: advisory balance check

pub mod classify;
pub mod context;
pub mod demo;
pub mod deriver;
pub mod orchestrator;
pub mod preflight;
pub mod state;
pub mod terminal;


pub use classify::{
    classify, failure_lines, funding_remediation, is_insufficient_funds, is_known_wallet_bug,
    known_bug_diagnostic, FailureKind,
};
pub use context::LaunchContext;
pub use demo::{demo_script, play_demo, DemoStep};
pub use deriver::derive_token_config;
pub use orchestrator::{LaunchOrchestrator, LaunchReport, SubmitError};
pub use preflight::{format_btc, preflight};
pub use state::{transition, Effect, Phase, PhaseEvent, StateError, TRANSITIONS};
pub use terminal::TerminalLog;
