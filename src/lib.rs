//! Axis launchpad
//!
//! Token launch terminal for MIDL: free text or explicit fields in, a
//! `createToken` call carried by a BTC + EVM hybrid transaction out.

pub use axis_config as config;
pub use axis_gateway as gateway;
pub use axis_orchestrator as orchestrator;
pub use axis_types as types;
