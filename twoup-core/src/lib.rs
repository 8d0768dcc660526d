//! Two-Up Core — session configuration, round resolution, Martingale wager
//! control and the single-session simulator.
//!
//! This crate contains the per-session engine:
//! - Domain types (session config, stop policies, outcomes, session results)
//! - Round resolver with a guarded re-toss loop
//! - Martingale wager state machine
//! - Session simulator with ruin and cap detection
//! - Deterministic RNG hierarchy for reproducible Monte Carlo trials

pub mod domain;
pub mod engine;
pub mod error;
pub mod rng;

pub use domain::{
    ConfigError, ConfigFingerprint, RoundOutcome, SessionConfig, SessionResult, StopPolicy,
    TerminalReason, DEFAULT_LOSS_MULTIPLIER, DEFAULT_RETOSS_PROBABILITY, DEFAULT_WIN_PROBABILITY,
    MONEY_TOLERANCE,
};
pub use engine::{
    resolve_round, simulate_session, RoundResolver, SessionSimulator, WagerController,
    WagerState,
};
pub use error::SimError;
pub use rng::RngHierarchy;
