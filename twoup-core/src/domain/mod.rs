//! Domain types for the Two-Up engine

pub mod config;
pub mod outcome;

pub use config::{
    ConfigError, ConfigFingerprint, SessionConfig, StopPolicy, DEFAULT_LOSS_MULTIPLIER,
    DEFAULT_RETOSS_PROBABILITY, DEFAULT_WIN_PROBABILITY, MONEY_TOLERANCE,
};
pub use outcome::{RoundOutcome, SessionResult, TerminalReason};
