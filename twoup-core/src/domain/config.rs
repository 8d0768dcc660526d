//! Session configuration and the invariants checked before any simulation runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::outcome::TerminalReason;

/// Classic Martingale: double the stake after every loss.
pub const DEFAULT_LOSS_MULTIPLIER: f64 = 2.0;

/// Fair coin on resolved tosses.
pub const DEFAULT_WIN_PROBABILITY: f64 = 0.5;

/// Two fair coins land one head and one tail half of the time ("odds").
pub const DEFAULT_RETOSS_PROBABILITY: f64 = 0.5;

/// Money comparisons absorb f64 settlement drift up to this amount, far
/// below a cent.
pub const MONEY_TOLERANCE: f64 = 1e-9;

/// When a session stops of its own accord (ruin is always possible on top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopPolicy {
    /// Walk away after `rounds` resolved rounds.
    FixedBox { rounds: u32 },

    /// Play until ruin, with a hard ceiling to bound runtime.
    Unlimited { safety_cap: u32 },
}

impl StopPolicy {
    /// Maximum number of resolved rounds a session may play.
    pub fn round_limit(&self) -> u32 {
        match self {
            Self::FixedBox { rounds } => *rounds,
            Self::Unlimited { safety_cap } => *safety_cap,
        }
    }

    /// Terminal reason reported when the round limit is reached.
    pub fn limit_reason(&self) -> TerminalReason {
        match self {
            Self::FixedBox { .. } => TerminalReason::BoxExhausted,
            Self::Unlimited { .. } => TerminalReason::SafetyCapReached,
        }
    }
}

/// Invalid configuration, rejected before any trial runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("initial bankroll must be positive and finite, got {0}")]
    InvalidBankroll(f64),

    #[error("base stake must be positive and finite, got {0}")]
    InvalidStake(f64),

    #[error("base stake {stake} exceeds initial bankroll {bankroll}")]
    StakeExceedsBankroll { stake: f64, bankroll: f64 },

    #[error("loss multiplier must be finite and > 1, got {0}")]
    InvalidMultiplier(f64),

    #[error("win probability must be in (0, 1], got {0}")]
    InvalidWinProbability(f64),

    #[error("re-toss probability must be in [0, 1), got {0}")]
    InvalidRetossProbability(f64),

    #[error("round limit must be at least 1")]
    ZeroRoundLimit,

    #[error("trial count must be at least 1")]
    ZeroTrials,

    #[error("invalid round grid: start={start}, stop={stop}, step={step}")]
    InvalidGrid { start: u32, stop: u32, step: u32 },
}

/// Immutable parameters of one simulated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub initial_bankroll: f64,
    /// Stake placed after every win (the reset amount).
    pub base_stake: f64,
    /// Factor applied to the stake after each loss.
    pub loss_multiplier: f64,
    /// Probability of a Win on a resolved toss.
    pub win_probability: f64,
    /// Probability that a physical toss is not resolved and must be re-tossed.
    pub retoss_probability: f64,
    pub stop_policy: StopPolicy,
}

impl SessionConfig {
    /// Fair two-coin game with a doubling Martingale.
    pub fn new(initial_bankroll: f64, base_stake: f64, stop_policy: StopPolicy) -> Self {
        Self {
            initial_bankroll,
            base_stake,
            loss_multiplier: DEFAULT_LOSS_MULTIPLIER,
            win_probability: DEFAULT_WIN_PROBABILITY,
            retoss_probability: DEFAULT_RETOSS_PROBABILITY,
            stop_policy,
        }
    }

    pub fn with_loss_multiplier(mut self, loss_multiplier: f64) -> Self {
        self.loss_multiplier = loss_multiplier;
        self
    }

    pub fn with_win_probability(mut self, win_probability: f64) -> Self {
        self.win_probability = win_probability;
        self
    }

    pub fn with_retoss_probability(mut self, retoss_probability: f64) -> Self {
        self.retoss_probability = retoss_probability;
        self
    }

    /// Check every invariant. A multiplier > 1 makes ruin reachable, so no
    /// separate reachability check is needed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_bankroll.is_finite() && self.initial_bankroll > 0.0) {
            return Err(ConfigError::InvalidBankroll(self.initial_bankroll));
        }
        if !(self.base_stake.is_finite() && self.base_stake > 0.0) {
            return Err(ConfigError::InvalidStake(self.base_stake));
        }
        if self.base_stake > self.initial_bankroll {
            return Err(ConfigError::StakeExceedsBankroll {
                stake: self.base_stake,
                bankroll: self.initial_bankroll,
            });
        }
        if !(self.loss_multiplier.is_finite() && self.loss_multiplier > 1.0) {
            return Err(ConfigError::InvalidMultiplier(self.loss_multiplier));
        }
        if !(self.win_probability > 0.0 && self.win_probability <= 1.0) {
            return Err(ConfigError::InvalidWinProbability(self.win_probability));
        }
        if !(self.retoss_probability >= 0.0 && self.retoss_probability < 1.0) {
            return Err(ConfigError::InvalidRetossProbability(
                self.retoss_probability,
            ));
        }
        if self.stop_policy.round_limit() == 0 {
            return Err(ConfigError::ZeroRoundLimit);
        }
        Ok(())
    }

    /// Deterministic identity of this configuration.
    ///
    /// Every field is fed to BLAKE3 in a fixed order, so two equal configs
    /// always share a fingerprint across builds and platforms.
    pub fn fingerprint(&self) -> ConfigFingerprint {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.initial_bankroll.to_le_bytes());
        hasher.update(&self.base_stake.to_le_bytes());
        hasher.update(&self.loss_multiplier.to_le_bytes());
        hasher.update(&self.win_probability.to_le_bytes());
        hasher.update(&self.retoss_probability.to_le_bytes());
        match self.stop_policy {
            StopPolicy::FixedBox { rounds } => {
                hasher.update(b"fixed_box");
                hasher.update(&rounds.to_le_bytes());
            }
            StopPolicy::Unlimited { safety_cap } => {
                hasher.update(b"unlimited");
                hasher.update(&safety_cap.to_le_bytes());
            }
        }
        ConfigFingerprint(*hasher.finalize().as_bytes())
    }
}

/// BLAKE3 digest of a [`SessionConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigFingerprint(pub [u8; 32]);

impl ConfigFingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl fmt::Display for ConfigFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
