//! Round and session outcomes.

use serde::{Deserialize, Serialize};

use super::config::MONEY_TOLERANCE;

/// Result of one resolved round. Re-tosses never surface here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// Two heads.
    Win,
    /// Two tails.
    Loss,
}

/// Why a session ended. Exactly one per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalReason {
    /// The fixed box of rounds was played out.
    BoxExhausted,
    /// The bankroll could not cover the next required stake.
    Busted,
    /// Unlimited play hit its safety ceiling.
    SafetyCapReached,
}

/// Summary of one finished session. Per-round traces are not kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub initial_bankroll: f64,
    pub final_bankroll: f64,
    pub rounds_played: u32,
    pub terminal_reason: TerminalReason,
    /// Running maximum of the bankroll, including the starting value.
    pub peak_bankroll: f64,
    /// Rounds completed when ruin was detected. `Some` only when busted.
    pub bust_round: Option<u32>,
}

impl SessionResult {
    pub fn profit(&self) -> f64 {
        self.final_bankroll - self.initial_bankroll
    }

    /// Best walk-away gain in hindsight. Never negative.
    pub fn peak_profit(&self) -> f64 {
        self.peak_bankroll - self.initial_bankroll
    }

    /// Finished strictly above the starting bankroll.
    pub fn is_ahead(&self) -> bool {
        self.final_bankroll > self.initial_bankroll
    }

    pub fn is_busted(&self) -> bool {
        self.terminal_reason == TerminalReason::Busted
    }

    /// Nothing left, up to settlement drift.
    pub fn is_ruined(&self) -> bool {
        self.final_bankroll <= MONEY_TOLERANCE
    }
}
