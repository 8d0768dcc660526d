//! Martingale wager controller.
//!
//! Two states: stake at base, or escalated after one or more consecutive
//! losses. A Win resets to base; a Loss multiplies. The controller never
//! checks affordability; the session does that before spending the stake.

use serde::{Deserialize, Serialize};

use crate::domain::RoundOutcome;

/// Snapshot of the wager between rounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WagerState {
    pub stake: f64,
    pub consecutive_losses: u32,
}

#[derive(Debug, Clone)]
pub struct WagerController {
    base_stake: f64,
    multiplier: f64,
    state: WagerState,
}

impl WagerController {
    pub fn new(base_stake: f64, multiplier: f64) -> Self {
        Self {
            base_stake,
            multiplier,
            state: WagerState {
                stake: base_stake,
                consecutive_losses: 0,
            },
        }
    }

    /// Stake required for the next round.
    pub fn current_stake(&self) -> f64 {
        self.state.stake
    }

    pub fn consecutive_losses(&self) -> u32 {
        self.state.consecutive_losses
    }

    pub fn state(&self) -> WagerState {
        self.state
    }

    /// Apply the Martingale rule for one resolved round.
    pub fn record(&mut self, outcome: RoundOutcome) {
        match outcome {
            RoundOutcome::Win => {
                self.state.consecutive_losses = 0;
                self.state.stake = self.base_stake;
            }
            RoundOutcome::Loss => {
                self.state.consecutive_losses = self.state.consecutive_losses.saturating_add(1);
                // stake = base * m^k, recomputed rather than accumulated
                let exponent = i32::try_from(self.state.consecutive_losses).unwrap_or(i32::MAX);
                self.state.stake = self.base_stake * self.multiplier.powi(exponent);
            }
        }
    }
}
