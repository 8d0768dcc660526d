//! Round resolver: one logical betting round, re-tossing until it resolves.
//!
//! Each physical toss is a three-way draw: Win with probability `p·(1−q)`,
//! Loss with probability `(1−p)·(1−q)`, re-toss ("odds") with probability `q`.
//! The loop ends with probability 1 whenever `q < 1`, but it has no natural
//! bound, so a toss ceiling turns a runaway loop into an internal fault.

use rand::Rng;

use crate::domain::{RoundOutcome, SessionConfig, DEFAULT_RETOSS_PROBABILITY};
use crate::error::SimError;

/// Physical tosses allowed per round. At `q = 0.5` the chance of reaching
/// this is 2^-10000.
pub const DEFAULT_TOSS_CEILING: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundResolver {
    win_probability: f64,
    retoss_probability: f64,
    toss_ceiling: u32,
}

impl RoundResolver {
    pub fn new(win_probability: f64, retoss_probability: f64) -> Self {
        Self {
            win_probability,
            retoss_probability,
            toss_ceiling: DEFAULT_TOSS_CEILING,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.win_probability, config.retoss_probability)
    }

    pub fn with_toss_ceiling(mut self, toss_ceiling: u32) -> Self {
        self.toss_ceiling = toss_ceiling;
        self
    }

    pub fn toss_ceiling(&self) -> u32 {
        self.toss_ceiling
    }

    /// Toss until a Win or Loss shows up.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RoundOutcome, SimError> {
        let resolve_cut = 1.0 - self.retoss_probability;
        let win_cut = resolve_cut * self.win_probability;

        for _ in 0..self.toss_ceiling {
            let draw: f64 = rng.gen();
            if draw < win_cut {
                return Ok(RoundOutcome::Win);
            }
            if draw < resolve_cut {
                return Ok(RoundOutcome::Loss);
            }
        }

        Err(SimError::TossCeilingExceeded {
            ceiling: self.toss_ceiling,
        })
    }
}

/// Resolve one round of the standard two-coin game with win probability `p`.
pub fn resolve_round<R: Rng + ?Sized>(
    win_probability: f64,
    rng: &mut R,
) -> Result<RoundOutcome, SimError> {
    RoundResolver::new(win_probability, DEFAULT_RETOSS_PROBABILITY).resolve(rng)
}
