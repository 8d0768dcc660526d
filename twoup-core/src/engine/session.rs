//! Session simulator: drives the resolver and wager controller to a terminal state.
//!
//! Per round, in order:
//! 1. Stop check: the policy's round limit ends the session successfully.
//! 2. Affordability: `bankroll < stake` (beyond `MONEY_TOLERANCE`) ends the
//!    session as Busted.
//! 3. Resolve, settle the whole stake, update the wager and the running peak.

use rand::Rng;

use crate::domain::{
    ConfigError, RoundOutcome, SessionConfig, SessionResult, TerminalReason, MONEY_TOLERANCE,
};
use crate::engine::resolver::RoundResolver;
use crate::engine::wager::WagerController;
use crate::error::SimError;

/// Runs sessions for one validated configuration.
#[derive(Debug, Clone)]
pub struct SessionSimulator {
    config: SessionConfig,
    resolver: RoundResolver,
}

impl SessionSimulator {
    /// Validate `config` once so trials can skip the checks.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let resolver = RoundResolver::from_config(&config);
        Ok(Self { config, resolver })
    }

    /// Replace the resolver's toss ceiling.
    pub fn with_toss_ceiling(mut self, toss_ceiling: u32) -> Self {
        self.resolver = self.resolver.with_toss_ceiling(toss_ceiling);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Play one session. Only an internal fault can make this fail.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SessionResult, SimError> {
        let config = &self.config;
        let limit = config.stop_policy.round_limit();

        let mut wager = WagerController::new(config.base_stake, config.loss_multiplier);
        let mut bankroll = config.initial_bankroll;
        let mut peak = bankroll;
        let mut rounds: u32 = 0;

        loop {
            if rounds >= limit {
                return Ok(self.finish(
                    bankroll,
                    peak,
                    rounds,
                    config.stop_policy.limit_reason(),
                ));
            }

            let stake = wager.current_stake();
            if bankroll + MONEY_TOLERANCE < stake {
                return Ok(self.finish(bankroll, peak, rounds, TerminalReason::Busted));
            }

            let outcome = self.resolver.resolve(rng)?;
            match outcome {
                RoundOutcome::Win => bankroll += stake,
                RoundOutcome::Loss => bankroll -= stake,
            }
            wager.record(outcome);
            rounds += 1;
            peak = peak.max(bankroll);
        }
    }

    fn finish(
        &self,
        final_bankroll: f64,
        peak_bankroll: f64,
        rounds_played: u32,
        terminal_reason: TerminalReason,
    ) -> SessionResult {
        SessionResult {
            initial_bankroll: self.config.initial_bankroll,
            final_bankroll,
            rounds_played,
            terminal_reason,
            peak_bankroll,
            bust_round: (terminal_reason == TerminalReason::Busted).then_some(rounds_played),
        }
    }
}

/// Validate `config` and play a single session.
pub fn simulate_session<R: Rng + ?Sized>(
    config: &SessionConfig,
    rng: &mut R,
) -> Result<SessionResult, SimError> {
    SessionSimulator::new(config.clone())?.run(rng)
}
