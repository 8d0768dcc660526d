//! Monte Carlo aggregator: many independent sessions reduced to one stats row.
//!
//! Trials are split into fixed-size chunks. Each chunk is folded sequentially
//! into its own `StatsAccumulator`, chunks run in parallel under Rayon, and
//! the partial accumulators are merged in chunk order. Trial `i` always draws
//! from the stream `RngHierarchy::rng_for(fingerprint, i)`, so the result is
//! bit-identical whatever the thread count.

use std::ops::Range;

use rayon::prelude::*;

use twoup_core::engine::DEFAULT_TOSS_CEILING;
use twoup_core::{ConfigError, RngHierarchy, SessionConfig, SessionSimulator};

use crate::stats::{AggregateStats, StatsAccumulator};

/// Trials folded per work unit. Part of the reproducibility contract:
/// changing it changes floating-point summation order.
pub const TRIAL_CHUNK_SIZE: u64 = 1024;

/// Monte Carlo executor. Parallel by default.
#[derive(Debug, Clone)]
pub struct Aggregator {
    parallel: bool,
    toss_ceiling: u32,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            parallel: true,
            toss_ceiling: DEFAULT_TOSS_CEILING,
        }
    }

    /// Enables or disables parallel execution. Results are identical either way.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Override the per-round toss ceiling used to detect internal faults.
    pub fn with_toss_ceiling(mut self, toss_ceiling: u32) -> Self {
        self.toss_ceiling = toss_ceiling;
        self
    }

    /// Run `trials` sessions of `config` and reduce them to an AggregateStats.
    ///
    /// Configuration errors surface before any trial runs. Trials aborted by
    /// an internal fault are counted in `aborted_trials`.
    pub fn run(
        &self,
        config: &SessionConfig,
        trials: u64,
        seeds: &RngHierarchy,
    ) -> Result<AggregateStats, ConfigError> {
        if trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        let sim = SessionSimulator::new(config.clone())?.with_toss_ceiling(self.toss_ceiling);
        let stream = config.fingerprint();

        let span = tracing::info_span!(
            "monte_carlo",
            stake = config.base_stake,
            rounds = config.stop_policy.round_limit(),
            trials,
            seed = seeds.master_seed(),
        );
        let _guard = span.enter();

        let fold_chunk = |range: Range<u64>| {
            let mut acc = StatsAccumulator::with_capacity(
                config.initial_bankroll,
                (range.end - range.start) as usize,
            );
            for trial in range {
                let mut rng = seeds.rng_for(&stream, trial);
                match sim.run(&mut rng) {
                    Ok(result) => acc.record(&result),
                    Err(err) => {
                        tracing::trace!(trial, %err, "trial aborted");
                        acc.record_abort();
                    }
                }
            }
            acc
        };

        let chunks = chunk_ranges(trials);
        let partials: Vec<StatsAccumulator> = if self.parallel {
            chunks.into_par_iter().map(fold_chunk).collect()
        } else {
            chunks.into_iter().map(fold_chunk).collect()
        };

        let total = partials.into_iter().fold(
            StatsAccumulator::with_capacity(config.initial_bankroll, trials as usize),
            StatsAccumulator::merge,
        );
        let stats = total.finish();

        if stats.has_aborts() {
            tracing::warn!(
                aborted = stats.aborted_trials,
                completed = stats.trials,
                "trials aborted by internal fault"
            );
        }
        tracing::debug!(
            pct_ahead = stats.pct_ahead,
            bust_rate = stats.bust_rate,
            mean_final = stats.mean_final,
            "aggregate complete"
        );

        Ok(stats)
    }
}

/// Run `trials` sessions of `config` with the default parallel aggregator.
pub fn run_monte_carlo(
    config: &SessionConfig,
    trials: u64,
    seeds: &RngHierarchy,
) -> Result<AggregateStats, ConfigError> {
    Aggregator::new().run(config, trials, seeds)
}

/// Split `0..trials` into consecutive ranges of `TRIAL_CHUNK_SIZE`.
fn chunk_ranges(trials: u64) -> Vec<Range<u64>> {
    (0..trials)
        .step_by(TRIAL_CHUNK_SIZE as usize)
        .map(|start| start..(start + TRIAL_CHUNK_SIZE).min(trials))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use twoup_core::StopPolicy;

    fn boxed(stake: f64, rounds: u32) -> SessionConfig {
        SessionConfig::new(1000.0, stake, StopPolicy::FixedBox { rounds })
    }

    #[test]
    fn chunk_ranges_cover_all_trials() {
        let chunks = chunk_ranges(2500);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], 0..1024);
        assert_eq!(chunks[2], 2048..2500);
        assert_eq!(chunk_ranges(1), vec![0..1]);
    }

    #[test]
    fn zero_trials_rejected() {
        let err = run_monte_carlo(&boxed(5.0, 10), 0, &RngHierarchy::new(1)).unwrap_err();
        assert_eq!(err, ConfigError::ZeroTrials);
    }

    #[test]
    fn invalid_config_rejected_before_running() {
        let config = boxed(5.0, 10).with_loss_multiplier(1.0);
        let err = run_monte_carlo(&config, 100, &RngHierarchy::new(1)).unwrap_err();
        assert_eq!(err, ConfigError::InvalidMultiplier(1.0));
    }

    #[test]
    fn counts_every_trial() {
        let stats = run_monte_carlo(&boxed(5.0, 10), 3000, &RngHierarchy::new(42)).unwrap();
        assert_eq!(stats.trials, 3000);
        assert_eq!(stats.aborted_trials, 0);
        assert_eq!(stats.box_exhausted + stats.busted + stats.safety_capped, 3000);
    }

    #[test]
    fn parallel_and_sequential_agree_bitwise() {
        let config = boxed(10.0, 40);
        let seeds = RngHierarchy::new(7);
        let par = Aggregator::new().run(&config, 5000, &seeds).unwrap();
        let seq = Aggregator::new()
            .with_parallelism(false)
            .run(&config, 5000, &seeds)
            .unwrap();
        assert_eq!(par, seq);
        assert_eq!(par.mean_final.to_bits(), seq.mean_final.to_bits());
    }

    #[test]
    fn different_master_seeds_differ() {
        let config = boxed(10.0, 40);
        let a = run_monte_carlo(&config, 2000, &RngHierarchy::new(1)).unwrap();
        let b = run_monte_carlo(&config, 2000, &RngHierarchy::new(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn faulting_trials_are_counted_not_recorded() {
        // Every toss re-tosses with probability ~1, so every trial faults.
        let config = boxed(5.0, 3).with_retoss_probability(0.999_999_999);
        let stats = Aggregator::new()
            .with_toss_ceiling(4)
            .run(&config, 50, &RngHierarchy::new(3))
            .unwrap();
        assert_eq!(stats.trials, 0);
        assert_eq!(stats.aborted_trials, 50);
        assert_eq!(stats.total_trials(), 50);
    }

    #[test]
    fn partial_faults_split_the_total() {
        // One round, q = 0.9, ceiling 8: P(fault) = 0.9^8 ≈ 0.43.
        let config = boxed(5.0, 1).with_retoss_probability(0.9);
        let stats = Aggregator::new()
            .with_toss_ceiling(8)
            .run(&config, 2000, &RngHierarchy::new(11))
            .unwrap();
        assert!(stats.aborted_trials > 0);
        assert!(stats.trials > 0);
        assert_eq!(stats.total_trials(), 2000);
        assert!(
            (stats.aborted_trials as f64 / 2000.0 - 0.43).abs() < 0.05,
            "abort fraction {}",
            stats.aborted_trials
        );
    }
}
