//! Parameter sweep over stake × round-limit grids.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use twoup_core::{ConfigError, ConfigFingerprint, RngHierarchy, SessionConfig, StopPolicy};

use crate::metric::StatMetric;
use crate::monte_carlo::Aggregator;
use crate::stats::AggregateStats;

/// How the grid's lengths are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SweepMode {
    /// Lengths are box lengths.
    #[default]
    FixedBox,
    /// Lengths are safety caps for play-until-ruin.
    Unlimited,
}

impl SweepMode {
    pub fn policy(&self, length: u32) -> StopPolicy {
        match self {
            Self::FixedBox => StopPolicy::FixedBox { rounds: length },
            Self::Unlimited => StopPolicy::Unlimited { safety_cap: length },
        }
    }
}

/// Parameter grid specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid {
    /// Base stakes, swept in the given order; repeats are dropped.
    pub stakes: Vec<f64>,
    /// Box lengths or safety caps; swept ascending.
    pub lengths: Vec<u32>,
    pub mode: SweepMode,
}

impl SweepGrid {
    pub fn new(stakes: Vec<f64>, lengths: Vec<u32>, mode: SweepMode) -> Self {
        Self {
            stakes,
            lengths,
            mode,
        }
    }

    /// Lengths sorted ascending with duplicates removed.
    pub fn sorted_lengths(&self) -> Vec<u32> {
        let mut lengths = self.lengths.clone();
        lengths.sort_unstable();
        lengths.dedup();
        lengths
    }

    /// Stakes in first-seen order with repeats removed.
    pub fn distinct_stakes(&self) -> Vec<f64> {
        let mut stakes: Vec<f64> = Vec::with_capacity(self.stakes.len());
        for &stake in &self.stakes {
            if !stakes.contains(&stake) {
                stakes.push(stake);
            }
        }
        stakes
    }

    /// Returns the total number of grid points.
    pub fn size(&self) -> usize {
        self.distinct_stakes().len() * self.sorted_lengths().len()
    }

    /// Generates one config per grid point, stake-major, lengths ascending.
    ///
    /// Bankroll, multiplier and coin probabilities come from `base`; its
    /// stake and stop policy are overridden.
    pub fn generate_configs(&self, base: &SessionConfig) -> Vec<(f64, u32, SessionConfig)> {
        let stakes = self.distinct_stakes();
        let lengths = self.sorted_lengths();
        let mut configs = Vec::with_capacity(stakes.len() * lengths.len());

        for stake in stakes {
            for &length in &lengths {
                let mut config = base.clone();
                config.base_stake = stake;
                config.stop_policy = self.mode.policy(length);
                configs.push((stake, length, config));
            }
        }

        configs
    }
}

/// One grid point and its statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub stake: f64,
    pub length: u32,
    pub fingerprint: ConfigFingerprint,
    pub stats: AggregateStats,
}

/// Parameter sweep executor.
///
/// Grid points run in parallel by default; each point's trials are further
/// parallelized by the aggregator.
#[derive(Debug, Clone)]
pub struct ParamSweep {
    aggregator: Aggregator,
    parallel: bool,
}

impl Default for ParamSweep {
    fn default() -> Self {
        Self::new(Aggregator::new())
    }
}

impl ParamSweep {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator,
            parallel: true,
        }
    }

    /// Enables or disables parallel execution across grid points.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Executes a sweep over the given grid.
    ///
    /// Every grid point is validated before any of them runs.
    pub fn sweep(
        &self,
        grid: &SweepGrid,
        base: &SessionConfig,
        trials_per_point: u64,
        seeds: &RngHierarchy,
    ) -> Result<SweepResults, ConfigError> {
        self.sweep_with_progress(grid, base, trials_per_point, seeds, |_, _, _| {})
    }

    /// Executes a sweep with progress reporting.
    ///
    /// The callback is invoked after each grid point completes with:
    /// - Grid index (0-based, in result order)
    /// - Total number of grid points
    /// - The completed row
    pub fn sweep_with_progress<F>(
        &self,
        grid: &SweepGrid,
        base: &SessionConfig,
        trials_per_point: u64,
        seeds: &RngHierarchy,
        progress_callback: F,
    ) -> Result<SweepResults, ConfigError>
    where
        F: Fn(usize, usize, &SweepRow) + Send + Sync,
    {
        if trials_per_point == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        let points = grid.generate_configs(base);
        for (_, _, config) in &points {
            config.validate()?;
        }

        let total = points.len();
        let span = tracing::info_span!(
            "sweep",
            points = total,
            trials_per_point,
            mode = ?grid.mode,
        );
        let _guard = span.enter();

        let run_point = |(idx, (stake, length, config)): (usize, &(f64, u32, SessionConfig))| {
            let stats = self.aggregator.run(config, trials_per_point, seeds)?;
            let row = SweepRow {
                stake: *stake,
                length: *length,
                fingerprint: config.fingerprint(),
                stats,
            };
            tracing::debug!(
                stake = row.stake,
                length = row.length,
                pct_ahead = row.stats.pct_ahead,
                bust_rate = row.stats.bust_rate,
                "grid point complete"
            );
            progress_callback(idx, total, &row);
            Ok::<_, ConfigError>(row)
        };

        let rows: Vec<SweepRow> = if self.parallel {
            points
                .par_iter()
                .enumerate()
                .map(run_point)
                .collect::<Result<Vec<_>, _>>()?
        } else {
            points
                .iter()
                .enumerate()
                .map(run_point)
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(SweepResults::new(rows))
    }
}

/// Run a sweep with the default parallel executor.
pub fn run_sweep(
    grid: &SweepGrid,
    base: &SessionConfig,
    trials_per_point: u64,
    seeds: &RngHierarchy,
) -> Result<SweepResults, ConfigError> {
    ParamSweep::default().sweep(grid, base, trials_per_point, seeds)
}

/// Results from a parameter sweep, in (stake, length ascending) order.
#[derive(Debug, Clone)]
pub struct SweepResults {
    rows: Vec<SweepRow>,
    by_fingerprint: HashMap<ConfigFingerprint, usize>,
}

impl SweepResults {
    fn new(rows: Vec<SweepRow>) -> Self {
        let by_fingerprint = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| (row.fingerprint, idx))
            .collect();

        Self {
            rows,
            by_fingerprint,
        }
    }

    /// Returns all rows as a slice.
    pub fn all(&self) -> &[SweepRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Gets a row by (stake, length).
    pub fn get(&self, stake: f64, length: u32) -> Option<&SweepRow> {
        self.rows
            .iter()
            .find(|row| row.stake == stake && row.length == length)
    }

    /// Gets a row by config fingerprint.
    pub fn get_by_fingerprint(&self, fingerprint: &ConfigFingerprint) -> Option<&SweepRow> {
        self.by_fingerprint.get(fingerprint).map(|&idx| &self.rows[idx])
    }

    /// Rows for one stake, lengths ascending.
    pub fn for_stake(&self, stake: f64) -> impl Iterator<Item = &SweepRow> {
        self.rows.iter().filter(move |row| row.stake == stake)
    }

    /// Distinct stakes in sweep order.
    pub fn stakes(&self) -> Vec<f64> {
        let mut stakes: Vec<f64> = Vec::new();
        for row in &self.rows {
            if !stakes.contains(&row.stake) {
                stakes.push(row.stake);
            }
        }
        stakes
    }

    /// (length, value) pairs for one stake, e.g. the probability-of-profit curve.
    pub fn curve(&self, stake: f64, metric: StatMetric) -> Vec<(u32, f64)> {
        self.for_stake(stake)
            .map(|row| (row.length, metric.extract(&row.stats)))
            .collect()
    }

    /// Best row for one stake. Ties go to the shortest length.
    pub fn best_by(&self, stake: f64, metric: StatMetric) -> Option<&SweepRow> {
        self.for_stake(stake).fold(None, |best: Option<&SweepRow>, row| match best {
            Some(b) if !metric.is_better(metric.extract(&row.stats), metric.extract(&b.stats)) => {
                Some(b)
            }
            _ => Some(row),
        })
    }

    /// Best row per stake, in stake order.
    pub fn winners(&self, metric: StatMetric) -> Vec<&SweepRow> {
        self.stakes()
            .into_iter()
            .filter_map(|stake| self.best_by(stake, metric))
            .collect()
    }
}
