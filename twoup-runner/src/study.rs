//! Study presets for the time-boxed sweep and the unlimited-play peak study.
//!
//! A `StudyConfig` captures everything needed to reproduce a study and
//! round-trips through TOML so a run can be recorded next to its results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use twoup_core::{
    ConfigError, RngHierarchy, SessionConfig, StopPolicy, DEFAULT_LOSS_MULTIPLIER,
    DEFAULT_RETOSS_PROBABILITY, DEFAULT_WIN_PROBABILITY,
};

use crate::monte_carlo::Aggregator;
use crate::stats::AggregateStats;
use crate::sweep::{ParamSweep, SweepGrid, SweepMode, SweepResults};

/// Inclusive `start..=stop` range of round limits, stepping by `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundGrid {
    pub start: u32,
    pub stop: u32,
    pub step: u32,
}

impl RoundGrid {
    pub fn new(start: u32, stop: u32, step: u32) -> Self {
        Self { start, stop, step }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start == 0 || self.step == 0 || self.start > self.stop {
            return Err(ConfigError::InvalidGrid {
                start: self.start,
                stop: self.stop,
                step: self.step,
            });
        }
        Ok(())
    }

    /// Round limits in ascending order. Empty if the grid is invalid.
    pub fn lengths(&self) -> Vec<u32> {
        if self.validate().is_err() {
            return Vec::new();
        }
        (self.start..=self.stop).step_by(self.step as usize).collect()
    }

    /// Largest on-step length; `stop` itself only when it lies on the grid.
    pub fn max_length(&self) -> Option<u32> {
        self.validate().ok()?;
        Some(self.start + (self.stop - self.start) / self.step * self.step)
    }
}

impl Default for RoundGrid {
    /// 10 → 150 in steps of 5.
    fn default() -> Self {
        Self::new(10, 150, 5)
    }
}

/// Errors from reading or writing a study manifest.
#[derive(Debug, Error)]
pub enum StudyError {
    #[error("failed to parse study config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to render study config: {0}")]
    Render(#[from] toml::ser::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Complete, reproducible description of a study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    pub bankroll: f64,
    pub stakes: Vec<f64>,
    pub loss_multiplier: f64,
    pub win_probability: f64,
    pub retoss_probability: f64,
    pub mode: SweepMode,
    /// Trials per grid point in the sweep.
    pub trials: u64,
    /// Trials per stake in the peak study.
    pub peak_trials: u64,
    pub master_seed: u64,
    /// Kept last: TOML tables must follow plain keys.
    pub grid: RoundGrid,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self::time_boxed()
    }
}

impl StudyConfig {
    /// Stakes $5/$10/$20 on $1000, boxes 10 → 150 step 5, 20 000 trials.
    pub fn time_boxed() -> Self {
        Self {
            bankroll: 1_000.0,
            stakes: vec![5.0, 10.0, 20.0],
            loss_multiplier: DEFAULT_LOSS_MULTIPLIER,
            win_probability: DEFAULT_WIN_PROBABILITY,
            retoss_probability: DEFAULT_RETOSS_PROBABILITY,
            mode: SweepMode::FixedBox,
            trials: 20_000,
            peak_trials: 100_000,
            master_seed: 42,
            grid: RoundGrid::default(),
        }
    }

    /// Play until ruin: safety caps 10 → 150 step 5, peak study at cap 150
    /// with 100 000 trials.
    pub fn unlimited() -> Self {
        Self {
            mode: SweepMode::Unlimited,
            master_seed: 123,
            ..Self::time_boxed()
        }
    }

    /// Session template shared by every grid point. Stake and policy are
    /// placeholders the sweep overrides.
    pub fn base_session(&self) -> SessionConfig {
        let stake = self.stakes.first().copied().unwrap_or(self.bankroll);
        let length = self.grid.max_length().unwrap_or(self.grid.stop);
        SessionConfig::new(self.bankroll, stake, self.mode.policy(length))
            .with_loss_multiplier(self.loss_multiplier)
            .with_win_probability(self.win_probability)
            .with_retoss_probability(self.retoss_probability)
    }

    pub fn sweep_grid(&self) -> SweepGrid {
        SweepGrid::new(self.stakes.clone(), self.grid.lengths(), self.mode)
    }

    pub fn seeds(&self) -> RngHierarchy {
        RngHierarchy::new(self.master_seed)
    }

    /// Check the grid, trial counts and every session the study would run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        if self.trials == 0 || self.peak_trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        for (_, _, config) in self.sweep_grid().generate_configs(&self.base_session()) {
            config.validate()?;
        }
        Ok(())
    }

    /// Parse and validate a TOML manifest.
    pub fn from_toml_str(s: &str) -> Result<Self, StudyError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, StudyError> {
        Ok(toml::to_string(self)?)
    }
}

/// Run the study's stake × length sweep.
pub fn run_study(study: &StudyConfig) -> Result<SweepResults, ConfigError> {
    study.validate()?;
    ParamSweep::default().sweep(
        &study.sweep_grid(),
        &study.base_session(),
        study.trials,
        &study.seeds(),
    )
}

/// Peak/bust statistics for one stake under unlimited play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakStudyRow {
    pub stake: f64,
    pub safety_cap: u32,
    pub stats: AggregateStats,
}

/// Unlimited play at the grid's largest on-step cap, one row per stake.
///
/// Runs regardless of the study's sweep mode.
pub fn peak_study(study: &StudyConfig) -> Result<Vec<PeakStudyRow>, ConfigError> {
    study.validate()?;
    let safety_cap = study.grid.max_length().unwrap_or(study.grid.stop);
    let seeds = study.seeds();
    let aggregator = Aggregator::new();

    let span = tracing::info_span!("peak_study", safety_cap, stakes = study.stakes.len());
    let _guard = span.enter();

    study
        .stakes
        .iter()
        .map(|&stake| {
            let mut config = study.base_session();
            config.base_stake = stake;
            config.stop_policy = StopPolicy::Unlimited { safety_cap };
            let stats = aggregator.run(&config, study.peak_trials, &seeds)?;
            Ok::<_, ConfigError>(PeakStudyRow {
                stake,
                safety_cap,
                stats,
            })
        })
        .collect()
}
