//! Two-Up Runner — Monte Carlo aggregation, parameter sweeps, study presets.
//!
//! This crate builds on `twoup-core` to provide:
//! - Aggregate statistics over many independent sessions
//! - A parallel, seed-deterministic Monte Carlo aggregator
//! - Stake × round-limit sweeps with per-stake ranking
//! - Time-boxed and unlimited-play study presets, recorded as TOML

pub mod metric;
pub mod monte_carlo;
pub mod stats;
pub mod study;
pub mod sweep;

pub use metric::StatMetric;
pub use monte_carlo::{run_monte_carlo, Aggregator, TRIAL_CHUNK_SIZE};
pub use stats::{AggregateStats, StatsAccumulator};
pub use study::{peak_study, run_study, PeakStudyRow, RoundGrid, StudyConfig, StudyError};
pub use sweep::{run_sweep, ParamSweep, SweepGrid, SweepMode, SweepResults, SweepRow};
