//! Metric selector for ranking grid points.

use serde::{Deserialize, Serialize};

use crate::stats::AggregateStats;

/// Which statistic to rank sweep rows by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatMetric {
    /// "Best by mean bankroll".
    #[default]
    MeanFinal,
    MedianFinal,
    /// "Best by % profitable".
    PctAhead,
    BustRate,
    MeanPeakProfit,
    MedianPeakProfit,
}

impl StatMetric {
    /// Extract the relevant value from an AggregateStats row.
    pub fn extract(&self, stats: &AggregateStats) -> f64 {
        match self {
            Self::MeanFinal => stats.mean_final,
            Self::MedianFinal => stats.median_final,
            Self::PctAhead => stats.pct_ahead,
            Self::BustRate => stats.bust_rate,
            Self::MeanPeakProfit => stats.mean_peak_profit,
            Self::MedianPeakProfit => stats.median_peak_profit,
        }
    }

    /// Whether higher values are better. Only BustRate prefers lower.
    pub fn is_higher_better(&self) -> bool {
        !matches!(self, Self::BustRate)
    }

    /// Returns true if `a` is strictly better than `b`.
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        if self.is_higher_better() {
            a > b
        } else {
            a < b
        }
    }
}
