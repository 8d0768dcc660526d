//! Streaming statistics over session results.
//!
//! `StatsAccumulator` folds sessions one at a time: counts and sums for the
//! means and rates, plus one retained value per trial for the exact medians.
//! Two accumulators merge by adding counts and sums and concatenating the
//! retained values, so a chunked fold merged in chunk order is reproducible
//! bit for bit.

use serde::{Deserialize, Serialize};

use twoup_core::{SessionResult, TerminalReason};

/// Summary of all trials for one configuration.
///
/// Rates and means are over completed trials; aborted trials are only
/// counted in `aborted_trials`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub initial_bankroll: f64,
    /// Completed trials.
    pub trials: u64,
    /// Trials aborted by an internal fault.
    pub aborted_trials: u64,

    pub mean_final: f64,
    pub median_final: f64,
    pub mean_profit: f64,
    /// Sample standard deviation of profit (n − 1 denominator).
    pub profit_std_dev: f64,

    /// Fraction of trials that finished strictly above the initial bankroll.
    pub pct_ahead: f64,
    /// Mean profit over trials that finished ahead.
    pub avg_profit_given_ahead: Option<f64>,
    /// Mean loss (as a positive amount) over trials that did not finish ahead.
    pub avg_loss_given_not_ahead: Option<f64>,

    /// Fraction of trials that ended Busted.
    pub bust_rate: f64,
    /// Mean bust round over busted trials.
    pub mean_bust_round: Option<f64>,
    /// Fraction of trials that finished with nothing left. A Busted session
    /// usually keeps a remainder smaller than its next stake.
    pub ruin_rate: f64,

    pub mean_peak_profit: f64,
    pub median_peak_profit: f64,
    pub mean_rounds_played: f64,

    pub box_exhausted: u64,
    pub busted: u64,
    pub safety_capped: u64,
}

impl AggregateStats {
    /// Completed plus aborted trials.
    pub fn total_trials(&self) -> u64 {
        self.trials + self.aborted_trials
    }

    pub fn has_aborts(&self) -> bool {
        self.aborted_trials > 0
    }

    /// Standard error of the mean profit.
    pub fn standard_error(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.profit_std_dev / (self.trials as f64).sqrt()
    }
}

/// Mergeable running totals for one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsAccumulator {
    initial_bankroll: f64,
    completed: u64,
    aborted: u64,

    final_sum: f64,
    rounds_sum: u64,
    ahead: u64,
    ahead_profit_sum: f64,
    not_ahead_loss_sum: f64,
    busted: u64,
    bust_round_sum: u64,
    ruined: u64,
    box_exhausted: u64,
    safety_capped: u64,
    peak_profit_sum: f64,

    finals: Vec<f64>,
    peak_profits: Vec<f64>,
}

impl StatsAccumulator {
    pub fn new(initial_bankroll: f64) -> Self {
        Self {
            initial_bankroll,
            completed: 0,
            aborted: 0,
            final_sum: 0.0,
            rounds_sum: 0,
            ahead: 0,
            ahead_profit_sum: 0.0,
            not_ahead_loss_sum: 0.0,
            busted: 0,
            bust_round_sum: 0,
            ruined: 0,
            box_exhausted: 0,
            safety_capped: 0,
            peak_profit_sum: 0.0,
            finals: Vec::new(),
            peak_profits: Vec::new(),
        }
    }

    pub fn with_capacity(initial_bankroll: f64, trials: usize) -> Self {
        let mut acc = Self::new(initial_bankroll);
        acc.finals.reserve(trials);
        acc.peak_profits.reserve(trials);
        acc
    }

    pub fn record(&mut self, result: &SessionResult) {
        self.completed += 1;
        self.final_sum += result.final_bankroll;
        self.rounds_sum += u64::from(result.rounds_played);

        let profit = result.final_bankroll - self.initial_bankroll;
        if result.final_bankroll > self.initial_bankroll {
            self.ahead += 1;
            self.ahead_profit_sum += profit;
        } else {
            self.not_ahead_loss_sum -= profit;
        }

        match result.terminal_reason {
            TerminalReason::BoxExhausted => self.box_exhausted += 1,
            TerminalReason::SafetyCapReached => self.safety_capped += 1,
            TerminalReason::Busted => {
                self.busted += 1;
                let round = result.bust_round.unwrap_or(result.rounds_played);
                self.bust_round_sum += u64::from(round);
            }
        }
        if result.is_ruined() {
            self.ruined += 1;
        }

        let peak_profit = result.peak_bankroll - self.initial_bankroll;
        self.peak_profit_sum += peak_profit;
        self.finals.push(result.final_bankroll);
        self.peak_profits.push(peak_profit);
    }

    pub fn record_abort(&mut self) {
        self.aborted += 1;
    }

    /// Fold `other` into `self`. `other`'s retained values go after `self`'s.
    pub fn merge(mut self, mut other: Self) -> Self {
        self.completed += other.completed;
        self.aborted += other.aborted;
        self.final_sum += other.final_sum;
        self.rounds_sum += other.rounds_sum;
        self.ahead += other.ahead;
        self.ahead_profit_sum += other.ahead_profit_sum;
        self.not_ahead_loss_sum += other.not_ahead_loss_sum;
        self.busted += other.busted;
        self.bust_round_sum += other.bust_round_sum;
        self.ruined += other.ruined;
        self.box_exhausted += other.box_exhausted;
        self.safety_capped += other.safety_capped;
        self.peak_profit_sum += other.peak_profit_sum;
        self.finals.append(&mut other.finals);
        self.peak_profits.append(&mut other.peak_profits);
        self
    }

    pub fn finish(mut self) -> AggregateStats {
        let n = self.completed;
        let not_ahead = n - self.ahead;

        let mean_final = ratio(self.final_sum, n);
        let mean_profit = if n == 0 {
            0.0
        } else {
            mean_final - self.initial_bankroll
        };
        let profit_std_dev = sample_std_dev(&self.finals, mean_final);

        sort_f64(&mut self.finals);
        sort_f64(&mut self.peak_profits);

        AggregateStats {
            initial_bankroll: self.initial_bankroll,
            trials: n,
            aborted_trials: self.aborted,
            mean_final,
            median_final: median_sorted(&self.finals),
            mean_profit,
            profit_std_dev,
            pct_ahead: ratio(self.ahead as f64, n),
            avg_profit_given_ahead: conditional_mean(self.ahead_profit_sum, self.ahead),
            avg_loss_given_not_ahead: conditional_mean(self.not_ahead_loss_sum, not_ahead),
            bust_rate: ratio(self.busted as f64, n),
            mean_bust_round: conditional_mean(self.bust_round_sum as f64, self.busted),
            ruin_rate: ratio(self.ruined as f64, n),
            mean_peak_profit: ratio(self.peak_profit_sum, n),
            median_peak_profit: median_sorted(&self.peak_profits),
            mean_rounds_played: ratio(self.rounds_sum as f64, n),
            box_exhausted: self.box_exhausted,
            busted: self.busted,
            safety_capped: self.safety_capped,
        }
    }
}

fn ratio(sum: f64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn conditional_mean(sum: f64, count: u64) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}

fn sort_f64(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

/// Median of a sorted slice; the mean of the two middle values for even lengths.
pub fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Sample standard deviation around a known mean. 0.0 below two values.
fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}
