//! Criterion benchmarks for the Monte Carlo aggregation hot loops.
//!
//! Run with: `cargo bench -p twoup-runner`
//!
//! These benchmarks measure:
//! - Accumulator fold and finish (median sort)
//! - Aggregate throughput, parallel vs sequential
//! - A small stake × length sweep

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use twoup_core::{RngHierarchy, SessionConfig, SessionResult, StopPolicy, TerminalReason};
use twoup_runner::{Aggregator, ParamSweep, StatsAccumulator, SweepGrid, SweepMode};

/// Synthetic session results with a spread of finals and peaks.
fn generate_results(count: usize) -> Vec<SessionResult> {
    (0..count)
        .map(|i| {
            let final_bankroll = 900.0 + (i % 200) as f64;
            SessionResult {
                initial_bankroll: 1000.0,
                final_bankroll,
                rounds_played: 10,
                terminal_reason: TerminalReason::BoxExhausted,
                peak_bankroll: final_bankroll.max(1000.0) + (i % 7) as f64,
                bust_round: None,
            }
        })
        .collect()
}

fn bench_accumulator(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats_accumulator");

    for size in [1_000usize, 20_000, 100_000] {
        let results = generate_results(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut acc = StatsAccumulator::with_capacity(1000.0, results.len());
                for r in &results {
                    acc.record(black_box(r));
                }
                black_box(acc.finish())
            });
        });
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    group.sample_size(20);

    let config = SessionConfig::new(1000.0, 10.0, StopPolicy::Unlimited { safety_cap: 150 });
    let seeds = RngHierarchy::new(42);
    let trials = 20_000u64;
    group.throughput(Throughput::Elements(trials));

    for parallel in [false, true] {
        let aggregator = Aggregator::new().with_parallelism(parallel);
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(label, |b| {
            b.iter(|| black_box(aggregator.run(&config, trials, &seeds)));
        });
    }

    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");
    group.sample_size(10);

    let grid = SweepGrid::new(vec![5.0, 10.0, 20.0], vec![10, 50, 100, 150], SweepMode::FixedBox);
    let base = SessionConfig::new(1000.0, 5.0, StopPolicy::FixedBox { rounds: 10 });
    let seeds = RngHierarchy::new(7);
    let sweep = ParamSweep::default();

    group.bench_function("3x4_grid_2000_trials", |b| {
        b.iter(|| black_box(sweep.sweep(&grid, &base, 2_000, &seeds)));
    });

    group.finish();
}

criterion_group!(benches, bench_accumulator, bench_aggregate, bench_sweep);
criterion_main!(benches);
