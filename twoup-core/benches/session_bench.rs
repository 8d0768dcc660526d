//! Criterion benchmarks for the per-session hot path.
//!
//! Benchmarks:
//! 1. Round resolution (re-toss loop)
//! 2. Full sessions across box lengths
//! 3. Unlimited play to ruin or safety cap

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use twoup_core::{RoundResolver, SessionConfig, SessionSimulator, StopPolicy};

fn bench_round_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_resolution");

    for retoss in [0.0, 0.5, 0.9] {
        let resolver = RoundResolver::new(0.5, retoss);
        let mut rng = StdRng::seed_from_u64(42);
        group.bench_with_input(BenchmarkId::from_parameter(retoss), &retoss, |b, _| {
            b.iter(|| black_box(resolver.resolve(&mut rng)));
        });
    }

    group.finish();
}

fn bench_fixed_box_sessions(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_box_session");

    for rounds in [10u32, 50, 150] {
        let config = SessionConfig::new(1000.0, 5.0, StopPolicy::FixedBox { rounds });
        let sim = SessionSimulator::new(config).expect("valid config");
        let mut rng = StdRng::seed_from_u64(7);
        group.bench_with_input(BenchmarkId::from_parameter(rounds), &rounds, |b, _| {
            b.iter(|| black_box(sim.run(&mut rng)));
        });
    }

    group.finish();
}

fn bench_unlimited_sessions(c: &mut Criterion) {
    let mut group = c.benchmark_group("unlimited_session");

    for stake in [5.0, 10.0, 20.0] {
        let config = SessionConfig::new(1000.0, stake, StopPolicy::Unlimited { safety_cap: 150 });
        let sim = SessionSimulator::new(config).expect("valid config");
        let mut rng = StdRng::seed_from_u64(123);
        group.bench_with_input(BenchmarkId::from_parameter(stake), &stake, |b, _| {
            b.iter(|| black_box(sim.run(&mut rng)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_round_resolution,
    bench_fixed_box_sessions,
    bench_unlimited_sessions
);
criterion_main!(benches);
