//! Aggregation benchmarks
//!
//! Plain vs normalized aggregation over synthetic seeds, at the trial counts
//! research sweeps produce (tens to hundreds of seeds).
//!
//! Run with: cargo bench --bench aggregations

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use trial_stats::experiment::{aggregate, aggregate_normalized, TrialRecord};

const SERIES_LEN: usize = 1_000; // episodes per seed
const TRIAL_COUNTS: [usize; 3] = [10, 100, 500];

/// One seed: three policies' reward curves plus a scalar
fn make_records(trials: usize) -> Vec<TrialRecord> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..trials)
        .map(|_| {
            let mut curve = |scale: f64| -> Vec<f64> {
                (0..SERIES_LEN).map(|_| rng.gen_range(0.0..scale)).collect()
            };
            let random = curve(1.0);
            let ppo = curve(4.0);
            let dqn = curve(3.0);
            TrialRecord::builder()
                .nested_list("random_reward", vec![random])
                .nested_list("ppo_reward", vec![ppo])
                .nested_list("dqn_reward", vec![dqn])
                .scalar("steps", 1_000.0)
                .build()
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for trials in TRIAL_COUNTS {
        let records = make_records(trials);
        group.bench_with_input(BenchmarkId::new("plain", trials), &records, |b, data| {
            b.iter(|| aggregate(black_box(data)));
        });
    }

    group.finish();
}

fn bench_aggregate_normalized(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_normalized");

    for trials in TRIAL_COUNTS {
        let records = make_records(trials);
        group.bench_with_input(BenchmarkId::new("random_baseline", trials), &records, |b, data| {
            b.iter(|| aggregate_normalized(black_box(data), Some("random")));
        });
        group.bench_with_input(BenchmarkId::new("no_baseline", trials), &records, |b, data| {
            b.iter(|| aggregate_normalized(black_box(data), None));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_aggregate, bench_aggregate_normalized);
criterion_main!(benches);
