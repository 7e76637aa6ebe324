//! Optimizer throughput on facility location and feature-based objectives.
//!
//! Run with: `cargo bench --bench selection`

mod common;

use common::criterion_config::default_criterion;

use subselect::optim::{Optimizer, OptimizerKind};
use subselect::testing::{FacilityLocation, FeatureBased, random_features, rbf_similarity};
use subselect::{RunOptions, SieveStreaming, run_with_threads};

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const N_ITEMS: usize = 2_000;
const N_FEATURES: usize = 16;
const K: usize = 50;

fn optimizers() -> Vec<(&'static str, OptimizerKind)> {
    vec![
        ("naive", OptimizerKind::naive()),
        ("lazy", OptimizerKind::lazy()),
        ("approximate_lazy", OptimizerKind::approximate_lazy(0.9)),
        ("two_stage", OptimizerKind::two_stage(5)),
        ("stochastic", OptimizerKind::stochastic(0.1, 0)),
        ("sample", OptimizerKind::sample(0.3, 0)),
        ("modular", OptimizerKind::modular()),
        (
            "greedi",
            OptimizerKind::greedi(8, K, OptimizerKind::lazy(), OptimizerKind::lazy()),
        ),
        ("sieve", OptimizerKind::sieve(0.2)),
    ]
}

fn bench_feature_based(c: &mut Criterion) {
    let features = random_features(N_ITEMS, N_FEATURES, 42);
    let mut group = c.benchmark_group("selection/feature_based");

    for (name, optimizer) in optimizers() {
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter_batched(
                || FeatureBased::new(features.clone()),
                |mut oracle| {
                    black_box(
                        optimizer
                            .select(&mut oracle, K, &RunOptions::default())
                            .unwrap(),
                    )
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_facility_location(c: &mut Criterion) {
    let sim = rbf_similarity(&random_features(1_000, 8, 7), 1.0);
    let mut group = c.benchmark_group("selection/facility_location");

    for (name, optimizer) in [("naive", OptimizerKind::naive()), ("lazy", OptimizerKind::lazy())] {
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter_batched(
                || FacilityLocation::new(sim.clone()),
                |mut oracle| {
                    black_box(
                        optimizer
                            .select(&mut oracle, K, &RunOptions::default())
                            .unwrap(),
                    )
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_naive_threads(c: &mut Criterion) {
    let features = random_features(20_000, N_FEATURES, 3);
    let mut group = c.benchmark_group("selection/naive_threads");

    for n_threads in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(n_threads), &n_threads, |b, &n| {
            b.iter_batched(
                || FeatureBased::new(features.clone()),
                |mut oracle| {
                    run_with_threads(n, |parallelism| {
                        let opts = RunOptions::default().with_parallelism(parallelism);
                        black_box(OptimizerKind::naive().select(&mut oracle, 10, &opts).unwrap())
                    })
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_streaming(c: &mut Criterion) {
    let features = random_features(N_ITEMS, N_FEATURES, 9);
    let stream: Vec<usize> = (0..N_ITEMS).collect();
    let mut group = c.benchmark_group("selection/sieve_streaming");

    for epsilon in [0.1, 0.5] {
        group.bench_with_input(BenchmarkId::from_parameter(epsilon), &epsilon, |b, &eps| {
            b.iter_batched(
                || SieveStreaming::new(FeatureBased::new(features.clone()), K, eps).unwrap(),
                |mut sieve| {
                    for chunk in stream.chunks(256) {
                        sieve.partial_fit(chunk);
                    }
                    black_box(sieve.selection())
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = default_criterion();
    targets = bench_feature_based, bench_facility_location, bench_naive_threads, bench_streaming
}
criterion_main!(benches);
