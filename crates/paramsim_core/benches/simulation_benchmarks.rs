//! Criterion benchmarks for paramsim_core
//!
//! Run with: cargo bench -p paramsim_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use paramsim_core::analysis::analyze;
use paramsim_core::config::{ParameterBuilder, RunBuilder, RunConfig};
use paramsim_core::generator::generate_outcomes;
use paramsim_core::interaction::{InteractionModel, apply_interactions};
use paramsim_core::metrics::{NoopObserver, RunMetrics};
use paramsim_core::model::Parameter;
use paramsim_core::simulation::run_simulation;

fn create_run(parameters: usize, iterations: usize) -> (Vec<Parameter>, RunConfig) {
    let mut builder = RunBuilder::new().iterations(iterations).seed(42);
    for i in 0..parameters {
        let max = 5.0 + (i as f64) * 3.0;
        builder = builder.parameter(
            ParameterBuilder::new(format!("Param {i}"))
                .range(0.0, max)
                .weight((i % 10 + 1) as u8),
        );
    }
    builder.build()
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_outcomes");
    let (params, _) = create_run(5, 0);

    for iterations in [1_000, 10_000, 100_000].iter() {
        group.bench_with_input(
            BenchmarkId::new("iterations", iterations),
            iterations,
            |b, &iterations| {
                b.iter(|| generate_outcomes(black_box(&params), black_box(iterations), 42))
            },
        );
    }

    group.finish();
}

fn bench_interactions(c: &mut Criterion) {
    let (params, _) = create_run(8, 0);
    let outcomes = generate_outcomes(&params, 10_000, 42).expect("valid parameters");
    let matrix = InteractionModel::Uniform.build_matrix(&params, 42);

    c.bench_function("apply_interactions_8_params", |b| {
        b.iter(|| {
            apply_interactions(
                black_box(&outcomes),
                black_box(&params),
                black_box(&matrix),
                &mut NoopObserver,
            )
        })
    });
}

fn bench_sensitivity(c: &mut Criterion) {
    let (params, _) = create_run(5, 0);

    c.bench_function("sensitivity_5_params", |b| {
        b.iter(|| analyze(black_box(&params), 500, 42, None, &mut NoopObserver))
    });
}

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    let (params, config) = create_run(5, 10_000);

    group.bench_function("noop_observer", |b| {
        b.iter(|| run_simulation(black_box(&params), black_box(&config), &mut NoopObserver, None))
    });

    group.bench_function("metrics_observer", |b| {
        b.iter(|| {
            let mut metrics = RunMetrics::new();
            run_simulation(black_box(&params), black_box(&config), &mut metrics, None)
        })
    });

    let without_sensitivity = RunConfig {
        run_sensitivity: false,
        ..config.clone()
    };
    group.bench_function("without_sensitivity", |b| {
        b.iter(|| {
            run_simulation(
                black_box(&params),
                black_box(&without_sensitivity),
                &mut NoopObserver,
                None,
            )
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_generation,
    bench_interactions,
    bench_sensitivity,
    bench_full_run,
);
criterion_main!(benches);
