//! Benchmarks for tree generator construction and lowering
//!
//! Run with: cargo bench -p qtg-core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qtg_core::{BiasAnsatz, QuantumTreeGenerator, StatePreparation};

fn instance(n: usize) -> (Vec<i64>, i64) {
    let weights: Vec<i64> = (0..n).map(|i| 1 + (i as i64 * 7) % 13).collect();
    let capacity = weights.iter().sum::<i64>() / 2;
    (weights, capacity)
}

/// Benchmark building the raw generator circuit
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("qtg_build");

    for n in &[4usize, 8, 16, 32] {
        let (weights, capacity) = instance(*n);
        let bias = BiasAnsatz::new(vec![true; *n], *n as f64 * 0.5).unwrap();
        let qtg = QuantumTreeGenerator::new(&weights, capacity)
            .unwrap()
            .with_bias(bias)
            .unwrap();
        group.bench_with_input(BenchmarkId::new("build", n), &qtg, |b, qtg| {
            b.iter(|| black_box(qtg.build().unwrap()));
        });
    }

    group.finish();
}

/// Benchmark building and lowering to primitives
fn bench_lowered(c: &mut Criterion) {
    let mut group = c.benchmark_group("qtg_lowered");

    for n in &[4usize, 8, 16] {
        let (weights, capacity) = instance(*n);
        let qtg = QuantumTreeGenerator::new(&weights, capacity).unwrap();
        group.bench_with_input(BenchmarkId::new("build_lowered", n), &qtg, |b, qtg| {
            b.iter(|| black_box(qtg.build_lowered().unwrap()));
        });
    }

    group.finish();
}

/// Benchmark both state preparation paths
fn bench_state_prep(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_prep");

    for n in &[4usize, 8, 10] {
        let (weights, capacity) = instance(*n);
        let feasible = QuantumTreeGenerator::new(&weights, capacity)
            .unwrap()
            .feasible_states();
        let prep = StatePreparation::from_bitstrings(&feasible).unwrap();
        group.bench_with_input(BenchmarkId::new("tree", n), &prep, |b, prep| {
            b.iter(|| black_box(prep.build().unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("isometry", n), &prep, |b, prep| {
            b.iter(|| black_box(prep.build_isometry().unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_lowered, bench_state_prep);
criterion_main!(benches);
