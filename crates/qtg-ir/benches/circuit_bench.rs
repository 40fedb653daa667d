//! Benchmarks for circuit construction and transformation
//!
//! Run with: cargo bench -p qtg-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qtg_ir::{Circuit, ParameterExpression, QubitId};

/// A layered circuit with one symbolic angle per layer.
fn layered(num_qubits: u32, layers: u32) -> Circuit {
    let mut circuit = Circuit::with_size("bench", num_qubits, 0);
    for layer in 0..layers {
        let theta = ParameterExpression::symbol(format!("θ[{layer}]"));
        for i in 0..num_qubits {
            circuit.ry(theta.clone(), QubitId(i)).unwrap();
        }
        for i in (0..num_qubits - 1).step_by(2) {
            circuit.cx(QubitId(i), QubitId(i + 1)).unwrap();
        }
    }
    circuit
}

fn bench_gate_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_addition");

    group.bench_function("h_gate", |b| {
        let mut circuit = Circuit::with_size("bench", 10, 0);
        b.iter(|| {
            circuit.h(black_box(QubitId(0))).unwrap();
        });
    });

    group.bench_function("mcx_gate", |b| {
        let mut circuit = Circuit::with_size("bench", 10, 0);
        let controls: Vec<_> = (0..5).map(QubitId).collect();
        b.iter(|| {
            circuit.mcx(black_box(&controls), black_box(QubitId(9))).unwrap();
        });
    });

    group.finish();
}

fn bench_transformations(c: &mut Criterion) {
    let mut group = c.benchmark_group("transformations");

    for num_qubits in &[5u32, 10, 20] {
        let circuit = layered(*num_qubits, 6);
        let values: Vec<f64> = (0..6).map(|k| 0.1 * f64::from(k)).collect();

        group.bench_with_input(
            BenchmarkId::new("inverse", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(circuit.inverse().unwrap()));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("bind_values", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(circuit.bind_values(&values).unwrap()));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("depth", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(circuit.depth()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_gate_addition, bench_transformations);

criterion_main!(benches);
