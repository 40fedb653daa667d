//! Mixer invariants, the variational loop and the end-to-end solver.

use proptest::prelude::*;
use qtg_adapter_sim::{SimulatorConfig, SimulatorOracle, Statevector};
use qtg_core::QuantumTreeGenerator;
use qtg_ir::{Circuit, QubitId};
use qtg_problem::KnapsackInstance;
use qtg_qaoa::{
    ConstraintMixer, GroverMixer, HammingWeightMixer, InstanceKind, NelderMead, QaoaError,
    QkpSolver, SolverConfig, SubsystemAnsatz, VariationalLoop, sample_feasible_states,
};
use qtg_sim::{Hamiltonian, HamiltonianTerm, Operator};

const EPS: f64 = 1e-9;

fn probabilities(circuit: &Circuit) -> Vec<f64> {
    Statevector::from_circuit(circuit).unwrap().probabilities()
}

fn item_cost() -> Operator {
    Operator::Pauli(Hamiltonian::from_terms(vec![
        HamiltonianTerm::z(0, 1.0),
        HamiltonianTerm::z(1, -0.4),
        HamiltonianTerm::zz(0, 2, 0.7),
        HamiltonianTerm::zz(1, 2, -0.3),
    ]))
}

fn instance() -> KnapsackInstance {
    KnapsackInstance::new(
        "small",
        vec![vec![4, 1, 2], vec![1, 3, 5], vec![2, 5, 2]],
        vec![1, 2, 3],
        3,
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Mixers
// ---------------------------------------------------------------------------

#[test]
fn grover_mixer_preserves_feasibility() {
    let qtg = QuantumTreeGenerator::new(&[1, 2, 3], 3).unwrap();
    let mixer = GroverMixer::new(&qtg).unwrap();
    let ansatz = SubsystemAnsatz::builder()
        .cost(item_cost())
        .num_qubits(qtg.num_qubits())
        .initial_state(mixer.preparation().clone())
        .mixer(mixer.circuit().unwrap())
        .reps(2)
        .build()
        .unwrap();
    assert_eq!(ansatz.parameters(), &["γ[0]", "β[0]", "γ[1]", "β[1]"]);

    let probs = probabilities(&ansatz.bind(&[0.7, 0.9, 1.3, 0.4]).unwrap());
    let tree = probabilities(mixer.preparation());
    let layout = qtg.layout();
    let mut total = 0.0;
    let mut moved: f64 = 0.0;
    for (index, p) in probs.iter().enumerate() {
        moved = moved.max((p - tree[index]).abs());
        if *p < EPS {
            continue;
        }
        total += p;
        let index = index as u64;
        let items = layout.items_of(index);
        assert!(qtg.is_feasible(items), "infeasible {}", layout.bitstring_of(index));
        assert_eq!(index & layout.ancilla_mask(), 0);
        assert_eq!(layout.sum_of(index), qtg.selection_weight(items));
    }
    assert!((total - 1.0).abs() < 1e-8);
    assert!(moved > 1e-6, "mixer left the distribution unchanged");
}

#[test]
fn grover_mixer_fixes_tree_state() {
    let qtg = QuantumTreeGenerator::new(&[2, 1], 2).unwrap();
    let mixer = GroverMixer::new(&qtg).unwrap();
    let mut circuit = mixer.preparation().clone();
    let bound = mixer
        .circuit()
        .unwrap()
        .bind_values(&[1.1])
        .unwrap();
    circuit.compose(&bound, None).unwrap();

    let before = probabilities(mixer.preparation());
    let after = probabilities(&circuit);
    for (a, b) in before.iter().zip(&after) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn hamming_mixer_preserves_weight() {
    let mixer = HammingWeightMixer::new(4, 5).unwrap();
    let mut init = Circuit::with_size("init", 5, 0);
    init.x(QubitId(0)).unwrap().x(QubitId(2)).unwrap();

    let cost = Operator::Pauli(Hamiltonian::from_terms(vec![
        HamiltonianTerm::z(1, 0.5),
        HamiltonianTerm::zz(0, 3, 1.0),
    ]));
    let ansatz = SubsystemAnsatz::builder()
        .cost(cost)
        .num_qubits(5)
        .initial_state(init)
        .mixer(mixer.circuit().unwrap())
        .reps(1)
        .build()
        .unwrap();
    let probs = probabilities(&ansatz.bind(&[0.4, 0.37]).unwrap());

    let start = 0b00101;
    assert!(probs[start] < 1.0 - 1e-6);
    for (index, p) in probs.iter().enumerate() {
        if *p > EPS {
            assert_eq!(index.count_ones(), 2, "weight changed in {index:05b}");
            assert_eq!(index & 0b10000, 0);
        }
    }
}

#[test]
fn constraint_mixer_stays_in_feasible_span() {
    let mixer = ConstraintMixer::from_bitstrings(["00", "10", "01"])
        .unwrap()
        .operator()
        .unwrap();
    let mut init = Circuit::with_size("init", 2, 0);
    init.x(QubitId(0)).unwrap();
    let cost = Operator::Pauli(Hamiltonian::from_terms(vec![
        HamiltonianTerm::z(0, 1.0),
        HamiltonianTerm::z(1, 0.5),
    ]));
    let ansatz = SubsystemAnsatz::builder()
        .cost(cost)
        .initial_state(init)
        .mixer(mixer)
        .reps(2)
        .build()
        .unwrap();

    let probs = probabilities(&ansatz.bind(&[0.3, 0.8, 1.1, 0.5]).unwrap());
    assert!(probs[0b11] < EPS);
    assert!(probs[0b01] < 1.0 - 1e-6);
    assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn constraint_mixer_couples_feasible_pairs_only(mask in 1u8..=255, weight in 0.1f64..3.0) {
        let states: Vec<String> = (0..8u32)
            .filter(|x| mask & (1 << x) != 0)
            .map(|x| (0..3).map(|q| if x >> q & 1 == 1 { '1' } else { '0' }).collect())
            .collect();
        let matrix = ConstraintMixer::from_bitstrings(&states)
            .unwrap()
            .with_weight(weight)
            .operator()
            .unwrap()
            .to_matrix()
            .unwrap();
        for i in 0..8usize {
            for j in 0..8usize {
                let expected = if i != j && mask & (1 << i) != 0 && mask & (1 << j) != 0 {
                    weight
                } else {
                    0.0
                };
                prop_assert!((matrix[[i, j]].re - expected).abs() < 1e-12);
                prop_assert!(matrix[[i, j]].im.abs() < 1e-12);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Variational loop
// ---------------------------------------------------------------------------

fn small_ansatz() -> SubsystemAnsatz {
    SubsystemAnsatz::builder()
        .cost(item_cost())
        .reps(1)
        .build()
        .unwrap()
}

#[test]
fn zero_iterations_is_fatal() {
    let ansatz = small_ansatz();
    let oracle = SimulatorOracle::new();
    let result = VariationalLoop::new(&ansatz, &oracle, NelderMead::new().with_maxiter(0))
        .run(vec![0.1, 0.2]);
    match result {
        Err(QaoaError::OptimizerFailed(message)) => {
            assert!(message.contains("maximum number of iterations (0)"));
        }
        other => panic!("expected OptimizerFailed, got {other:?}"),
    }
}

#[test]
fn initial_length_is_checked() {
    let ansatz = small_ansatz();
    let oracle = SimulatorOracle::new();
    let result = VariationalLoop::new(&ansatz, &oracle, NelderMead::new()).run(vec![0.1]);
    assert!(matches!(
        result,
        Err(QaoaError::ParameterCountMismatch {
            expected: 2,
            got: 1
        })
    ));
}

#[test]
fn loop_improves_on_start() {
    let ansatz = small_ansatz();
    let oracle = SimulatorOracle::new();
    let looped = VariationalLoop::new(&ansatz, &oracle, NelderMead::new().with_tol(1e-6))
        .with_history(true);
    let start = looped.evaluate(&[0.1, 0.2]).unwrap();
    let outcome = looped.run(vec![0.1, 0.2]).unwrap();

    assert!(outcome.value <= start + 1e-12);
    assert_eq!(outcome.history.len(), outcome.evaluations);
    assert!((outcome.history[0] - start).abs() < 1e-12);
    assert!((looped.evaluate(&outcome.params).unwrap() - outcome.value).abs() < 1e-9);
}

#[test]
fn loop_converges_on_sampled_estimates() {
    let ansatz = small_ansatz();
    for shots in [100, 1000, 10_000] {
        let oracle = SimulatorOracle::new().with_seed(3).with_shots(shots);
        let outcome = VariationalLoop::new(&ansatz, &oracle, NelderMead::new())
            .run(vec![3.14, 1.57])
            .unwrap_or_else(|e| panic!("{shots} shots: {e}"));
        assert!(outcome.iterations < 2000);
        assert!(outcome.value.is_finite());
    }
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

#[test]
fn sampled_tree_is_feasible() {
    let qtg = QuantumTreeGenerator::new(&[1, 2, 3], 2).unwrap();
    let oracle = SimulatorOracle::new().with_seed(11);
    let counts = sample_feasible_states(&oracle, &qtg, 500).unwrap();
    assert_eq!(counts.total_shots(), 500);
    for (bits, _) in counts.iter() {
        assert!(["000", "100", "010"].contains(&bits.as_str()), "sampled {bits}");
    }
}

#[test]
fn solve_small_instance() {
    let config = SolverConfig {
        reps: 1,
        shots: 200,
        tol: 1e-4,
        record_history: true,
        ..SolverConfig::default()
    };
    let solver = QkpSolver::new(instance(), config);
    let oracle = SimulatorOracle::new().with_seed(5);
    let report = solver.solve(&oracle).unwrap();

    let instance = solver.instance();
    let best = instance.selection(&report.best).unwrap();
    assert!(instance.is_feasible(&best));
    assert_eq!(report.best_value, instance.value(&best));
    assert_eq!(report.params.len(), 2);
    assert!(!report.history.is_empty());
    assert_eq!(report.counts.total_shots(), 200);
    for (bits, _) in report.counts.iter() {
        assert!(instance.is_feasible(&instance.selection(bits).unwrap()));
    }

    let greedy = instance.selection(&report.greedy).unwrap();
    assert!(instance.is_feasible(&greedy));
    assert_eq!(report.summary().greedy_value, report.greedy_value);
}

#[test]
fn solve_with_sampled_estimates() {
    let config = SolverConfig {
        reps: 1,
        shots: 200,
        estimator_shots: Some(500),
        seed: Some(8),
        ..SolverConfig::default()
    };
    let oracle = SimulatorOracle::from_config(SimulatorConfig {
        shots: config.estimator_shots,
        seed: config.seed,
        ..SimulatorConfig::default()
    });
    let solver = QkpSolver::new(instance(), config);
    let report = solver.solve(&oracle).unwrap();

    let instance = solver.instance();
    assert!(instance.is_feasible(&instance.selection(&report.best).unwrap()));
    assert_eq!(report.counts.total_shots(), 200);
    assert!(report.energy.is_finite());
}

#[test]
fn densest_uses_hamming_mixer() {
    let config = SolverConfig {
        kind: InstanceKind::Densest,
        reps: 2,
        ..SolverConfig::default()
    };
    let ansatz = QkpSolver::new(instance(), config).ansatz().unwrap();
    assert_eq!(ansatz.parameters(), &["γ[0]", "β[0]", "γ[1]", "β[1]"]);
    let ops = ansatz.circuit().count_ops();
    assert_eq!(ops.get("rxx"), Some(&6));
    assert_eq!(ops.get("ryy"), Some(&6));
}

#[test]
fn config_from_json_fills_defaults() {
    let config: SolverConfig =
        serde_json::from_str(r#"{ "reps": 2, "kind": "densest", "seed": 9 }"#).unwrap();
    assert_eq!(config.reps, 2);
    assert_eq!(config.kind, InstanceKind::Densest);
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.shots, 100);
    assert!(config.estimator_shots.is_none());
    assert!((config.tol - 1e-5).abs() < 1e-15);
}
