//! Oracle behaviour across operator representations.

use qtg_adapter_sim::{SimulatorOracle, Statevector};
use qtg_hal::Oracle;
use qtg_ir::{Circuit, ParameterExpression, QubitId};
use qtg_sim::synthesis::append_evolution;
use qtg_sim::{Hamiltonian, HamiltonianTerm, Operator};

fn qubits(n: u32) -> Vec<QubitId> {
    (0..n).map(QubitId).collect()
}

fn prepared(n: u32) -> Circuit {
    let mut circuit = Circuit::with_size("prep", n, 0);
    for (k, q) in qubits(n).into_iter().enumerate() {
        circuit.ry(0.3 + 0.4 * k as f64, q).unwrap();
    }
    circuit
}

// ---------------------------------------------------------------------------
// Evolution gates
// ---------------------------------------------------------------------------

#[test]
fn dense_and_synthesised_evolution_agree() {
    let mixer = Operator::Pauli(Hamiltonian::transverse_field(3));
    let dense = Operator::Matrix(mixer.clone().into_matrix_operator().unwrap());

    let mut a = prepared(3);
    append_evolution(&mut a, &mixer, ParameterExpression::symbol("β[0]"), &qubits(3), "mix")
        .unwrap();
    let mut b = prepared(3);
    append_evolution(&mut b, &dense, ParameterExpression::symbol("β[0]"), &qubits(3), "mix")
        .unwrap();

    let a = Statevector::from_circuit(&a.bind_values(&[0.61]).unwrap()).unwrap();
    let b = Statevector::from_circuit(&b.bind_values(&[0.61]).unwrap()).unwrap();
    for (x, y) in a.amplitudes().iter().zip(b.amplitudes()) {
        assert!((x - y).norm() < 1e-9);
    }
}

#[test]
fn unbound_evolution_is_rejected() {
    let mixer = Operator::Matrix(
        Operator::Pauli(Hamiltonian::transverse_field(1))
            .into_matrix_operator()
            .unwrap(),
    );
    let mut circuit = Circuit::with_size("t", 1, 0);
    append_evolution(&mut circuit, &mixer, ParameterExpression::symbol("β[0]"), &qubits(1), "mix")
        .unwrap();
    assert!(SimulatorOracle::new().evaluate(&circuit, &mixer).is_err());
}

// ---------------------------------------------------------------------------
// Expectation values
// ---------------------------------------------------------------------------

#[test]
fn pauli_and_matrix_expectations_agree() {
    let h = Hamiltonian::from_terms(vec![
        HamiltonianTerm::zz(0, 1, -1.0),
        HamiltonianTerm::x(2, 0.5),
        HamiltonianTerm::identity(0.25),
    ]);
    let pauli = Operator::Pauli(h);
    let matrix = Operator::Matrix(pauli.clone().into_matrix_operator().unwrap());
    let oracle = SimulatorOracle::new();
    let circuit = prepared(3);
    let a = oracle.evaluate(&circuit, &pauli).unwrap();
    let b = oracle.evaluate(&circuit, &matrix).unwrap();
    assert!((a - b).abs() < 1e-10);
}

#[test]
fn narrow_observable_acts_on_low_qubits() {
    let z0 = Operator::Pauli(Hamiltonian::from_terms(vec![HamiltonianTerm::z(0, 1.0)]));
    let mut circuit = Circuit::with_size("t", 3, 0);
    circuit.x(QubitId(0)).unwrap();
    let value = SimulatorOracle::new().evaluate(&circuit, &z0).unwrap();
    assert!((value + 1.0).abs() < 1e-12);
}
