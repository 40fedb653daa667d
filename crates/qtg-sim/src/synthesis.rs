//! Time-evolution synthesis.
//!
//! A Pauli string evolution
//!
//!   exp(-i · coeff · t · P)
//!
//! is built from the circuit identity
//!
//!   exp(-i θ/2 · Z⊗Z⊗...⊗Z) = CNOT_ladder · Rz(θ) · CNOT_ladder†
//!
//! with basis rotations before and after for X and Y factors:
//!   X → H · Z · H
//!   Y → Sdg · H · Z · H · S
//!
//! The time may be symbolic, so one synthesised layer serves every binding
//! of its angle. Dense operators are emitted as a single
//! [`EvolutionGate`].

use qtg_ir::{Circuit, EvolutionGate, ParameterExpression, QubitId};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::hamiltonian::{Hamiltonian, HamiltonianTerm, PauliOp};
use crate::operator::Operator;

/// Coefficients below this magnitude produce no gates.
const NEGLIGIBLE: f64 = 1e-12;

/// Append `exp(-i · coeff · t · P)` to `circuit`.
///
/// `qubits[k]` is the circuit qubit playing the role of operator qubit `k`.
/// Identity strings are a global phase and emit nothing.
pub fn append_exp_pauli(
    circuit: &mut Circuit,
    term: &HamiltonianTerm,
    time: &ParameterExpression,
    qubits: &[QubitId],
) -> SimResult<()> {
    let ops = term.pauli.ops();
    if ops.is_empty() || term.coeff.abs() < NEGLIGIBLE {
        return Ok(());
    }

    let mapped = ops
        .iter()
        .map(|&(q, op)| {
            qubits
                .get(q as usize)
                .map(|id| (*id, op))
                .ok_or(SimError::QubitOutOfRange {
                    qubit: q,
                    n_qubits: qubits.len() as u32,
                })
        })
        .collect::<SimResult<Vec<_>>>()?;

    // Rz(θ) implements exp(-i θ/2 Z), so θ = 2 · coeff · t
    let theta = time.scaled(2.0 * term.coeff);

    basis_change(circuit, &mapped, false)?;
    let ladder: Vec<QubitId> = mapped.iter().map(|(q, _)| *q).collect();
    for window in ladder.windows(2) {
        circuit.cx(window[0], window[1])?;
    }
    if let Some(&target) = ladder.last() {
        circuit.rz(theta, target)?;
    }
    for window in ladder.windows(2).rev() {
        circuit.cx(window[0], window[1])?;
    }
    basis_change(circuit, &mapped, true)?;
    Ok(())
}

/// Append one first-order product-formula step of `exp(-i · t · H)`.
///
/// Exact when the terms commute, as they do for diagonal cost functions.
pub fn append_pauli_evolution(
    circuit: &mut Circuit,
    hamiltonian: &Hamiltonian,
    time: &ParameterExpression,
    qubits: &[QubitId],
) -> SimResult<()> {
    check_width(hamiltonian.num_qubits(), qubits)?;
    for term in hamiltonian.terms() {
        append_exp_pauli(circuit, term, time, qubits)?;
    }
    Ok(())
}

/// Append `exp(-i · t · O)` for either operator representation.
///
/// Pauli sums are synthesised term by term; dense matrices become a single
/// evolution gate labelled `label`.
pub fn append_evolution(
    circuit: &mut Circuit,
    operator: &Operator,
    time: impl Into<ParameterExpression>,
    qubits: &[QubitId],
    label: &str,
) -> SimResult<()> {
    let time = time.into();
    check_width(operator.num_qubits(), qubits)?;
    match operator {
        Operator::Pauli(h) => {
            debug!(label, terms = h.n_terms(), "Synthesising Pauli evolution");
            append_pauli_evolution(circuit, h, &time, qubits)
        }
        Operator::Matrix(m) => {
            debug!(label, num_qubits = m.num_qubits(), "Emitting dense evolution gate");
            let gate = EvolutionGate::new(label, m.num_qubits(), m.to_row_major(), time)?;
            circuit.evolution(gate, qubits)?;
            Ok(())
        }
    }
}

fn check_width(num_qubits: u32, qubits: &[QubitId]) -> SimResult<()> {
    if num_qubits as usize != qubits.len() {
        return Err(SimError::WidthMismatch {
            expected: num_qubits as usize,
            got: qubits.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Rotate each factor into the Z basis (`undo = false`) or back (`undo = true`).
///
///   X → H            (undo: H)
///   Y → Sdg · H      (undo: H · S)
fn basis_change(circuit: &mut Circuit, ops: &[(QubitId, PauliOp)], undo: bool) -> SimResult<()> {
    for &(q, op) in ops {
        match (op, undo) {
            (PauliOp::X, _) => {
                circuit.h(q)?;
            }
            (PauliOp::Y, false) => {
                circuit.sdg(q)?;
                circuit.h(q)?;
            }
            (PauliOp::Y, true) => {
                circuit.h(q)?;
                circuit.s(q)?;
            }
            (PauliOp::Z | PauliOp::I, _) => {}
        }
    }
    Ok(())
}
