//! Constraint-preserving mixers.
//!
//! | Mixer | Form | Feasible set |
//! |-------|------|--------------|
//! | [`ConstraintMixer`] | Hermitian operator over explicit bitstrings | any listed set |
//! | [`GroverMixer`] | circuit `G·R(β)·G†` around the tree generator | knapsack constraint |
//! | [`HammingWeightMixer`] | circuit of `RXX`/`RYY` pairs | fixed Hamming weight |

mod constraint;
mod grover;
mod hamming;

pub use constraint::{ConstraintMixer, Connectivity, DENSE_QUBIT_LIMIT};
pub use grover::{GROVER_PARAMETER, GroverMixer};
pub use hamming::{HAMMING_PARAMETER, HammingWeightMixer};

use qtg_ir::Circuit;
use qtg_sim::Operator;

/// A mixer as consumed by the ansatz.
#[derive(Debug, Clone)]
pub enum Mixer {
    /// Hermitian generator `H_M`, evolved as `exp(−iβH_M)`.
    Operator(Operator),
    /// Circuit whose free parameters are renamed per repetition.
    Circuit(Circuit),
}

impl Mixer {
    /// Number of qubits the mixer acts on.
    pub fn num_qubits(&self) -> usize {
        match self {
            Mixer::Operator(op) => op.num_qubits() as usize,
            Mixer::Circuit(c) => c.num_qubits(),
        }
    }

    /// True if the mixer does nothing: an identity operator or an empty
    /// circuit.
    pub fn is_identity(&self) -> bool {
        match self {
            Mixer::Operator(op) => op.is_identity(),
            Mixer::Circuit(c) => c.num_ops() == 0,
        }
    }
}

impl From<Operator> for Mixer {
    fn from(op: Operator) -> Self {
        Mixer::Operator(op)
    }
}

impl From<Circuit> for Mixer {
    fn from(circuit: Circuit) -> Self {
        Mixer::Circuit(circuit)
    }
}
