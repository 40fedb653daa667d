//! Hamming-weight-preserving mixer.
//!
//! `RXX(2β)` followed by `RYY(2β)` on every pair of item qubits. Each pair
//! term `exp(−iβ(XX + YY))` only swaps |01⟩ and |10⟩, so the number of
//! selected items never changes.

use qtg_ir::{Circuit, ParameterExpression, QubitId};

use crate::error::{QaoaError, QaoaResult};

/// Name of the free parameter of [`HammingWeightMixer::circuit`].
pub const HAMMING_PARAMETER: &str = "β";

/// XY mixer over the first `n_items` of `total_qubits` qubits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HammingWeightMixer {
    n_items: usize,
    total_qubits: usize,
}

impl HammingWeightMixer {
    /// Create the mixer; items are qubits `0..n_items`.
    pub fn new(n_items: usize, total_qubits: usize) -> QaoaResult<Self> {
        if n_items > total_qubits {
            return Err(QaoaError::TooManyItems {
                n_items,
                total_qubits,
            });
        }
        Ok(Self {
            n_items,
            total_qubits,
        })
    }

    /// Number of item qubits.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Total circuit width.
    pub fn num_qubits(&self) -> usize {
        self.total_qubits
    }

    /// Mixer circuit with one free parameter `β`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn circuit(&self) -> QaoaResult<Circuit> {
        let mut circuit = Circuit::with_size("hamming_weight_mixer", self.total_qubits as u32, 0);
        let angle = ParameterExpression::symbol(HAMMING_PARAMETER).scaled(2.0);
        for i in 0..self.n_items {
            for j in (i + 1)..self.n_items {
                let (a, b) = (QubitId(i as u32), QubitId(j as u32));
                circuit.rxx(angle.clone(), a, b)?.ryy(angle.clone(), a, b)?;
            }
        }
        Ok(circuit)
    }
}
