//! The Quantum Tree Generator.
//!
//! For every item `i`, in order:
//!
//! 1. compare the running sum against `C + 1 − wᵢ` into the flag;
//! 2. apply the biased rotation to item `i`, controlled on the flag;
//! 3. repeat the comparison to clear the flag;
//! 4. add `wᵢ` into the sum, controlled on item `i`.
//!
//! An item can only leave |0⟩ while it still fits, so the state register ends
//! up supported on exactly the feasible selections and the sum register holds
//! the weight of each selection.

use tracing::{debug, instrument};

use qtg_ir::{Circuit, QubitId};

use crate::adder::WeightedAdder;
use crate::comparator::ThresholdComparator;
use crate::error::{CoreError, CoreResult};
use crate::layout::RegisterLayout;
use crate::rotation::BiasAnsatz;

/// Tree generator for one knapsack constraint `Σ wᵢxᵢ ≤ C`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantumTreeGenerator {
    weights: Vec<u64>,
    capacity: u64,
    bias: BiasAnsatz,
    layout: RegisterLayout,
}

impl QuantumTreeGenerator {
    /// Create an unbiased generator.
    pub fn new(weights: &[i64], capacity: i64) -> CoreResult<Self> {
        if weights.is_empty() {
            return Err(CoreError::EmptyWeights);
        }
        let weights = weights
            .iter()
            .enumerate()
            .map(|(index, &w)| {
                u64::try_from(w).map_err(|_| CoreError::NegativeWeight {
                    index,
                    weight: w as f64,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;
        let capacity =
            u64::try_from(capacity).map_err(|_| CoreError::InvalidCapacity(capacity as f64))?;
        Ok(Self::from_validated(weights, capacity))
    }

    /// Create an unbiased generator from floating-point data.
    ///
    /// Weights and capacity must be non-negative integers.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_f64(weights: &[f64], capacity: f64) -> CoreResult<Self> {
        if weights.is_empty() {
            return Err(CoreError::EmptyWeights);
        }
        let weights = weights
            .iter()
            .enumerate()
            .map(|(index, &weight)| {
                if !weight.is_finite() || weight.fract() != 0.0 {
                    Err(CoreError::NonIntegralWeight { index, weight })
                } else if weight < 0.0 {
                    Err(CoreError::NegativeWeight { index, weight })
                } else {
                    Ok(weight as u64)
                }
            })
            .collect::<CoreResult<Vec<_>>>()?;
        if !capacity.is_finite() || capacity < 0.0 || capacity.fract() != 0.0 {
            return Err(CoreError::InvalidCapacity(capacity));
        }
        Ok(Self::from_validated(weights, capacity as u64))
    }

    fn from_validated(weights: Vec<u64>, capacity: u64) -> Self {
        let layout = RegisterLayout::new(&weights, capacity);
        let bias = BiasAnsatz::unbiased(weights.len());
        Self {
            weights,
            capacity,
            bias,
            layout,
        }
    }

    /// Replace the bias ansatz.
    pub fn with_bias(mut self, bias: BiasAnsatz) -> CoreResult<Self> {
        if bias.len() != self.weights.len() {
            return Err(CoreError::BiasLengthMismatch {
                expected: self.weights.len(),
                got: bias.len(),
            });
        }
        self.bias = bias;
        Ok(self)
    }

    /// Item weights.
    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    /// Knapsack capacity.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Bias ansatz in use.
    pub fn bias(&self) -> &BiasAnsatz {
        &self.bias
    }

    /// Register layout.
    pub fn layout(&self) -> &RegisterLayout {
        &self.layout
    }

    /// Number of items.
    pub fn num_items(&self) -> usize {
        self.weights.len()
    }

    /// Total circuit width.
    pub fn num_qubits(&self) -> usize {
        self.layout.num_qubits()
    }

    /// Item qubits, `item_qubits()[i]` is item `i`.
    pub fn item_qubits(&self) -> Vec<QubitId> {
        self.layout.state_qubits()
    }

    /// Whether a selection (item `i` in bit `i`) respects the capacity.
    pub fn is_feasible(&self, selection: u64) -> bool {
        self.selection_weight(selection) <= self.capacity
    }

    /// Total weight of a selection, item `i` in bit `i`.
    pub fn selection_weight(&self, selection: u64) -> u64 {
        self.weights
            .iter()
            .enumerate()
            .filter(|(i, _)| (selection >> i) & 1 == 1)
            .fold(0u64, |acc, (_, w)| acc.saturating_add(*w))
    }

    /// Every feasible selection as a bitstring, character `i` = item `i`.
    pub fn feasible_states(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut bits = Vec::with_capacity(self.weights.len());
        self.collect_feasible(0, &mut bits, &mut out);
        out.sort();
        out
    }

    fn collect_feasible(&self, used: u64, bits: &mut Vec<char>, out: &mut Vec<String>) {
        let i = bits.len();
        if i == self.weights.len() {
            out.push(bits.iter().collect());
            return;
        }
        bits.push('0');
        self.collect_feasible(used, bits, out);
        bits.pop();
        let with = used.saturating_add(self.weights[i]);
        if with <= self.capacity {
            bits.push('1');
            self.collect_feasible(with, bits, out);
            bits.pop();
        }
    }

    /// Build the generator circuit.
    ///
    /// The circuit is named `qtg` and carries the registers `state`, `sum`,
    /// `carry`, `control` and `flag`. Comparators and v-chain NOTs are left as
    /// high-level gates; see [`build_lowered`](Self::build_lowered).
    #[instrument(skip(self), fields(items = self.weights.len(), capacity = self.capacity))]
    pub fn build(&self) -> CoreResult<Circuit> {
        let mut circuit = Circuit::new("qtg");
        self.layout.allocate(&mut circuit);

        let state = self.layout.state_qubits();
        let sum = self.layout.sum_qubits();
        let flag = self.layout.flag_qubit();
        let width = self.layout.sum_width();
        let adder = WeightedAdder::from_layout(&self.layout);
        let capacity = i64::try_from(self.capacity).unwrap_or(i64::MAX);

        for (i, (&weight, &item)) in self.weights.iter().zip(&state).enumerate() {
            let w = i64::try_from(weight).unwrap_or(i64::MAX);
            let threshold = capacity.saturating_add(1).saturating_sub(w);
            let comparator = ThresholdComparator::less_than(width, threshold);
            comparator.append(&mut circuit, &sum, flag)?;
            self.bias
                .rotation(i)
                .append_controlled(&mut circuit, flag, item)?;
            comparator.append(&mut circuit, &sum, flag)?;
            adder.append(&mut circuit, item, weight)?;
        }

        debug!(
            qubits = circuit.num_qubits(),
            ops = circuit.num_ops(),
            sum_width = width,
            "built tree generator"
        );
        Ok(circuit)
    }

    /// Build the generator and lower it to primitive gates.
    pub fn build_lowered(&self) -> CoreResult<Circuit> {
        let circuit = self.build()?;
        Ok(qtg_compile::lower(&circuit)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(matches!(
            QuantumTreeGenerator::new(&[], 3),
            Err(CoreError::EmptyWeights)
        ));
        assert!(matches!(
            QuantumTreeGenerator::new(&[1, -2], 3),
            Err(CoreError::NegativeWeight { index: 1, .. })
        ));
        assert!(matches!(
            QuantumTreeGenerator::new(&[1, 2], -1),
            Err(CoreError::InvalidCapacity(_))
        ));
        assert!(matches!(
            QuantumTreeGenerator::from_f64(&[1.0, 2.5], 3.0),
            Err(CoreError::NonIntegralWeight { index: 1, .. })
        ));
        assert!(matches!(
            QuantumTreeGenerator::from_f64(&[1.0], 2.5),
            Err(CoreError::InvalidCapacity(_))
        ));
    }

    #[test]
    fn test_bias_length_checked() {
        let qtg = QuantumTreeGenerator::new(&[1, 2, 3], 2).unwrap();
        let bias = BiasAnsatz::from_bitstring("10", 1.0).unwrap();
        assert!(matches!(
            qtg.with_bias(bias),
            Err(CoreError::BiasLengthMismatch {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn test_feasible_states() {
        let qtg = QuantumTreeGenerator::new(&[1, 2, 3], 2).unwrap();
        assert_eq!(qtg.feasible_states(), vec!["000", "010", "100"]);
        assert!(qtg.is_feasible(0b001));
        assert!(!qtg.is_feasible(0b011));
        assert_eq!(qtg.selection_weight(0b101), 4);
    }

    #[test]
    fn test_circuit_shape() {
        let qtg = QuantumTreeGenerator::new(&[1, 2, 3], 2).unwrap();
        let circuit = qtg.build().unwrap();
        assert_eq!(circuit.name(), "qtg");
        assert_eq!(circuit.num_qubits(), qtg.num_qubits());
        let ops = circuit.count_ops();
        assert_eq!(ops.get("cmp"), Some(&6));
        assert_eq!(ops.get("cry"), Some(&3));
        assert_eq!(ops.get("cz"), Some(&3));

        let lowered = qtg.build_lowered().unwrap();
        let ops = lowered.count_ops();
        assert!(!ops.contains_key("cmp"));
        assert!(!ops.contains_key("mcx_vchain"));
    }

    #[test]
    fn test_zero_weight_item_skips_adder() {
        let qtg = QuantumTreeGenerator::new(&[0], 0).unwrap();
        let circuit = qtg.build().unwrap();
        // cmp, cz, cry, cmp
        assert_eq!(circuit.num_ops(), 4);
    }

    #[test]
    fn test_build_is_pure() {
        let qtg = QuantumTreeGenerator::new(&[2, 3, 1], 4).unwrap();
        let a: Vec<_> = qtg.build().unwrap().instructions().cloned().collect();
        let b: Vec<_> = qtg.build().unwrap().instructions().cloned().collect();
        assert_eq!(a, b);
    }
}
