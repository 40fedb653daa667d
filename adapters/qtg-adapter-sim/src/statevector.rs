//! Statevector simulation engine.
//!
//! Basis index `i` holds qubit `q` in bit `q`. Every gate is applied in
//! place with bit-mask kernels; composite gates (multi-controlled, comparator,
//! dense evolution) get dedicated kernels instead of being decomposed.

use num_complex::Complex64;
use rand::Rng;

use qtg_compile::{Unitary2x2, controlled_unitary};
use qtg_hal::{HalError, HalResult};
use qtg_ir::{
    Circuit, ComparatorGate, CustomGate, EvolutionGate, GateKind, Instruction, InstructionKind,
    StandardGate,
};
use qtg_sim::{Hamiltonian, MatrixOperator, Operator, evolution_unitary};

/// A statevector representing a quantum state.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Simulate `circuit` from |0...0⟩.
    pub fn from_circuit(circuit: &Circuit) -> HalResult<Self> {
        let mut sv = Self::new(circuit.num_qubits());
        for inst in circuit.instructions() {
            sv.apply(inst)?;
        }
        Ok(sv)
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Probability of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Apply an instruction to the statevector.
    ///
    /// Measurements are deferred: they leave the state untouched and are
    /// resolved when sampling.
    pub fn apply(&mut self, instruction: &Instruction) -> HalResult<()> {
        let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
        if let Some(&q) = qubits.iter().find(|&&q| q >= self.num_qubits) {
            return Err(HalError::InvalidCircuit(format!(
                "{} acts on qubit {q} of a {}-qubit state",
                instruction.name(),
                self.num_qubits
            )));
        }
        match &instruction.kind {
            InstructionKind::Gate(gate) => self.apply_gate(&gate.kind, &qubits),
            InstructionKind::Reset => {
                for &q in &qubits {
                    self.reset(q);
                }
                Ok(())
            }
            InstructionKind::Measure | InstructionKind::Barrier => Ok(()),
        }
    }

    fn apply_gate(&mut self, gate: &GateKind, qubits: &[usize]) -> HalResult<()> {
        match gate {
            GateKind::Standard(g) => self.apply_standard_gate(g, qubits),
            GateKind::Comparator(g) => {
                let (flag, register) = split_last(qubits)?;
                self.apply_comparator(g, register, flag);
                Ok(())
            }
            GateKind::Custom(g) => self.apply_custom(g, qubits),
            GateKind::Evolution(g) => self.apply_evolution(g, qubits),
        }
    }

    fn apply_standard_gate(&mut self, gate: &StandardGate, qubits: &[usize]) -> HalResult<()> {
        let view = controlled_unitary(gate).map_err(|e| HalError::InvalidCircuit(e.to_string()))?;
        if let Some((core, n_controls)) = view {
            let target = *qubits.get(n_controls).ok_or_else(|| arity_error(gate.name()))?;
            let control_mask = mask_of(&qubits[..n_controls]);
            self.apply_controlled(&core, control_mask, target);
            return Ok(());
        }
        match gate {
            StandardGate::Swap => self.apply_swap(0, qubits[0], qubits[1]),
            StandardGate::CSwap => self.apply_swap(1 << qubits[0], qubits[1], qubits[2]),
            StandardGate::RXX(t) | StandardGate::RYY(t) | StandardGate::RZZ(t) => {
                let theta = t.as_f64().ok_or_else(|| {
                    HalError::InvalidCircuit(format!("unbound parameter in {}", gate.name()))
                })?;
                let matrix = two_qubit_rotation(gate, theta);
                self.apply_matrix(&qubits[..2], &matrix);
            }
            other => return Err(HalError::Unsupported(other.name().to_string())),
        }
        Ok(())
    }

    // =========================================================================
    // Kernels
    // =========================================================================

    /// Apply `core` to `target` on every basis state whose control bits are all set.
    fn apply_controlled(&mut self, core: &Unitary2x2, control_mask: usize, target: usize) {
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & tgt_mask == 0 && i & control_mask == control_mask {
                let j = i | tgt_mask;
                let (a, b) = core.apply(self.amplitudes[i], self.amplitudes[j]);
                self.amplitudes[i] = a;
                self.amplitudes[j] = b;
            }
        }
    }

    fn apply_swap(&mut self, control_mask: usize, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if i & control_mask == control_mask && i & mask1 != 0 && i & mask2 == 0 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Flip `flag` on every basis state whose register value satisfies the comparison.
    fn apply_comparator(&mut self, gate: &ComparatorGate, register: &[usize], flag: usize) {
        let flag_mask = 1 << flag;
        for i in 0..self.amplitudes.len() {
            if i & flag_mask != 0 {
                continue;
            }
            let value = register
                .iter()
                .enumerate()
                .fold(0u64, |v, (k, &q)| v | ((((i >> q) & 1) as u64) << k));
            if gate.evaluate(value) {
                self.amplitudes.swap(i, i | flag_mask);
            }
        }
    }

    fn apply_custom(&mut self, gate: &CustomGate, qubits: &[usize]) -> HalResult<()> {
        if qubits.len() != gate.num_qubits as usize {
            return Err(arity_error(&gate.name));
        }
        self.apply_matrix(qubits, &gate.matrix);
        Ok(())
    }

    fn apply_evolution(&mut self, gate: &EvolutionGate, qubits: &[usize]) -> HalResult<()> {
        if qubits.len() != gate.num_qubits as usize {
            return Err(arity_error(&gate.label));
        }
        let time = gate.time.as_f64().ok_or_else(|| {
            HalError::InvalidCircuit(format!("unbound evolution time in '{}'", gate.label))
        })?;
        let generator = MatrixOperator::from_row_major(gate.num_qubits, gate.generator.clone())?;
        let unitary = evolution_unitary(generator.matrix(), time);
        let flat: Vec<Complex64> = unitary.iter().copied().collect();
        self.apply_matrix(qubits, &flat);
        Ok(())
    }

    /// Apply a dense row-major `2^k × 2^k` matrix; local bit `k` is `qubits[k]`.
    fn apply_matrix(&mut self, qubits: &[usize], matrix: &[Complex64]) {
        let k = qubits.len();
        let dim = 1usize << k;
        let gather_mask = mask_of(qubits);
        let offsets: Vec<usize> = (0..dim)
            .map(|local| {
                qubits
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| (local >> bit) & 1 == 1)
                    .fold(0, |m, (_, &q)| m | (1 << q))
            })
            .collect();
        let mut local_in = vec![Complex64::new(0.0, 0.0); dim];
        for base in 0..self.amplitudes.len() {
            if base & gather_mask != 0 {
                continue;
            }
            for (slot, offset) in local_in.iter_mut().zip(&offsets) {
                *slot = self.amplitudes[base | offset];
            }
            for (row, offset) in offsets.iter().enumerate() {
                let mut acc = Complex64::new(0.0, 0.0);
                for (col, amp) in local_in.iter().enumerate() {
                    acc += matrix[row * dim + col] * amp;
                }
                self.amplitudes[base | offset] = acc;
            }
        }
    }

    fn reset(&mut self, qubit: usize) {
        // Project onto |0⟩ and renormalise
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask != 0 {
                self.amplitudes[i] = Complex64::new(0.0, 0.0);
            }
        }
        let norm = self
            .amplitudes
            .iter()
            .map(Complex64::norm_sqr)
            .sum::<f64>()
            .sqrt();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        } else {
            // All weight was on |1⟩; reset maps it to |0⟩
            self.amplitudes[0] = Complex64::new(1.0, 0.0);
        }
    }

    // =========================================================================
    // Observables
    // =========================================================================

    /// Exact `⟨ψ|O|ψ⟩`. Narrower observables act as identity on the extra qubits.
    pub fn expectation(&self, observable: &Operator) -> HalResult<f64> {
        let width = observable.num_qubits() as usize;
        if width > self.num_qubits {
            return Err(HalError::ObservableMismatch {
                observable: observable.num_qubits(),
                circuit: self.num_qubits,
            });
        }
        match observable {
            Operator::Pauli(h) => Ok(self.pauli_expectation(h)),
            Operator::Matrix(m) if width == self.num_qubits => Ok(m.expectation(&self.amplitudes)?),
            Operator::Matrix(m) => Ok(m
                .extend(self.num_qubits as u32)?
                .expectation(&self.amplitudes)?),
        }
    }

    fn pauli_expectation(&self, h: &Hamiltonian) -> f64 {
        h.terms()
            .iter()
            .map(|term| {
                if term.pauli.is_identity() {
                    return term.coeff;
                }
                let value: Complex64 = self
                    .amplitudes
                    .iter()
                    .enumerate()
                    .map(|(i, amp)| {
                        let (j, phase) = term.pauli.apply_to_basis(i as u64);
                        self.amplitudes[j as usize].conj() * phase * amp
                    })
                    .sum();
                term.coeff * value.re
            })
            .sum()
    }

    // =========================================================================
    // Sampling
    // =========================================================================

    /// Cumulative distribution over basis states, for repeated sampling.
    pub fn cumulative(&self) -> Vec<f64> {
        let mut acc = 0.0;
        self.amplitudes
            .iter()
            .map(|amp| {
                acc += amp.norm_sqr();
                acc
            })
            .collect()
    }

    /// Sample a basis state.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        sample_cumulative(&self.cumulative(), rng)
    }

    /// Convert a basis index to a bitstring with character `i` = qubit `i`.
    pub fn outcome_to_bitstring(&self, outcome: usize) -> String {
        format!("{:0width$b}", outcome, width = self.num_qubits)
            .chars()
            .rev()
            .collect()
    }

    /// Copy of this state with `P`'s eigenbasis rotated onto Z for each factor.
    pub(crate) fn rotated_to_z(&self, pauli: &qtg_sim::PauliString) -> Self {
        let mut sv = self.clone();
        for &(q, op) in pauli.ops() {
            let q = q as usize;
            match op {
                qtg_sim::PauliOp::X => sv.apply_controlled(&Unitary2x2::h(), 0, q),
                qtg_sim::PauliOp::Y => {
                    sv.apply_controlled(&Unitary2x2::sdg(), 0, q);
                    sv.apply_controlled(&Unitary2x2::h(), 0, q);
                }
                qtg_sim::PauliOp::Z | qtg_sim::PauliOp::I => {}
            }
        }
        sv
    }
}

/// Draw an index from a cumulative distribution.
pub(crate) fn sample_cumulative<R: Rng + ?Sized>(cumulative: &[f64], rng: &mut R) -> usize {
    let total = cumulative.last().copied().unwrap_or(0.0);
    let r: f64 = rng.r#gen::<f64>() * total;
    cumulative
        .partition_point(|&c| c <= r)
        .min(cumulative.len().saturating_sub(1))
}

fn mask_of(qubits: &[usize]) -> usize {
    qubits.iter().fold(0, |m, q| m | (1 << q))
}

fn split_last(qubits: &[usize]) -> HalResult<(usize, &[usize])> {
    qubits
        .split_last()
        .map(|(last, rest)| (*last, rest))
        .ok_or_else(|| arity_error("cmp"))
}

fn arity_error(name: &str) -> HalError {
    HalError::InvalidCircuit(format!("wrong number of qubits for {name}"))
}

/// Row-major 4×4 matrix of RXX, RYY or RZZ; local bit 0 is the first qubit.
fn two_qubit_rotation(gate: &StandardGate, theta: f64) -> Vec<Complex64> {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let zero = Complex64::new(0.0, 0.0);
    let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
    let i_s = -neg_i_s;
    match gate {
        // cos·I - i·sin·XX
        StandardGate::RXX(_) => vec![
            c, zero, zero, neg_i_s, //
            zero, c, neg_i_s, zero, //
            zero, neg_i_s, c, zero, //
            neg_i_s, zero, zero, c,
        ],
        // YY|00⟩ = -|11⟩, YY|01⟩ = |10⟩
        StandardGate::RYY(_) => vec![
            c, zero, zero, i_s, //
            zero, c, neg_i_s, zero, //
            zero, neg_i_s, c, zero, //
            i_s, zero, zero, c,
        ],
        // diag(e^{-iθ/2}, e^{iθ/2}, e^{iθ/2}, e^{-iθ/2})
        _ => {
            let minus = Complex64::from_polar(1.0, -theta / 2.0);
            let plus = Complex64::from_polar(1.0, theta / 2.0);
            vec![
                minus, zero, zero, zero, //
                zero, plus, zero, zero, //
                zero, zero, plus, zero, //
                zero, zero, zero, minus,
            ]
        }
    }
}
