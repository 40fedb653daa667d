//! Pauli-sum Hamiltonians.
//!
//! A Hamiltonian is a real-weighted sum of Pauli strings on a fixed number of
//! qubits:
//!
//!   H = Σ_k  c_k · P_k
//!
//! Qubit `i` of a string is bit `i` of a basis index, so `Z_0` has eigenvalue
//! `-1` on every basis state whose index is odd.
//!
//! # Example
//!
//! ```rust
//! use qtg_sim::hamiltonian::{Hamiltonian, HamiltonianTerm};
//!
//! // H = 0.5 - 0.5·Z₀  (projector onto |1⟩ of qubit 0)
//! let h = Hamiltonian::from_terms(vec![
//!     HamiltonianTerm::identity(0.5),
//!     HamiltonianTerm::z(0, -0.5),
//! ]);
//! assert_eq!(h.num_qubits(), 1);
//! assert!((h.basis_expectation(0b1) - 1.0).abs() < 1e-12);
//! ```

use num_complex::Complex64;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Coefficients below this magnitude are dropped by [`Hamiltonian::simplify`].
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    /// Phase of this operator acting on a single basis bit: `op|b⟩ = phase·|b ⊕ flip⟩`.
    fn phase(self, bit: bool) -> Complex64 {
        match (self, bit) {
            (PauliOp::I | PauliOp::X, _) => Complex64::new(1.0, 0.0),
            (PauliOp::Y, false) => Complex64::new(0.0, 1.0),
            (PauliOp::Y, true) => Complex64::new(0.0, -1.0),
            (PauliOp::Z, false) => Complex64::new(1.0, 0.0),
            (PauliOp::Z, true) => Complex64::new(-1.0, 0.0),
        }
    }

    fn flips(self) -> bool {
        matches!(self, PauliOp::X | PauliOp::Y)
    }
}

/// A tensor product of Pauli operators.
///
/// Stored as a sorted `Vec<(qubit_index, PauliOp)>` with identity factors
/// omitted; qubits not listed are implicitly I.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PauliString {
    ops: Vec<(u32, PauliOp)>,
}

impl PauliString {
    /// The identity string.
    pub fn identity() -> Self {
        Self { ops: Vec::new() }
    }

    /// Construct a string from (qubit, op) pairs. Identity factors are dropped.
    pub fn from_ops(ops: impl IntoIterator<Item = (u32, PauliOp)>) -> Self {
        let mut v: Vec<(u32, PauliOp)> = ops
            .into_iter()
            .filter(|(_, op)| *op != PauliOp::I)
            .collect();
        v.sort_by_key(|(q, _)| *q);
        Self { ops: v }
    }

    /// Construct a Z⊗Z⊗...⊗Z string spanning the given qubits.
    pub fn zz(qubits: impl IntoIterator<Item = u32>) -> Self {
        Self::from_ops(qubits.into_iter().map(|q| (q, PauliOp::Z)))
    }

    /// Build a string from X and Z bit masks (`X` and `Z` both set means `Y`).
    pub fn from_masks(x_mask: u64, z_mask: u64) -> Self {
        let mut ops = Vec::new();
        let mut rest = x_mask | z_mask;
        while rest != 0 {
            let q = rest.trailing_zeros();
            let bit = 1u64 << q;
            let op = match (x_mask & bit != 0, z_mask & bit != 0) {
                (true, true) => PauliOp::Y,
                (true, false) => PauliOp::X,
                _ => PauliOp::Z,
            };
            ops.push((q, op));
            rest &= !bit;
        }
        Self { ops }
    }

    /// The non-identity (qubit, op) pairs, sorted by qubit index.
    pub fn ops(&self) -> &[(u32, PauliOp)] {
        &self.ops
    }

    /// True if there are no non-identity factors.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// True if every factor is Z.
    pub fn is_diagonal(&self) -> bool {
        self.ops.iter().all(|(_, op)| *op == PauliOp::Z)
    }

    /// The highest qubit index referenced.
    pub fn max_qubit(&self) -> Option<u32> {
        self.ops.last().map(|(q, _)| *q)
    }

    /// Mask of qubits whose bit is flipped (X or Y factors).
    pub fn x_mask(&self) -> u64 {
        self.ops
            .iter()
            .filter(|(_, op)| op.flips())
            .fold(0, |m, (q, _)| m | (1u64 << q))
    }

    /// Mask of qubits carrying a Z component (Z or Y factors).
    pub fn z_mask(&self) -> u64 {
        self.ops
            .iter()
            .filter(|(_, op)| matches!(op, PauliOp::Z | PauliOp::Y))
            .fold(0, |m, (q, _)| m | (1u64 << q))
    }

    /// Apply the string to basis state `index`, returning `(index', phase)`
    /// with `P|index⟩ = phase·|index'⟩`.
    pub fn apply_to_basis(&self, index: u64) -> (u64, Complex64) {
        let mut phase = Complex64::new(1.0, 0.0);
        for &(q, op) in &self.ops {
            phase *= op.phase((index >> q) & 1 == 1);
        }
        (index ^ self.x_mask(), phase)
    }

    /// Product of Z eigenvalues on basis state `index`, or `None` if the
    /// string is off-diagonal.
    pub fn basis_eigenvalue(&self, index: u64) -> Option<f64> {
        if !self.is_diagonal() {
            return None;
        }
        let parity = (index & self.z_mask()).count_ones();
        Some(if parity % 2 == 0 { 1.0 } else { -1.0 })
    }
}

/// A single weighted Pauli term: `coeff · pauli`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HamiltonianTerm {
    /// Real coefficient.
    pub coeff: f64,
    /// The Pauli string.
    pub pauli: PauliString,
}

impl HamiltonianTerm {
    /// Create a new term.
    pub fn new(coeff: f64, pauli: PauliString) -> Self {
        Self { coeff, pauli }
    }

    /// Constant offset `coeff · I`.
    pub fn identity(coeff: f64) -> Self {
        Self::new(coeff, PauliString::identity())
    }

    /// Shorthand: single-qubit Z term.
    pub fn z(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::Z)]))
    }

    /// Shorthand: ZZ coupling term.
    pub fn zz(q0: u32, q1: u32, coeff: f64) -> Self {
        Self::new(
            coeff,
            PauliString::from_ops([(q0, PauliOp::Z), (q1, PauliOp::Z)]),
        )
    }

    /// Shorthand: single-qubit X term.
    pub fn x(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::X)]))
    }
}

/// A sum-of-Pauli-strings Hamiltonian on `num_qubits` qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hamiltonian {
    num_qubits: u32,
    terms: Vec<HamiltonianTerm>,
}

impl Hamiltonian {
    /// Create a Hamiltonian of an explicit width.
    ///
    /// Fails if a term touches a qubit at or beyond `num_qubits`.
    pub fn new(num_qubits: u32, terms: Vec<HamiltonianTerm>) -> SimResult<Self> {
        for term in &terms {
            if let Some(q) = term.pauli.max_qubit() {
                if q >= num_qubits {
                    return Err(SimError::QubitOutOfRange {
                        qubit: q,
                        n_qubits: num_qubits,
                    });
                }
            }
        }
        Ok(Self { num_qubits, terms })
    }

    /// Create from a list of terms; the width is the smallest that fits them.
    pub fn from_terms(terms: Vec<HamiltonianTerm>) -> Self {
        let num_qubits = min_qubits(&terms);
        Self { num_qubits, terms }
    }

    /// The zero operator on `num_qubits` qubits.
    pub fn zero(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            terms: Vec::new(),
        }
    }

    /// `Σ_i X_i`, the transverse-field mixer.
    pub fn transverse_field(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            terms: (0..num_qubits).map(|q| HamiltonianTerm::x(q, 1.0)).collect(),
        }
    }

    /// All terms.
    pub fn terms(&self) -> &[HamiltonianTerm] {
        &self.terms
    }

    /// Number of terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Width of the operator.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Spectral norm upper bound: Σ |c_k|.
    pub fn lambda(&self) -> f64 {
        self.terms.iter().map(|t| t.coeff.abs()).sum()
    }

    /// The smallest width that holds every term.
    pub fn min_qubits(&self) -> u32 {
        min_qubits(&self.terms)
    }

    /// Merge terms with identical strings and drop those with `|c| < tol`.
    ///
    /// Terms keep the order in which their string first appeared.
    #[must_use]
    pub fn simplify(&self, tol: f64) -> Self {
        let mut index: FxHashMap<&PauliString, usize> = FxHashMap::default();
        let mut merged: Vec<HamiltonianTerm> = Vec::new();
        for term in &self.terms {
            match index.get(&term.pauli) {
                Some(&k) => merged[k].coeff += term.coeff,
                None => {
                    index.insert(&term.pauli, merged.len());
                    merged.push(term.clone());
                }
            }
        }
        merged.retain(|t| t.coeff.abs() >= tol);
        Self {
            num_qubits: self.num_qubits,
            terms: merged,
        }
    }

    /// True if the operator is a multiple of the identity (including zero).
    pub fn is_identity(&self) -> bool {
        self.simplify(DEFAULT_TOLERANCE)
            .terms
            .iter()
            .all(|t| t.pauli.is_identity())
    }

    /// True if every term is diagonal in the computational basis.
    pub fn is_diagonal(&self) -> bool {
        self.terms.iter().all(|t| t.pauli.is_diagonal())
    }

    /// The same operator on a wider register; new qubits carry identity.
    pub fn extend(&self, num_qubits: u32) -> SimResult<Self> {
        if num_qubits < self.num_qubits {
            return Err(SimError::CannotShrink {
                from: self.num_qubits,
                to: num_qubits,
            });
        }
        Ok(Self {
            num_qubits,
            terms: self.terms.clone(),
        })
    }

    /// `⟨index|H|index⟩` for a computational basis state.
    pub fn basis_expectation(&self, index: u64) -> f64 {
        self.terms
            .iter()
            .filter_map(|t| t.pauli.basis_eigenvalue(index).map(|e| t.coeff * e))
            .sum()
    }
}

impl FromIterator<HamiltonianTerm> for Hamiltonian {
    fn from_iter<T: IntoIterator<Item = HamiltonianTerm>>(iter: T) -> Self {
        Self::from_terms(iter.into_iter().collect())
    }
}

fn min_qubits(terms: &[HamiltonianTerm]) -> u32 {
    terms
        .iter()
        .filter_map(|t| t.pauli.max_qubit())
        .max()
        .map_or(0, |q| q + 1)
}
