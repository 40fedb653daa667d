//! The operator type shared by cost functions, mixers and the oracle.
//!
//! An [`Operator`] is either a weighted Pauli sum or a dense Hermitian
//! matrix. Both representations interconvert, report their width and can be
//! padded with identity on additional high-index qubits.

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{SimError, SimResult};
use crate::hamiltonian::{DEFAULT_TOLERANCE, Hamiltonian, HamiltonianTerm, PauliString};
use crate::matrix::{MatrixOperator, check_width};

/// Largest width accepted by the Pauli decomposition of a dense matrix.
pub const MAX_DECOMPOSE_QUBITS: u32 = 10;

/// A Hermitian observable or generator.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// Weighted sum of Pauli strings.
    Pauli(Hamiltonian),
    /// Dense Hermitian matrix.
    Matrix(MatrixOperator),
}

impl Operator {
    /// Number of qubits the operator acts on.
    pub fn num_qubits(&self) -> u32 {
        match self {
            Operator::Pauli(h) => h.num_qubits(),
            Operator::Matrix(m) => m.num_qubits(),
        }
    }

    /// True if the operator is proportional to the identity, so that its
    /// evolution is a global phase.
    pub fn is_identity(&self) -> bool {
        match self {
            Operator::Pauli(h) => h.is_identity(),
            Operator::Matrix(m) => m.is_identity(DEFAULT_TOLERANCE),
        }
    }

    /// True if the operator is diagonal in the computational basis.
    pub fn is_diagonal(&self) -> bool {
        match self {
            Operator::Pauli(h) => h.is_diagonal(),
            Operator::Matrix(m) => m.is_diagonal(DEFAULT_TOLERANCE),
        }
    }

    /// Dense matrix representation.
    pub fn to_matrix(&self) -> SimResult<Array2<Complex64>> {
        match self {
            Operator::Pauli(h) => pauli_to_dense(h),
            Operator::Matrix(m) => Ok(m.matrix().clone()),
        }
    }

    /// Pauli-sum representation.
    ///
    /// Dense matrices are decomposed with `c_P = Tr(P·M) / 2^n`; strings with
    /// negligible weight are dropped.
    pub fn to_pauli(&self) -> SimResult<Hamiltonian> {
        match self {
            Operator::Pauli(h) => Ok(h.clone()),
            Operator::Matrix(m) => dense_to_pauli(m),
        }
    }

    /// Convert to the dense representation.
    pub fn into_matrix_operator(self) -> SimResult<MatrixOperator> {
        match self {
            Operator::Pauli(h) => MatrixOperator::new(pauli_to_dense(&h)?),
            Operator::Matrix(m) => Ok(m),
        }
    }

    /// The same operator on `num_qubits` qubits, identity on the new ones.
    pub fn extend(&self, num_qubits: u32) -> SimResult<Operator> {
        match self {
            Operator::Pauli(h) => h.extend(num_qubits).map(Operator::Pauli),
            Operator::Matrix(m) => m.extend(num_qubits).map(Operator::Matrix),
        }
    }

    /// `⟨index|O|index⟩` for a computational basis state.
    pub fn basis_expectation(&self, index: u64) -> f64 {
        match self {
            Operator::Pauli(h) => h.basis_expectation(index),
            Operator::Matrix(m) => {
                let i = index as usize;
                if i < m.dim() { m.matrix()[[i, i]].re } else { 0.0 }
            }
        }
    }
}

impl From<Hamiltonian> for Operator {
    fn from(h: Hamiltonian) -> Self {
        Operator::Pauli(h)
    }
}

impl From<MatrixOperator> for Operator {
    fn from(m: MatrixOperator) -> Self {
        Operator::Matrix(m)
    }
}

/// Dense matrix of a Pauli sum.
pub fn pauli_to_dense(h: &Hamiltonian) -> SimResult<Array2<Complex64>> {
    check_width(h.num_qubits())?;
    let dim = 1usize << h.num_qubits();
    let mut matrix = Array2::zeros((dim, dim));
    for term in h.terms() {
        for col in 0..dim {
            let (row, phase) = term.pauli.apply_to_basis(col as u64);
            matrix[[row as usize, col]] += phase * term.coeff;
        }
    }
    Ok(matrix)
}

fn dense_to_pauli(m: &MatrixOperator) -> SimResult<Hamiltonian> {
    let n = m.num_qubits();
    if n > MAX_DECOMPOSE_QUBITS {
        return Err(SimError::TooLarge {
            num_qubits: n,
            max: MAX_DECOMPOSE_QUBITS,
        });
    }
    let dim = m.dim();
    let scale = 1.0 / dim as f64;
    let mut terms = Vec::new();
    for x_mask in 0..dim as u64 {
        for z_mask in 0..dim as u64 {
            let pauli = PauliString::from_masks(x_mask, z_mask);
            // Tr(P·M) = Σ_r phase(r)·M[r, r⊕x] where P|r⟩ = phase(r)·|r⊕x⟩
            let mut trace = Complex64::new(0.0, 0.0);
            for col in 0..dim {
                let (row, phase) = pauli.apply_to_basis(col as u64);
                trace += phase * m.matrix()[[col, row as usize]];
            }
            let coeff = trace.re * scale;
            if coeff.abs() >= DEFAULT_TOLERANCE {
                terms.push(HamiltonianTerm::new(coeff, pauli));
            }
        }
    }
    Hamiltonian::new(n, terms)
}

/// Pauli expansion of `w·(|x⟩⟨y| + |y⟩⟨x|)` on `n` qubits.
///
/// Bit-equal positions contribute `I` or `Z`, differing positions `X` or `Y`.
/// Only strings with an even number of `Y` factors survive the Hermitian sum.
pub fn transition_terms(x: u64, y: u64, weight: f64, n: u32) -> Vec<HamiltonianTerm> {
    let full = if n >= 64 { u64::MAX } else { (1u64 << n) - 1 };
    let diff = (x ^ y) & full;
    let same = !diff & full;
    let scale = 2.0 * weight / (n as f64).exp2();

    let mut terms = Vec::new();
    for y_sub in submasks(diff) {
        // i per Y where x has 0, -i per Y where x has 1: i^(a + 3b)
        let a = (y_sub & !x).count_ones();
        let b = (y_sub & x).count_ones();
        let power = a + 3 * b;
        if power % 2 == 1 {
            continue;
        }
        let y_sign = if (power / 2) % 2 == 0 { 1.0 } else { -1.0 };
        for z_sub in submasks(same) {
            let z_sign = if (z_sub & x).count_ones() % 2 == 0 { 1.0 } else { -1.0 };
            terms.push(HamiltonianTerm::new(
                scale * y_sign * z_sign,
                PauliString::from_masks(diff, z_sub | y_sub),
            ));
        }
    }
    terms
}

/// All submasks of `mask`, including zero and `mask` itself.
fn submasks(mask: u64) -> impl Iterator<Item = u64> {
    let mut next = Some(mask);
    std::iter::from_fn(move || {
        let current = next?;
        next = if current == 0 { None } else { Some((current - 1) & mask) };
        Some(current)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-10
    }

    #[test]
    fn test_submasks() {
        let mut all: Vec<u64> = submasks(0b101).collect();
        all.sort_unstable();
        assert_eq!(all, vec![0b000, 0b001, 0b100, 0b101]);
        assert_eq!(submasks(0).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_pauli_to_dense_zz() {
        let h = Hamiltonian::from_terms(vec![HamiltonianTerm::zz(0, 1, 1.0)]);
        let m = pauli_to_dense(&h).unwrap();
        for (i, expected) in [1.0, -1.0, -1.0, 1.0].into_iter().enumerate() {
            assert!(approx_eq(m[[i, i]].re, expected));
        }
    }

    #[test]
    fn test_dense_roundtrip_through_pauli() {
        let h = Hamiltonian::from_terms(vec![
            HamiltonianTerm::x(0, 0.5),
            HamiltonianTerm::zz(0, 1, -1.25),
            HamiltonianTerm::new(
                0.75,
                PauliString::from_ops([
                    (0, crate::hamiltonian::PauliOp::Y),
                    (1, crate::hamiltonian::PauliOp::Y),
                ]),
            ),
            HamiltonianTerm::identity(2.0),
        ]);
        let dense = Operator::Pauli(h.clone()).into_matrix_operator().unwrap();
        let back = Operator::Matrix(dense).to_pauli().unwrap();
        assert_eq!(back.n_terms(), 4);
        for term in h.terms() {
            let found = back
                .terms()
                .iter()
                .find(|t| t.pauli == term.pauli)
                .expect("term survives decomposition");
            assert!(approx_eq(found.coeff, term.coeff));
        }
    }

    #[test]
    fn test_transition_terms_match_dense() {
        for (x, y) in [(0b00u64, 0b11u64), (0b01, 0b10), (0b001, 0b110), (0b010, 0b011)] {
            let n = 3;
            let h = Hamiltonian::new(n, transition_terms(x, y, 0.5, n)).unwrap();
            let m = pauli_to_dense(&h).unwrap();
            for r in 0..8u64 {
                for c in 0..8u64 {
                    let expected = if (r, c) == (x, y) || (r, c) == (y, x) { 0.5 } else { 0.0 };
                    let v = m[[r as usize, c as usize]];
                    assert!(approx_eq(v.re, expected), "({r},{c}) for {x:b}<->{y:b}");
                    assert!(approx_eq(v.im, 0.0));
                }
            }
        }
    }

    #[test]
    fn test_extend_operator() {
        let op = Operator::Pauli(Hamiltonian::transverse_field(1));
        let wide = op.extend(3).unwrap();
        assert_eq!(wide.num_qubits(), 3);
        let dense = Operator::Matrix(op.into_matrix_operator().unwrap())
            .extend(3)
            .unwrap();
        assert_eq!(dense.to_matrix().unwrap(), wide.to_matrix().unwrap());
    }

    #[test]
    fn test_identity_and_basis_expectation() {
        let op = Operator::Pauli(Hamiltonian::from_terms(vec![HamiltonianTerm::identity(3.0)]));
        assert!(op.is_identity());
        assert!(op.is_diagonal());
        assert!(approx_eq(op.basis_expectation(0), 3.0));
    }
}
