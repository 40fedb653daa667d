//! Algebraic mixer over an explicit feasible set.
//!
//! `H = Σ w·(|x⟩⟨y| + |y⟩⟨x|)` over connected pairs `x ≠ y` of feasible
//! bitstrings. `exp(−iβH)` acts only inside the span of the feasible states.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use qtg_sim::hamiltonian::DEFAULT_TOLERANCE;
use qtg_sim::{Hamiltonian, MatrixOperator, Operator, transition_terms};

use crate::error::{QaoaError, QaoaResult};

/// Widths up to this many qubits default to a dense matrix.
///
/// A dense mixer holds `4^n` complex entries: 256 MiB at 12 qubits, and
/// another factor of 16 for every two qubits beyond.
pub const DENSE_QUBIT_LIMIT: usize = 12;

/// Which pairs of feasible states are coupled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    /// Every pair.
    #[default]
    Complete,
    /// Pairs at Hamming distance one.
    Hamming1,
}

/// Pairwise mixer Hamiltonian over a set of feasible bitstrings.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintMixer {
    states: Vec<String>,
    indices: Vec<u64>,
    num_qubits: usize,
    connectivity: Connectivity,
    weight: f64,
    sparse: Option<bool>,
}

impl ConstraintMixer {
    /// Create from `(bitstring, value)` pairs; only keys with `value > 0`
    /// are feasible.
    pub fn new<I, S>(states: I) -> QaoaResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let keys: Vec<String> = states
            .into_iter()
            .filter(|(_, v)| *v > 0.0)
            .map(|(s, _)| s.as_ref().to_string())
            .collect();
        Self::from_bitstrings(keys)
    }

    /// Create from a list of feasible bitstrings.
    pub fn from_bitstrings<I, S>(states: I) -> QaoaResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        let mut indices = Vec::new();
        let mut num_qubits = None;
        for s in states {
            let s = s.as_ref();
            if s.is_empty() || s.chars().any(|c| c != '0' && c != '1') {
                return Err(QaoaError::InvalidBitstring {
                    bitstring: s.to_string(),
                });
            }
            let n = *num_qubits.get_or_insert(s.len());
            if s.len() != n {
                return Err(QaoaError::InconsistentLength {
                    bitstring: s.to_string(),
                    expected: n,
                    got: s.len(),
                });
            }
            let index = bitstring_index(s);
            if !indices.contains(&index) {
                indices.push(index);
                out.push(s.to_string());
            }
        }
        let num_qubits = num_qubits.ok_or(QaoaError::EmptyStates)?;
        if num_qubits > 64 {
            return Err(QaoaError::InvalidConfig(format!(
                "{num_qubits}-qubit bitstrings are not supported"
            )));
        }
        Ok(Self {
            states: out,
            indices,
            num_qubits,
            connectivity: Connectivity::Complete,
            weight: 1.0,
            sparse: None,
        })
    }

    /// Set the connectivity strategy.
    #[must_use]
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Set the coupling weight `w`.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Force a Pauli-sum (`true`) or dense (`false`) result.
    #[must_use]
    pub fn with_sparse(mut self, sparse: bool) -> Self {
        self.sparse = Some(sparse);
        self
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The feasible bitstrings, duplicates removed, in input order.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Whether [`operator`](Self::operator) returns a Pauli sum.
    pub fn is_sparse(&self) -> bool {
        self.sparse.unwrap_or(self.num_qubits > DENSE_QUBIT_LIMIT)
    }

    /// Coupled pairs as basis indices, `Σ bitᵢ·2ⁱ`.
    pub fn edges(&self) -> Vec<(u64, u64)> {
        let mut edges = Vec::new();
        for (a, &x) in self.indices.iter().enumerate() {
            for &y in &self.indices[a + 1..] {
                let connected = match self.connectivity {
                    Connectivity::Complete => true,
                    Connectivity::Hamming1 => (x ^ y).count_ones() == 1,
                };
                if connected {
                    edges.push((x, y));
                }
            }
        }
        edges
    }

    /// The mixer Hamiltonian.
    #[allow(clippy::cast_possible_truncation)]
    pub fn operator(&self) -> QaoaResult<Operator> {
        let n = self.num_qubits as u32;
        let edges = self.edges();
        let op = if self.is_sparse() {
            let terms = edges
                .iter()
                .flat_map(|&(x, y)| transition_terms(x, y, self.weight, n))
                .collect();
            Operator::Pauli(Hamiltonian::new(n, terms)?.simplify(DEFAULT_TOLERANCE))
        } else {
            let dim = 1usize << n;
            let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
            let w = Complex64::new(self.weight, 0.0);
            for &(x, y) in &edges {
                let (x, y) = (x as usize, y as usize);
                data[x * dim + y] = w;
                data[y * dim + x] = w;
            }
            Operator::Matrix(MatrixOperator::from_row_major(n, data)?)
        };
        debug!(
            qubits = n,
            states = self.states.len(),
            edges = edges.len(),
            sparse = self.is_sparse(),
            "built constraint mixer"
        );
        Ok(op)
    }
}

/// Basis index of a bitstring, character `i` = bit `i`.
pub(crate) fn bitstring_index(bits: &str) -> u64 {
    bits.bytes()
        .enumerate()
        .filter(|(_, b)| *b == b'1')
        .fold(0, |acc, (i, _)| acc | (1u64 << i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_two_qubits() {
        let mixer = ConstraintMixer::from_bitstrings(["00", "01", "10"]).unwrap();
        let m = mixer.operator().unwrap().to_matrix().unwrap();
        // "00" → 0, "01" → 2, "10" → 1
        let feasible = [0usize, 1, 2];
        let mut nonzero = 0;
        for r in 0..4 {
            for c in 0..4 {
                let v = m[[r, c]];
                assert!((v - m[[c, r]].conj()).norm() < 1e-12);
                let coupled = r != c && feasible.contains(&r) && feasible.contains(&c);
                if coupled {
                    assert!((v.re - 1.0).abs() < 1e-12);
                    nonzero += 1;
                } else {
                    assert!(v.norm() < 1e-12);
                }
            }
        }
        assert_eq!(nonzero, 6);
    }

    #[test]
    fn test_hamming1_skips_distant_pairs() {
        let mixer = ConstraintMixer::from_bitstrings(["011", "101", "110", "000"])
            .unwrap()
            .with_connectivity(Connectivity::Hamming1);
        // every pair among the weight-2 strings differs in two bits
        assert!(mixer.edges().is_empty());

        let mixer = ConstraintMixer::from_bitstrings(["00", "10", "11"])
            .unwrap()
            .with_connectivity(Connectivity::Hamming1);
        assert_eq!(mixer.edges(), vec![(0, 1), (1, 3)]);
    }

    #[test]
    fn test_values_filter_states() {
        let mixer = ConstraintMixer::new([("01", 0.5), ("10", 0.0), ("11", 0.2)]).unwrap();
        assert_eq!(mixer.states(), &["01".to_string(), "11".to_string()]);
        assert!(matches!(
            ConstraintMixer::new([("01", 0.0)]),
            Err(QaoaError::EmptyStates)
        ));
    }

    #[test]
    fn test_validation() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            ConstraintMixer::from_bitstrings(empty),
            Err(QaoaError::EmptyStates)
        ));
        assert!(matches!(
            ConstraintMixer::from_bitstrings(["01", "011"]),
            Err(QaoaError::InconsistentLength { .. })
        ));
        assert!(matches!(
            ConstraintMixer::from_bitstrings(["0z"]),
            Err(QaoaError::InvalidBitstring { .. })
        ));
    }

    #[test]
    fn test_sparse_matches_dense() {
        let mixer = ConstraintMixer::from_bitstrings(["000", "101", "110", "011"])
            .unwrap()
            .with_weight(0.75);
        assert!(!mixer.is_sparse());
        let dense = mixer.operator().unwrap().to_matrix().unwrap();
        let sparse = mixer.clone().with_sparse(true).operator().unwrap();
        assert!(matches!(sparse, Operator::Pauli(_)));
        let sparse = sparse.to_matrix().unwrap();
        for (a, b) in dense.iter().zip(sparse.iter()) {
            assert!((a - b).norm() < 1e-10);
        }
    }

    #[test]
    fn test_wide_states_default_to_pauli_sum() {
        let narrow = ConstraintMixer::from_bitstrings(["0".repeat(12), "1".repeat(12)]).unwrap();
        assert!(!narrow.is_sparse());

        let wide = ConstraintMixer::from_bitstrings(["0".repeat(13), "1".repeat(13)]).unwrap();
        assert!(wide.is_sparse());
        assert!(matches!(wide.operator().unwrap(), Operator::Pauli(_)));
    }

    #[test]
    fn test_single_state_gives_trivial_mixer() {
        let mixer = ConstraintMixer::from_bitstrings(["10"]).unwrap();
        let op = mixer.operator().unwrap();
        assert!(op.is_identity());
    }
}
