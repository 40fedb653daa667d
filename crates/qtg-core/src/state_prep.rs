//! Amplitude loading of a distribution over bitstrings.
//!
//! Given weights `pₓ` over `n`-bit strings the prepared state is
//! `Σₓ √pₓ |x⟩` with real, non-negative amplitudes. Two constructions are
//! available:
//!
//! - [`StatePreparation::build`]: a binary tree of multi-controlled `Ry`
//!   rotations, one per non-empty prefix.
//! - [`StatePreparation::build_isometry`]: uniformly controlled `Ry`
//!   rotations expanded into `Ry`/`CX` ladders along a Gray code, using no
//!   gate wider than two qubits.
//!
//! Character `i` of a bitstring is qubit `i`.

use std::collections::BTreeMap;

use tracing::debug;

use qtg_ir::{Circuit, QubitId};

use crate::error::{CoreError, CoreResult};

/// Widest state that can be loaded.
pub const MAX_STATE_QUBITS: usize = 24;

const ANGLE_EPS: f64 = 1e-12;

/// A validated, normalised distribution ready for loading.
#[derive(Debug, Clone, PartialEq)]
pub struct StatePreparation {
    num_qubits: usize,
    probabilities: BTreeMap<String, f64>,
}

impl StatePreparation {
    /// Create from `(bitstring, weight)` pairs.
    ///
    /// Weights must be finite and non-negative with a positive total; they
    /// are renormalised. Repeated bitstrings accumulate.
    pub fn new<I, S>(states: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut probabilities: BTreeMap<String, f64> = BTreeMap::new();
        let mut num_qubits = None;
        for (bits, weight) in states {
            let bits = bits.as_ref();
            validate_bitstring(bits, &mut num_qubits)?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(CoreError::InvalidProbability {
                    bitstring: bits.to_string(),
                    weight,
                });
            }
            *probabilities.entry(bits.to_string()).or_default() += weight;
        }
        let num_qubits = num_qubits.ok_or(CoreError::EmptyDistribution)?;
        if num_qubits > MAX_STATE_QUBITS {
            return Err(CoreError::TooManyQubits {
                num_qubits,
                max: MAX_STATE_QUBITS,
            });
        }

        let total: f64 = probabilities.values().sum();
        if total <= 0.0 {
            return Err(CoreError::ZeroTotalWeight);
        }
        for p in probabilities.values_mut() {
            *p /= total;
        }
        Ok(Self {
            num_qubits,
            probabilities,
        })
    }

    /// Uniform distribution over the given bitstrings.
    pub fn from_bitstrings<I, S>(states: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pairs: Vec<(String, f64)> = states
            .into_iter()
            .map(|s| (s.as_ref().to_string(), 1.0))
            .collect();
        Self::new(pairs)
    }

    /// Number of qubits `n`.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Normalised probabilities, keyed by bitstring.
    pub fn probabilities(&self) -> &BTreeMap<String, f64> {
        &self.probabilities
    }

    /// Dense amplitude vector of length `2ⁿ`, indexed by `Σ bitᵢ·2ⁱ`.
    pub fn amplitudes(&self) -> Vec<f64> {
        self.dense_probabilities()
            .into_iter()
            .map(f64::sqrt)
            .collect()
    }

    fn dense_probabilities(&self) -> Vec<f64> {
        let mut dense = vec![0.0; 1usize << self.num_qubits];
        for (bits, p) in &self.probabilities {
            dense[basis_index(bits)] += p;
        }
        dense
    }

    /// `masses[k][p]`: total probability of strings whose first `k` bits
    /// read `p` (bit `j` of `p` = qubit `j`).
    fn prefix_masses(&self) -> Vec<Vec<f64>> {
        let n = self.num_qubits;
        let mut masses = vec![Vec::new(); n + 1];
        masses[n] = self.dense_probabilities();
        for k in (0..n).rev() {
            let half = 1usize << k;
            let next = &masses[k + 1];
            masses[k] = (0..half).map(|p| next[p] + next[p + half]).collect();
        }
        masses
    }

    /// Rotation angle sending prefix `p` of qubits `0..k` to the split of
    /// qubit `k`.
    fn split_angle(masses: &[Vec<f64>], k: usize, p: usize) -> f64 {
        let total = masses[k][p];
        if total <= 0.0 {
            return 0.0;
        }
        let zero = masses[k + 1][p];
        2.0 * (zero / total).clamp(0.0, 1.0).sqrt().acos()
    }

    /// Binary-tree loading with multi-controlled `Ry` rotations.
    pub fn build(&self) -> CoreResult<Circuit> {
        let n = self.num_qubits;
        let mut circuit = Circuit::new("state_prep");
        let qubits = circuit.add_qreg("q", n as u32);
        let masses = self.prefix_masses();

        for k in 0..n {
            let target = qubits[k];
            let controls = &qubits[..k];
            for p in 0..(1usize << k) {
                if masses[k][p] <= 0.0 {
                    continue;
                }
                let theta = Self::split_angle(&masses, k, p);
                if theta.abs() < ANGLE_EPS {
                    continue;
                }
                if k == 0 {
                    circuit.ry(theta, target)?;
                    continue;
                }
                let zeros: Vec<QubitId> = controls
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| (p >> j) & 1 == 0)
                    .map(|(_, q)| *q)
                    .collect();
                for &q in &zeros {
                    circuit.x(q)?;
                }
                circuit
                    .ry(theta / 2.0, target)?
                    .mcx(controls, target)?
                    .ry(-theta / 2.0, target)?
                    .mcx(controls, target)?;
                for &q in &zeros {
                    circuit.x(q)?;
                }
            }
        }
        debug!(
            qubits = n,
            ops = circuit.num_ops(),
            support = self.probabilities.len(),
            "built tree state preparation"
        );
        Ok(circuit)
    }

    /// Loading in the `{Ry, CX}` basis.
    ///
    /// Qubit `k` receives a rotation uniformly controlled on qubits `0..k`,
    /// decomposed into `2ᵏ` single rotations interleaved with CNOTs whose
    /// controls follow the Gray code.
    pub fn build_isometry(&self) -> CoreResult<Circuit> {
        let n = self.num_qubits;
        let mut circuit = Circuit::new("state_prep_isometry");
        let qubits = circuit.add_qreg("q", n as u32);
        let masses = self.prefix_masses();

        for k in 0..n {
            let target = qubits[k];
            let size = 1usize << k;
            let alphas: Vec<f64> = (0..size)
                .map(|p| Self::split_angle(&masses, k, p))
                .collect();
            let thetas = uniform_rotation_angles(&alphas);
            for (i, theta) in thetas.iter().enumerate() {
                if theta.abs() >= ANGLE_EPS {
                    circuit.ry(*theta, target)?;
                }
                if size > 1 {
                    let flip = gray(i) ^ gray((i + 1) % size);
                    let control = flip.trailing_zeros() as usize;
                    circuit.cx(qubits[control], target)?;
                }
            }
        }
        debug!(
            qubits = n,
            ops = circuit.num_ops(),
            "built isometry state preparation"
        );
        Ok(circuit)
    }
}

fn validate_bitstring(bits: &str, expected: &mut Option<usize>) -> CoreResult<()> {
    if let Some(character) = bits.chars().find(|c| *c != '0' && *c != '1') {
        return Err(CoreError::InvalidCharacter {
            bitstring: bits.to_string(),
            character,
        });
    }
    let len = bits.len();
    match *expected {
        None if len == 0 => Err(CoreError::InconsistentLength {
            bitstring: bits.to_string(),
            expected: 1,
            got: 0,
        }),
        None => {
            *expected = Some(len);
            Ok(())
        }
        Some(n) if n != len => Err(CoreError::InconsistentLength {
            bitstring: bits.to_string(),
            expected: n,
            got: len,
        }),
        Some(_) => Ok(()),
    }
}

/// Basis index of a validated bitstring, character `i` = bit `i`.
pub(crate) fn basis_index(bits: &str) -> usize {
    bits.bytes()
        .enumerate()
        .filter(|(_, b)| *b == b'1')
        .fold(0, |acc, (i, _)| acc | (1 << i))
}

fn gray(i: usize) -> usize {
    i ^ (i >> 1)
}

/// Angles of the single rotations in a Gray-code uniformly controlled `Ry`.
fn uniform_rotation_angles(alphas: &[f64]) -> Vec<f64> {
    let size = alphas.len();
    (0..size)
        .map(|i| {
            let g = gray(i);
            let sum: f64 = alphas
                .iter()
                .enumerate()
                .map(|(j, a)| {
                    if (j & g).count_ones() % 2 == 0 { *a } else { -*a }
                })
                .sum();
            sum / size as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtg_adapter_sim::Statevector;

    fn assert_prepares(prep: &StatePreparation, circuit: &Circuit) {
        let sv = Statevector::from_circuit(circuit).unwrap();
        let expected = prep.amplitudes();
        for (i, (a, e)) in sv.amplitudes().iter().zip(&expected).enumerate() {
            assert!((a.re - e).abs() < 1e-9, "amplitude {i}: {a} vs {e}");
            assert!(a.im.abs() < 1e-9, "amplitude {i} has phase");
        }
    }

    #[test]
    fn test_validation() {
        let empty: Vec<(&str, f64)> = vec![];
        assert!(matches!(
            StatePreparation::new(empty),
            Err(CoreError::EmptyDistribution)
        ));
        assert!(matches!(
            StatePreparation::from_bitstrings(["01", "1"]),
            Err(CoreError::InconsistentLength { .. })
        ));
        assert!(matches!(
            StatePreparation::from_bitstrings(["0a"]),
            Err(CoreError::InvalidCharacter { character: 'a', .. })
        ));
        assert!(matches!(
            StatePreparation::new([("01", 0.0), ("10", 0.0)]),
            Err(CoreError::ZeroTotalWeight)
        ));
        assert!(matches!(
            StatePreparation::new([("01", -1.0)]),
            Err(CoreError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn test_normalisation() {
        let prep = StatePreparation::new([("00", 1.0), ("11", 3.0)]).unwrap();
        assert!((prep.probabilities()["00"] - 0.25).abs() < 1e-12);
        assert!((prep.probabilities()["11"] - 0.75).abs() < 1e-12);
        let amps = prep.amplitudes();
        assert!((amps[0] - 0.5).abs() < 1e-12);
        assert!((amps[3] - 0.75f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_bitstring_order() {
        // "10": qubit 0 set → index 1
        let prep = StatePreparation::from_bitstrings(["10"]).unwrap();
        assert!((prep.amplitudes()[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_qubit() {
        let prep = StatePreparation::new([("0", 1.0), ("1", 1.0)]).unwrap();
        let circuit = prep.build().unwrap();
        assert_eq!(circuit.num_ops(), 1);
        assert_prepares(&prep, &circuit);
        assert_prepares(&prep, &prep.build_isometry().unwrap());
    }

    #[test]
    fn test_two_qubit_basis() {
        for states in [
            vec!["00", "01", "10"],
            vec!["11"],
            vec!["01", "10"],
            vec!["00", "01", "10", "11"],
        ] {
            let prep = StatePreparation::from_bitstrings(&states).unwrap();
            assert_prepares(&prep, &prep.build().unwrap());
            assert_prepares(&prep, &prep.build_isometry().unwrap());
        }
    }

    #[test]
    fn test_weighted_three_qubits() {
        let prep = StatePreparation::new([
            ("000", 0.1),
            ("100", 0.3),
            ("011", 0.2),
            ("111", 0.4),
        ])
        .unwrap();
        assert_prepares(&prep, &prep.build().unwrap());
        assert_prepares(&prep, &prep.build_isometry().unwrap());
    }

    #[test]
    fn test_isometry_gate_set() {
        let prep = StatePreparation::from_bitstrings(["0001", "1010", "0110", "1111"]).unwrap();
        let circuit = prep.build_isometry().unwrap();
        for name in circuit.count_ops().keys() {
            assert!(name == "ry" || name == "cx", "unexpected gate {name}");
        }
        assert_prepares(&prep, &circuit);
    }
}
