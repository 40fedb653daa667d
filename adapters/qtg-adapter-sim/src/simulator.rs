//! Simulator oracle implementation.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, instrument};

use qtg_hal::{Counts, HalError, HalResult, Oracle};
use qtg_ir::{Circuit, InstructionKind};
use qtg_sim::{Hamiltonian, Operator};

use crate::statevector::{Statevector, sample_cumulative};

/// Default width limit of the simulator.
pub const DEFAULT_MAX_QUBITS: u32 = 24;

/// Simulator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Largest circuit the simulator accepts.
    pub max_qubits: u32,
    /// When set, expectation values are estimated from this many shots per
    /// measured basis instead of computed exactly.
    pub shots: Option<u32>,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            shots: None,
            seed: None,
        }
    }
}

/// Local statevector oracle.
///
/// Expectation values are exact unless the oracle was configured with a
/// shot budget. The RNG sits behind a mutex so the oracle can be shared.
pub struct SimulatorOracle {
    config: SimulatorConfig,
    rng: Mutex<StdRng>,
}

impl SimulatorOracle {
    /// Create an exact simulator with default settings.
    pub fn new() -> Self {
        Self::from_config(SimulatorConfig::default())
    }

    /// Create a simulator from explicit settings.
    pub fn from_config(config: SimulatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    /// Seed the sampling RNG.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        Self::from_config(SimulatorConfig {
            seed: Some(seed),
            ..self.config
        })
    }

    /// Estimate expectation values from `shots` samples.
    #[must_use]
    pub fn with_shots(self, shots: u32) -> Self {
        let mut config = self.config;
        config.shots = Some(shots);
        Self {
            config,
            rng: self.rng,
        }
    }

    /// Limit the accepted circuit width.
    #[must_use]
    pub fn with_max_qubits(self, max_qubits: u32) -> Self {
        let mut config = self.config;
        config.max_qubits = max_qubits;
        Self {
            config,
            rng: self.rng,
        }
    }

    /// The active settings.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Simulate `circuit` and return its final state.
    #[instrument(skip(self, circuit), fields(qubits = circuit.num_qubits(), ops = circuit.num_ops()))]
    pub fn statevector(&self, circuit: &Circuit) -> HalResult<Statevector> {
        if circuit.num_qubits() > self.config.max_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.config.max_qubits
            )));
        }
        let start = Instant::now();
        let sv = Statevector::from_circuit(circuit)?;
        debug!(elapsed = ?start.elapsed(), "Simulation completed");
        Ok(sv)
    }

    fn estimate(&self, sv: &Statevector, observable: &Operator, shots: u32) -> HalResult<f64> {
        if shots == 0 {
            return Err(HalError::NoCounts);
        }
        let hamiltonian = match observable {
            Operator::Pauli(h) => h.clone(),
            Operator::Matrix(_) if observable.is_diagonal() => {
                // Diagonal matrices are sampled directly in the Z basis.
                let cumulative = sv.cumulative();
                let mut rng = self.lock_rng();
                let total: f64 = (0..shots)
                    .map(|_| {
                        let outcome = sample_cumulative(&cumulative, &mut *rng);
                        observable.basis_expectation(outcome as u64)
                    })
                    .sum();
                return Ok(total / f64::from(shots));
            }
            Operator::Matrix(_) => observable.to_pauli()?,
        };
        Ok(self.estimate_pauli(sv, &hamiltonian, shots))
    }

    /// Per-term estimation: each string is measured in its own rotated basis.
    fn estimate_pauli(&self, sv: &Statevector, h: &Hamiltonian, shots: u32) -> f64 {
        let mut rng = self.lock_rng();
        let mut value = 0.0;
        for term in h.terms() {
            if term.pauli.is_identity() {
                value += term.coeff;
                continue;
            }
            let rotated = sv.rotated_to_z(&term.pauli);
            let cumulative = rotated.cumulative();
            let parity_mask = (term.pauli.x_mask() | term.pauli.z_mask()) as usize;
            let sum: f64 = (0..shots)
                .map(|_| {
                    let outcome = sample_cumulative(&cumulative, &mut *rng);
                    if (outcome & parity_mask).count_ones() % 2 == 0 { 1.0 } else { -1.0 }
                })
                .sum();
            value += term.coeff * sum / f64::from(shots);
        }
        value
    }

    fn lock_rng(&self) -> std::sync::MutexGuard<'_, StdRng> {
        self.rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for SimulatorOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Oracle for SimulatorOracle {
    fn name(&self) -> &str {
        "statevector"
    }

    #[instrument(skip_all, fields(observable_qubits = observable.num_qubits()))]
    fn evaluate(&self, circuit: &Circuit, observable: &Operator) -> HalResult<f64> {
        let sv = self.statevector(circuit)?;
        match self.config.shots {
            None => sv.expectation(observable),
            Some(shots) => {
                if observable.num_qubits() as usize > sv.num_qubits() {
                    return Err(HalError::ObservableMismatch {
                        observable: observable.num_qubits(),
                        circuit: sv.num_qubits(),
                    });
                }
                let observable = observable.extend(sv.num_qubits() as u32)?;
                self.estimate(&sv, &observable, shots)
            }
        }
    }

    #[instrument(skip(self, circuit))]
    fn sample(&self, circuit: &Circuit, shots: u32) -> HalResult<Counts> {
        if shots == 0 {
            return Err(HalError::NoCounts);
        }
        let sv = self.statevector(circuit)?;
        let readout = Readout::from_circuit(circuit);
        let cumulative = sv.cumulative();

        let mut counts = Counts::new();
        let mut rng = self.lock_rng();
        for _ in 0..shots {
            let outcome = sample_cumulative(&cumulative, &mut *rng);
            counts.insert(readout.bitstring(outcome), 1);
        }
        debug!(shots, distinct = counts.len(), "Sampling completed");
        if counts.is_empty() {
            return Err(HalError::NoCounts);
        }
        Ok(counts)
    }

    fn max_qubits(&self) -> Option<u32> {
        Some(self.config.max_qubits)
    }
}

/// Mapping from classical bits to the qubits measured into them.
struct Readout {
    /// `sources[k]` is the qubit read into classical bit `k`.
    sources: Vec<usize>,
}

impl Readout {
    /// Measured bits when the circuit measures anything, otherwise every qubit.
    fn from_circuit(circuit: &Circuit) -> Self {
        let mut measured: FxHashMap<usize, usize> = FxHashMap::default();
        for inst in circuit.instructions() {
            if matches!(inst.kind, InstructionKind::Measure) {
                for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                    measured.insert(c.0 as usize, q.index());
                }
            }
        }
        if measured.is_empty() {
            return Self {
                sources: (0..circuit.num_qubits()).collect(),
            };
        }
        let width = measured.keys().max().map_or(0, |k| k + 1);
        // Classical bits that no measurement writes read as 0
        let sources = (0..width)
            .map(|k| measured.get(&k).copied().unwrap_or(usize::MAX))
            .collect();
        Self { sources }
    }

    fn bitstring(&self, outcome: usize) -> String {
        self.sources
            .iter()
            .map(|&q| {
                if q != usize::MAX && (outcome >> q) & 1 == 1 {
                    '1'
                } else {
                    '0'
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtg_ir::QubitId;
    use qtg_sim::HamiltonianTerm;

    #[test]
    fn test_sample_bell_state() {
        let oracle = SimulatorOracle::new().with_seed(11);
        let mut circuit = Circuit::with_size("bell", 2, 0);
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        let counts = oracle.sample(&circuit, 1000).unwrap();
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
    }

    #[test]
    fn test_sample_measured_subset() {
        let oracle = SimulatorOracle::new().with_seed(3);
        let mut circuit = Circuit::with_size("t", 3, 0);
        circuit.x(QubitId(2)).unwrap();
        circuit.measure_qubits(&[QubitId(2), QubitId(0)]).unwrap();
        let counts = oracle.sample(&circuit, 10).unwrap();
        assert_eq!(counts.get("10"), 10);
    }

    #[test]
    fn test_zero_shots_is_no_counts() {
        let oracle = SimulatorOracle::new();
        let circuit = Circuit::with_size("t", 1, 0);
        assert!(matches!(oracle.sample(&circuit, 0), Err(HalError::NoCounts)));
    }

    #[test]
    fn test_too_many_qubits() {
        let oracle = SimulatorOracle::new().with_max_qubits(3);
        let circuit = Circuit::with_size("t", 4, 0);
        assert!(matches!(
            oracle.sample(&circuit, 1),
            Err(HalError::CircuitTooLarge(_))
        ));
    }

    #[test]
    fn test_shot_estimate_close_to_exact() {
        let mut circuit = Circuit::with_size("t", 2, 0);
        circuit.ry(0.9, QubitId(0)).unwrap().h(QubitId(1)).unwrap();
        let h = Operator::Pauli(Hamiltonian::from_terms(vec![
            HamiltonianTerm::z(0, 1.0),
            HamiltonianTerm::x(1, 0.5),
            HamiltonianTerm::identity(0.25),
        ]));
        let exact = SimulatorOracle::new().evaluate(&circuit, &h).unwrap();
        let estimate = SimulatorOracle::new()
            .with_seed(5)
            .with_shots(20_000)
            .evaluate(&circuit, &h)
            .unwrap();
        assert!((exact - (0.9f64.cos() + 0.5 + 0.25)).abs() < 1e-10);
        assert!((exact - estimate).abs() < 0.05);
    }
}
