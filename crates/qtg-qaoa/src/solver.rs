//! End-to-end quadratic knapsack solver.
//!
//! 1. Greedy deletion gives a guide bitstring `y`.
//! 2. The tree generator, biased towards `y`, prepares the feasible
//!    superposition used as the initial state.
//! 3. The cost Hamiltonian is padded to the generator's width and mixed with
//!    the Grover tree mixer (standard instances) or the Hamming-weight mixer
//!    (densest-subgraph instances).
//! 4. The variational loop optimises the angles; the optimised circuit is
//!    sampled on the item qubits and the most frequent bitstring wins.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use qtg_core::{BiasAnsatz, QuantumTreeGenerator};
use qtg_hal::{Counts, Oracle};
use qtg_ir::Circuit;
use qtg_problem::{
    KnapsackInstance, SolutionSummary, cost_hamiltonian, greedy_deletion, selection_string,
};
use qtg_sim::Operator;

use crate::ansatz::SubsystemAnsatz;
use crate::error::{QaoaError, QaoaResult};
use crate::mixer::{GroverMixer, HammingWeightMixer, Mixer};
use crate::optimizer::NelderMead;
use crate::variational::VariationalLoop;

/// Which mixer family the instance calls for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceKind {
    /// General knapsack constraint: Grover tree mixer.
    #[default]
    Standard,
    /// Fixed-cardinality instances: Hamming-weight mixer.
    Densest,
}

impl std::str::FromStr for InstanceKind {
    type Err = QaoaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "densest" => Ok(Self::Densest),
            other => Err(QaoaError::InvalidConfig(format!(
                "unknown instance kind '{other}'"
            ))),
        }
    }
}

/// Solver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// QAOA repetitions.
    pub reps: usize,
    /// Shots for the final measurement.
    pub shots: u32,
    /// Shots per cost estimate during optimisation; `None` asks the oracle
    /// for exact expectation values.
    pub estimator_shots: Option<u32>,
    /// Optimiser tolerance.
    pub tol: f64,
    /// Optimiser iteration cap.
    pub maxiter: usize,
    /// Bias per item; the tree uses strength `n · bias`, and 0 disables it.
    pub bias: f64,
    /// Mixer family.
    pub kind: InstanceKind,
    /// Seed for a seedable oracle, if the caller builds one.
    ///
    /// Like `estimator_shots`, this is read by whoever constructs the oracle
    /// passed to [`QkpSolver::solve`].
    pub seed: Option<u64>,
    /// Keep the cost trajectory.
    pub record_history: bool,
    /// Starting cost angle for every repetition.
    pub initial_gamma: f64,
    /// Starting mixer angle for every repetition.
    pub initial_beta: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            reps: 3,
            shots: 100,
            estimator_shots: None,
            tol: 1e-5,
            maxiter: 2000,
            bias: 0.5,
            kind: InstanceKind::Standard,
            seed: None,
            record_history: false,
            initial_gamma: PI,
            initial_beta: PI / 2.0,
        }
    }
}

impl SolverConfig {
    /// Reject values no solve can use.
    pub fn validate(&self) -> QaoaResult<()> {
        if self.reps == 0 {
            return Err(QaoaError::InvalidReps);
        }
        if self.shots == 0 {
            return Err(QaoaError::InvalidConfig("shots must be positive".into()));
        }
        if self.estimator_shots == Some(0) {
            return Err(QaoaError::InvalidConfig(
                "estimator shots must be positive".into(),
            ));
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(QaoaError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tol
            )));
        }
        if !(self.bias.is_finite() && self.bias >= 0.0) {
            return Err(QaoaError::InvalidConfig(format!(
                "bias must be non-negative, got {}",
                self.bias
            )));
        }
        if !(self.initial_gamma.is_finite() && self.initial_beta.is_finite()) {
            return Err(QaoaError::InvalidConfig(
                "initial angles must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// Result of [`QkpSolver::solve`].
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// Most frequently measured selection.
    pub best: String,
    /// Profit of `best`.
    pub best_value: i64,
    /// Greedy-deletion selection.
    pub greedy: String,
    /// Profit of `greedy`.
    pub greedy_value: i64,
    /// Optimised angles in canonical order.
    pub params: Vec<f64>,
    /// Cost expectation at `params`.
    pub energy: f64,
    /// Cost trajectory, empty unless recording was enabled.
    pub history: Vec<f64>,
    /// Measured item distribution of the optimised circuit.
    pub counts: Counts,
}

impl SolveReport {
    /// The text block appended to instance files.
    pub fn summary(&self) -> SolutionSummary {
        SolutionSummary {
            best_value: self.best_value,
            best: self.best.clone(),
            greedy_value: self.greedy_value,
            greedy: self.greedy.clone(),
        }
    }
}

/// QTG-QAOA solver for one instance.
#[derive(Debug, Clone)]
pub struct QkpSolver {
    instance: KnapsackInstance,
    config: SolverConfig,
}

impl QkpSolver {
    /// Create a solver.
    pub fn new(instance: KnapsackInstance, config: SolverConfig) -> Self {
        Self { instance, config }
    }

    /// The instance being solved.
    pub fn instance(&self) -> &KnapsackInstance {
        &self.instance
    }

    /// The active settings.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Greedy guide, biased tree generator and its initial-state circuit.
    #[allow(clippy::cast_precision_loss)]
    pub fn tree_generator(&self, greedy: &[bool]) -> QaoaResult<QuantumTreeGenerator> {
        let n = self.instance.num_items();
        let bias = if self.config.bias == 0.0 {
            BiasAnsatz::unbiased(n)
        } else {
            BiasAnsatz::new(greedy.to_vec(), n as f64 * self.config.bias)?
        };
        Ok(QuantumTreeGenerator::new(self.instance.weights(), self.instance.capacity())?
            .with_bias(bias)?)
    }

    /// Build the ansatz without running anything.
    pub fn ansatz(&self) -> QaoaResult<SubsystemAnsatz> {
        self.config.validate()?;
        let greedy = greedy_deletion(&self.instance);
        let qtg = self.tree_generator(&greedy)?;
        self.ansatz_for(&qtg)
    }

    fn ansatz_for(&self, qtg: &QuantumTreeGenerator) -> QaoaResult<SubsystemAnsatz> {
        let cost = Operator::Pauli(cost_hamiltonian(&self.instance)?);
        let preparation = qtg.build_lowered()?;
        let mixer: Mixer = match self.config.kind {
            InstanceKind::Standard => {
                GroverMixer::from_preparation(preparation.clone(), qtg.item_qubits())?
                    .circuit()?
                    .into()
            }
            InstanceKind::Densest => {
                HammingWeightMixer::new(qtg.num_items(), qtg.num_qubits())?
                    .circuit()?
                    .into()
            }
        };
        SubsystemAnsatz::builder()
            .cost(cost)
            .num_qubits(qtg.num_qubits())
            .initial_state(preparation)
            .mixer(mixer)
            .reps(self.config.reps)
            .name("qaoa_qkp")
            .build()
    }

    /// Starting angles: `[γ₀, β₀]` per repetition, truncated or padded to the
    /// ansatz's actual parameter count.
    fn initial_params(&self, ansatz: &SubsystemAnsatz) -> Vec<f64> {
        let pair = [self.config.initial_gamma, self.config.initial_beta];
        pair.iter()
            .copied()
            .cycle()
            .take(ansatz.num_parameters())
            .collect()
    }

    /// Run the full pipeline against `oracle`.
    #[instrument(skip_all, fields(instance = self.instance.label(), n = self.instance.num_items(), kind = ?self.config.kind))]
    pub fn solve<O: Oracle>(&self, oracle: &O) -> QaoaResult<SolveReport> {
        self.config.validate()?;
        let greedy = greedy_deletion(&self.instance);
        let greedy_value = self.instance.value(&greedy);
        let qtg = self.tree_generator(&greedy)?;
        let ansatz = self.ansatz_for(&qtg)?;

        let optimizer = NelderMead::new()
            .with_maxiter(self.config.maxiter)
            .with_tol(self.config.tol);
        let outcome = VariationalLoop::new(&ansatz, oracle, optimizer)
            .with_history(self.config.record_history)
            .run(self.initial_params(&ansatz))?;

        let mut measured = ansatz.bind(&outcome.params)?;
        measured.measure_qubits(&qtg.item_qubits())?;
        let counts = oracle.sample(&measured, self.config.shots)?;
        let best = counts
            .most_frequent()
            .map(|(bits, _)| bits.clone())
            .ok_or(qtg_hal::HalError::NoCounts)?;
        let best_value = self.instance.value(&self.instance.selection(&best)?);

        info!(
            best = %best,
            best_value,
            greedy_value,
            energy = outcome.value,
            "solve finished"
        );
        Ok(SolveReport {
            best,
            best_value,
            greedy: selection_string(&greedy),
            greedy_value,
            params: outcome.params,
            energy: outcome.value,
            history: outcome.history,
            counts,
        })
    }
}

/// Sample the tree generator's item register.
///
/// The resulting distribution only ever contains feasible selections.
pub fn sample_feasible_states<O: Oracle>(
    oracle: &O,
    qtg: &QuantumTreeGenerator,
    shots: u32,
) -> QaoaResult<Counts> {
    let mut circuit: Circuit = qtg.build()?;
    circuit.measure_qubits(&qtg.item_qubits())?;
    Ok(oracle.sample(&circuit, shots)?)
}
