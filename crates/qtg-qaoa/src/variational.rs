//! The classical outer loop.

use tracing::{info, instrument, trace};

use qtg_hal::Oracle;

use crate::ansatz::SubsystemAnsatz;
use crate::error::{QaoaError, QaoaResult};
use crate::optimizer::Optimizer;

/// Outcome of a converged run.
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    /// Best parameter vector, in the ansatz's canonical order.
    pub params: Vec<f64>,
    /// Cost expectation at `params`.
    pub value: f64,
    /// Number of oracle evaluations.
    pub evaluations: usize,
    /// Number of optimiser iterations.
    pub iterations: usize,
    /// Every objective value in evaluation order, if recording was enabled.
    pub history: Vec<f64>,
}

/// Minimises `⟨ψ(θ)|H_C|ψ(θ)⟩` over the ansatz parameters.
///
/// Each evaluation binds a parameter vector, which leaves the ansatz itself
/// untouched, and asks the oracle for the cost expectation.
pub struct VariationalLoop<'a, O: Oracle, M: Optimizer> {
    ansatz: &'a SubsystemAnsatz,
    oracle: &'a O,
    optimizer: M,
    record_history: bool,
}

impl<'a, O: Oracle, M: Optimizer> VariationalLoop<'a, O, M> {
    /// Create a loop over `ansatz` evaluated by `oracle`.
    pub fn new(ansatz: &'a SubsystemAnsatz, oracle: &'a O, optimizer: M) -> Self {
        Self {
            ansatz,
            oracle,
            optimizer,
            record_history: false,
        }
    }

    /// Record every objective value.
    #[must_use]
    pub fn with_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    /// Cost expectation for one parameter vector.
    pub fn evaluate(&self, params: &[f64]) -> QaoaResult<f64> {
        let bound = self.ansatz.bind(params)?;
        Ok(self.oracle.evaluate(&bound, self.ansatz.cost())?)
    }

    /// Run the optimiser from `initial`.
    ///
    /// Fails with [`QaoaError::OptimizerFailed`] if the optimiser stops
    /// without converging.
    #[instrument(skip_all, fields(oracle = self.oracle.name(), parameters = initial.len()))]
    pub fn run(&self, initial: Vec<f64>) -> QaoaResult<LoopOutcome> {
        let expected = self.ansatz.num_parameters();
        if initial.len() != expected {
            return Err(QaoaError::ParameterCountMismatch {
                expected,
                got: initial.len(),
            });
        }

        let mut history = Vec::new();
        let result = self.optimizer.minimize(
            |params| {
                let value = self.evaluate(params)?;
                trace!(?params, value, "evaluated");
                if self.record_history {
                    history.push(value);
                }
                Ok(value)
            },
            initial,
        )?;

        if !result.converged {
            return Err(QaoaError::OptimizerFailed(result.message));
        }
        info!(
            value = result.optimal_value,
            evaluations = result.num_evaluations,
            iterations = result.num_iterations,
            "variational loop converged"
        );
        Ok(LoopOutcome {
            params: result.optimal_params,
            value: result.optimal_value,
            evaluations: result.num_evaluations,
            iterations: result.num_iterations,
            history,
        })
    }
}
