//! Error types for mixers, ansätze and the variational loop.

use thiserror::Error;

/// Errors raised while building or optimising a QAOA circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QaoaError {
    /// The ansatz was built without a cost operator.
    #[error("Cost operator must be provided")]
    MissingCostOperator,

    /// A component does not act on the subsystem width.
    #[error("{component} acts on {got} qubits, expected {expected}")]
    QubitCountMismatch {
        component: &'static str,
        expected: usize,
        got: usize,
    },

    /// Zero repetitions were requested.
    #[error("Number of repetitions must be at least 1")]
    InvalidReps,

    /// A parameter vector has the wrong length.
    #[error("Expected {expected} parameters, got {got}")]
    ParameterCountMismatch { expected: usize, got: usize },

    /// No feasible states were supplied.
    #[error("Feasible-state input is empty")]
    EmptyStates,

    /// Bitstrings of different lengths were supplied.
    #[error("Bitstring '{bitstring}' has length {got}, expected {expected}")]
    InconsistentLength {
        bitstring: String,
        expected: usize,
        got: usize,
    },

    /// A bitstring contains something other than `0` or `1`.
    #[error("Invalid bitstring '{bitstring}'")]
    InvalidBitstring { bitstring: String },

    /// More item qubits than circuit qubits.
    #[error("{n_items} item qubits do not fit in {total_qubits} qubits")]
    TooManyItems { n_items: usize, total_qubits: usize },

    /// An invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The minimiser did not converge.
    #[error("Optimization failed: {0}")]
    OptimizerFailed(String),

    /// Tree generator error.
    #[error("QTG error: {0}")]
    Core(#[from] qtg_core::CoreError),

    /// Operator error.
    #[error("Operator error: {0}")]
    Operator(#[from] qtg_sim::SimError),

    /// Oracle error.
    #[error("Oracle error: {0}")]
    Oracle(#[from] qtg_hal::HalError),

    /// Circuit IR error.
    #[error("IR error: {0}")]
    Ir(#[from] qtg_ir::IrError),

    /// Instance error.
    #[error("Instance error: {0}")]
    Problem(#[from] qtg_problem::ProblemError),
}

/// Result type for QAOA operations.
pub type QaoaResult<T> = Result<T, QaoaError>;
