//! Error types for the HAL crate.

use thiserror::Error;

/// Errors that can occur when querying an oracle.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Sampling produced no outcomes.
    #[error("No counts: sampling produced no outcomes")]
    NoCounts,

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Invalid circuit.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Circuit exceeds oracle capabilities.
    #[error("Circuit exceeds oracle capabilities: {0}")]
    CircuitTooLarge(String),

    /// Observable and circuit widths disagree.
    #[error("Observable acts on {observable} qubits but the circuit has {circuit}")]
    ObservableMismatch {
        /// Width of the observable.
        observable: u32,
        /// Width of the circuit.
        circuit: usize,
    },

    /// Unsupported feature.
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Circuit IR error.
    #[error("IR error: {0}")]
    Ir(#[from] qtg_ir::IrError),

    /// Operator error.
    #[error("Operator error: {0}")]
    Operator(#[from] qtg_sim::SimError),

    /// Generic oracle error.
    #[error("Oracle error: {0}")]
    Backend(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
