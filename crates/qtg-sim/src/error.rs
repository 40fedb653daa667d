//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced by operator construction, conversion and synthesis.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A Pauli string references a qubit index that is out of range.
    #[error("Pauli string references qubit {qubit} but the operator only has {n_qubits} qubits")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: u32,
        /// Number of qubits available.
        n_qubits: u32,
    },

    /// Operator width does not match the qubits it is applied to.
    #[error("Operator acts on {expected} qubits but {got} were supplied")]
    WidthMismatch {
        /// Width of the operator.
        expected: usize,
        /// Number of qubits supplied.
        got: usize,
    },

    /// Matrix is not square with a power-of-two dimension.
    #[error("Matrix of shape {rows}x{cols} is not a square 2^n x 2^n operator")]
    InvalidDimension {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Matrix is not Hermitian.
    #[error("Matrix is not Hermitian (max deviation {0:.3e})")]
    NotHermitian(f64),

    /// Dense representation requested for too many qubits.
    #[error("Dense operator on {num_qubits} qubits exceeds the limit of {max}")]
    TooLarge {
        /// Requested width.
        num_qubits: u32,
        /// Largest supported width.
        max: u32,
    },

    /// `extend` was asked to shrink an operator.
    #[error("Cannot extend a {from}-qubit operator to {to} qubits")]
    CannotShrink {
        /// Current width.
        from: u32,
        /// Requested width.
        to: u32,
    },

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qtg_ir::IrError),
}

/// Result type for operator operations.
pub type SimResult<T> = Result<T, SimError>;
