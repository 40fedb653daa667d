//! Error types for QTG construction.

use thiserror::Error;

/// Errors raised while validating inputs or building circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// No items were supplied.
    #[error("Weight vector is empty")]
    EmptyWeights,

    /// An item weight is negative.
    #[error("Weight of item {index} is negative ({weight})")]
    NegativeWeight {
        /// Item index.
        index: usize,
        /// The offending weight.
        weight: f64,
    },

    /// An item weight is not an integer.
    #[error("Weight of item {index} is not an integer ({weight})")]
    NonIntegralWeight {
        /// Item index.
        index: usize,
        /// The offending weight.
        weight: f64,
    },

    /// Capacity is negative or not an integer.
    #[error("Invalid capacity: {0}")]
    InvalidCapacity(f64),

    /// Bias bit vector and item count disagree.
    #[error("Bias vector has {got} bits but there are {expected} items")]
    BiasLengthMismatch {
        /// Number of items.
        expected: usize,
        /// Length of the bias vector.
        got: usize,
    },

    /// Bias strength is negative or not finite.
    #[error("Bias strength must be finite and non-negative, got {0}")]
    InvalidBiasStrength(f64),

    /// Register width and ancilla counts do not fit together.
    #[error("Invalid register layout: {0}")]
    InvalidLayout(String),

    /// Feasible-state input is empty.
    #[error("Feasible-state distribution is empty")]
    EmptyDistribution,

    /// Bitstrings of different lengths were supplied.
    #[error("Bitstring '{bitstring}' has length {got}, expected {expected}")]
    InconsistentLength {
        /// The offending bitstring.
        bitstring: String,
        /// Length of the first bitstring.
        expected: usize,
        /// Length of this bitstring.
        got: usize,
    },

    /// A bitstring contains something other than `0` or `1`.
    #[error("Bitstring '{bitstring}' contains invalid character '{character}'")]
    InvalidCharacter {
        /// The offending bitstring.
        bitstring: String,
        /// The first invalid character.
        character: char,
    },

    /// A distribution weight is negative or not finite.
    #[error("Weight {weight} for bitstring '{bitstring}' is not a finite non-negative number")]
    InvalidProbability {
        /// The offending bitstring.
        bitstring: String,
        /// Its weight.
        weight: f64,
    },

    /// All distribution weights are zero.
    #[error("Distribution weights sum to zero")]
    ZeroTotalWeight,

    /// The state is too wide to load.
    #[error("Cannot load a {num_qubits}-qubit state (limit {max})")]
    TooManyQubits {
        /// Requested width.
        num_qubits: usize,
        /// Largest supported width.
        max: usize,
    },

    /// Circuit IR error.
    #[error("IR error: {0}")]
    Ir(#[from] qtg_ir::IrError),

    /// Lowering error.
    #[error("Compilation error: {0}")]
    Compile(#[from] qtg_compile::CompileError),
}

/// Result type for QTG construction.
pub type CoreResult<T> = Result<T, CoreError>;
