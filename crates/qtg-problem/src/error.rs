//! Error types for knapsack instances.

use thiserror::Error;

/// Errors that can occur while reading or using an instance.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProblemError {
    /// I/O error reading or appending to an instance file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file ended before a required line.
    #[error("Unexpected end of instance at line {line}: expected {expected}")]
    UnexpectedEof { line: usize, expected: String },

    /// A line could not be parsed.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A numeric line has the wrong number of entries.
    #[error("Line {line} has {got} values, expected {expected}")]
    WrongCount {
        line: usize,
        expected: usize,
        got: usize,
    },

    /// The instance data is inconsistent.
    #[error("Invalid instance: {0}")]
    InvalidInstance(String),

    /// A selection has the wrong number of items.
    #[error("Selection has {got} items, instance has {expected}")]
    SelectionLength { expected: usize, got: usize },

    /// A selection bitstring contains something other than `0` or `1`.
    #[error("Invalid character '{character}' in selection '{bitstring}'")]
    InvalidCharacter { bitstring: String, character: char },

    /// Operator construction failed.
    #[error("Operator error: {0}")]
    Operator(#[from] qtg_sim::SimError),
}

/// Result type for instance operations.
pub type ProblemResult<T> = Result<T, ProblemError>;
