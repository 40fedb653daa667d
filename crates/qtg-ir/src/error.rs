//! Errors raised while building or rewriting circuits.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    #[error("qubit {qubit} is not part of the circuit{}", context(.gate_name))]
    QubitNotFound {
        qubit: QubitId,
        gate_name: Option<String>,
    },

    #[error("classical bit {clbit} is not part of the circuit{}", context(.gate_name))]
    ClbitNotFound {
        clbit: ClbitId,
        gate_name: Option<String>,
    },

    #[error("malformed circuit graph: {0}")]
    InvalidDag(String),

    /// A gate was given the wrong number of operands.
    #[error("{gate_name} acts on {expected} qubits but was given {got}")]
    QubitCountMismatch {
        gate_name: String,
        expected: u32,
        got: u32,
    },

    #[error("parameter '{0}' has no value")]
    UnboundParameter(String),

    /// Positional binding received the wrong number of values.
    #[error("circuit has {expected} free parameters, {got} values supplied")]
    ParameterCountMismatch { expected: usize, got: usize },

    #[error("qubit {qubit} appears twice{}", context(.gate_name))]
    DuplicateQubit {
        qubit: QubitId,
        gate_name: Option<String>,
    },

    /// Measurement and reset have no unitary inverse.
    #[error("'{0}' cannot be inverted")]
    NotInvertible(String),

    #[error("a {other}-qubit circuit cannot be placed on {target} wires")]
    ComposeMismatch { other: usize, target: usize },

    #[error("{got} matrix entries do not describe a {num_qubits}-qubit gate")]
    MatrixDimension { num_qubits: u32, got: usize },
}

#[allow(clippy::ref_option)]
fn context(gate_name: &Option<String>) -> String {
    gate_name
        .as_deref()
        .map(|name| format!(" (in {name})"))
        .unwrap_or_default()
}

pub type IrResult<T> = Result<T, IrError>;
