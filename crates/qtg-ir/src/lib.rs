//! Circuit intermediate representation for QTG-QAOA.
//!
//! The IR uses a DAG (Directed Acyclic Graph) internally; the high-level
//! [`Circuit`] API is a builder over it. Beyond the usual standard gates it
//! carries the primitives the tree generator needs as single operations:
//! multi-controlled gates, the v-chain multi-controlled X, an integer
//! [`ComparatorGate`] and dense [`EvolutionGate`]s. The compile crate lowers
//! comparators and v-chain gates to X, CX, CCX and MCX.
//!
//! # Example: a parameterised layer
//!
//! ```rust
//! use qtg_ir::{Circuit, ParameterExpression, QubitId};
//!
//! let mut circuit = Circuit::with_size("layer", 2, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.rzz(ParameterExpression::symbol("γ[0]").scaled(2.0), QubitId(0), QubitId(1)).unwrap();
//! circuit.rx(ParameterExpression::symbol("β[0]").scaled(2.0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.parameters(), vec!["β[0]", "γ[0]"]);
//! let bound = circuit.bind_values(&[0.1, 0.2]).unwrap();
//! assert!(!bound.is_parameterized());
//! ```

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod inverse;
pub mod parameter;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::{ComparatorGate, CustomGate, EvolutionGate, Gate, GateKind, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use inverse::{inverse_gate, inverse_instruction, is_self_inverse};
pub use parameter::{BinaryOp, ParameterExpression};
pub use qubit::{Bit, Clbit, ClbitId, Qubit, QubitId, RegisterSlot};
