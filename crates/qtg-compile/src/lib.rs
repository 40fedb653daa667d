//! Pass framework and primitive lowering for QTG-QAOA circuits.
//!
//! Circuits are built with composite primitives (integer comparators and
//! v-chain multi-controlled X gates) so that construction stays readable
//! and simulators can apply them directly. The [`LowerToPrimitives`] pass
//! expands them into X, CX, CCX and MCX gates for anything that needs an
//! explicit gate sequence: the Grover mixer inverts the lowered tree
//! generator, and `inspect` reports depths before and after lowering.
//!
//! # Example
//!
//! ```rust
//! use qtg_compile::{PassManager, PropertySet};
//! use qtg_ir::{Circuit, ComparatorGate, QubitId};
//!
//! let mut circuit = Circuit::with_size("cmp", 3, 0);
//! circuit
//!     .comparator(ComparatorGate::less_than(2, 3), &[QubitId(0), QubitId(1)], QubitId(2))
//!     .unwrap();
//!
//! let mut props = PropertySet::new();
//! PassManager::lowering().run(&mut circuit, &mut props).unwrap();
//! assert!(!props.stats.unwrap().counts.contains_key("cmp"));
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod passes;
pub mod property;
pub mod unitary;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, lower};
pub use pass::{Pass, PassKind};
pub use passes::{CancelInverses, GateCounts, LowerToPrimitives};
pub use property::{CircuitStats, PropertySet};
pub use unitary::{Unitary2x2, controlled_unitary};
