//! `qtg-core`: The Quantum Tree Generator and feasible-state loading.
//!
//! The [`QuantumTreeGenerator`] prepares a superposition over exactly the
//! item selections that satisfy one knapsack constraint `Σ wᵢxᵢ ≤ C`. It is
//! assembled from three reversible pieces placed on a [`RegisterLayout`]:
//!
//! - [`BiasedRotation`]: a Hadamard-like rotation tilted towards a guide bit;
//! - [`ThresholdComparator`]: `flag ^= [sum < t]`;
//! - [`WeightedAdder`]: `sum += w·q` with carry ancillas.
//!
//! [`StatePreparation`] loads an arbitrary distribution over bitstrings,
//! e.g. one measured from a previous run.
//!
//! # Example
//!
//! ```rust
//! use qtg_core::{BiasAnsatz, QuantumTreeGenerator};
//!
//! let qtg = QuantumTreeGenerator::new(&[1, 2, 3], 2)
//!     .unwrap()
//!     .with_bias(BiasAnsatz::from_bitstring("010", 1.5).unwrap())
//!     .unwrap();
//! assert_eq!(qtg.feasible_states(), vec!["000", "010", "100"]);
//!
//! let circuit = qtg.build_lowered().unwrap();
//! assert_eq!(circuit.num_qubits(), qtg.layout().num_qubits());
//! ```

pub mod adder;
pub mod comparator;
pub mod error;
pub mod generator;
pub mod layout;
pub mod rotation;
pub mod state_prep;

pub use adder::WeightedAdder;
pub use comparator::ThresholdComparator;
pub use error::{CoreError, CoreResult};
pub use generator::QuantumTreeGenerator;
pub use layout::{REGISTERS, RegisterLayout, sum_width};
pub use rotation::{BiasAnsatz, BiasedRotation};
pub use state_prep::{MAX_STATE_QUBITS, StatePreparation};
