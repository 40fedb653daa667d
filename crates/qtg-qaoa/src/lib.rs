//! `qtg-qaoa`: Constraint-preserving QAOA.
//!
//! The ansatz alternates a cost layer `exp(−iγH_C)` with a mixer that keeps
//! the state inside the feasible subspace:
//!
//! - [`GroverMixer`]: `G · R(β) · G†` around the tree generator `G`;
//! - [`HammingWeightMixer`]: XY rotations between item pairs;
//! - [`ConstraintMixer`]: a Hermitian operator coupling listed bitstrings.
//!
//! [`SubsystemAnsatz`] assembles the layers, [`VariationalLoop`] optimises
//! the angles against an [`Oracle`](qtg_hal::Oracle), and [`QkpSolver`] runs
//! the whole pipeline for a [`KnapsackInstance`](qtg_problem::KnapsackInstance).
//!
//! # Example
//!
//! ```rust
//! use qtg_ir::{Circuit, QubitId};
//! use qtg_qaoa::{ConstraintMixer, SubsystemAnsatz};
//! use qtg_sim::{Hamiltonian, HamiltonianTerm, Operator};
//!
//! let cost = Operator::Pauli(Hamiltonian::from_terms(vec![
//!     HamiltonianTerm::z(0, 1.0),
//!     HamiltonianTerm::z(1, -0.5),
//! ]));
//! let mixer = ConstraintMixer::from_bitstrings(["00", "01", "10"])
//!     .unwrap()
//!     .operator()
//!     .unwrap();
//!
//! let mut init = Circuit::with_size("init", 2, 0);
//! init.x(QubitId(0)).unwrap();
//!
//! let ansatz = SubsystemAnsatz::builder()
//!     .cost(cost)
//!     .initial_state(init)
//!     .mixer(mixer)
//!     .reps(2)
//!     .build()
//!     .unwrap();
//! assert_eq!(ansatz.parameters(), &["γ[0]", "β[0]", "γ[1]", "β[1]"]);
//! ```

pub mod ansatz;
pub mod error;
pub mod mixer;
pub mod optimizer;
pub mod solver;
pub mod variational;

pub use ansatz::{AnsatzBuilder, SubsystemAnsatz};
pub use error::{QaoaError, QaoaResult};
pub use mixer::{
    ConstraintMixer, Connectivity, DENSE_QUBIT_LIMIT, GROVER_PARAMETER, GroverMixer,
    HAMMING_PARAMETER, HammingWeightMixer, Mixer,
};
pub use optimizer::{NelderMead, OptimizationResult, Optimizer};
pub use solver::{InstanceKind, QkpSolver, SolveReport, SolverConfig, sample_feasible_states};
pub use variational::{LoopOutcome, VariationalLoop};
