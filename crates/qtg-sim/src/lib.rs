//! `qtg-sim`: Hermitian operators and time-evolution synthesis.
//!
//! Cost functions and mixers are [`Operator`]s: either a weighted Pauli sum
//! ([`Hamiltonian`]) or a dense Hermitian matrix ([`MatrixOperator`]). This
//! crate converts between the two, detects operators that are a multiple of
//! the identity, pads operators with identity on extra qubits and appends
//! `exp(-i t O)` to an `qtg_ir::Circuit` with a symbolic time.
//!
//! # Quick start
//!
//! ```rust
//! use qtg_ir::{Circuit, ParameterExpression, QubitId};
//! use qtg_sim::hamiltonian::{Hamiltonian, HamiltonianTerm};
//! use qtg_sim::{Operator, synthesis::append_evolution};
//!
//! // H = -Z₀Z₁ + 0.5·Z₀
//! let cost = Operator::Pauli(Hamiltonian::from_terms(vec![
//!     HamiltonianTerm::zz(0, 1, -1.0),
//!     HamiltonianTerm::z(0, 0.5),
//! ]));
//!
//! let mut circuit = Circuit::with_size("layer", 2, 0);
//! let qubits = [QubitId(0), QubitId(1)];
//! append_evolution(&mut circuit, &cost, ParameterExpression::symbol("γ[0]"), &qubits, "cost")
//!     .unwrap();
//! assert_eq!(circuit.parameters(), vec!["γ[0]".to_string()]);
//! ```

pub mod error;
pub mod expm;
pub mod hamiltonian;
pub mod matrix;
pub mod operator;
pub mod synthesis;

pub use error::{SimError, SimResult};
pub use expm::{evolution_unitary, expm};
pub use hamiltonian::{Hamiltonian, HamiltonianTerm, PauliOp, PauliString};
pub use matrix::{MAX_DENSE_QUBITS, MatrixOperator};
pub use operator::{Operator, pauli_to_dense, transition_terms};
