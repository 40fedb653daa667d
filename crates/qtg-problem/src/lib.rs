//! `qtg-problem`: Quadratic knapsack instances.
//!
//! - [`KnapsackInstance`]: the instance data and its text file format
//! - [`greedy_deletion`]: classical heuristic used as the bias guide
//! - [`cost_hamiltonian`]: diagonal Ising form of the negated objective
//! - [`SolutionSummary`]: results appended to the instance file
//!
//! # Example
//!
//! ```rust
//! use qtg_problem::{KnapsackInstance, cost_hamiltonian, greedy_deletion};
//!
//! let text = "demo\n3\n1 2 3\n4 5\n6\n\n1\n4\n2 3 1\n";
//! let instance: KnapsackInstance = text.parse().unwrap();
//!
//! let greedy = greedy_deletion(&instance);
//! assert!(instance.is_feasible(&greedy));
//!
//! let cost = cost_hamiltonian(&instance).unwrap();
//! assert_eq!(cost.num_qubits(), 3);
//! ```

pub mod cost;
pub mod error;
pub mod greedy;
pub mod instance;
pub mod summary;

pub use cost::cost_hamiltonian;
pub use error::{ProblemError, ProblemResult};
pub use greedy::greedy_deletion;
pub use instance::{KnapsackInstance, parse_selection, selection_string};
pub use summary::SolutionSummary;
