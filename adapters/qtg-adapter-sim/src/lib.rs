//! QTG Local Statevector Simulator
//!
//! This crate provides the reference [`Oracle`](qtg_hal::Oracle): an exact
//! statevector simulator that evaluates expectation values and samples
//! measurement outcomes for every gate of `qtg-ir`, including the composite
//! comparator, multi-controlled and dense evolution gates.
//!
//! # Features
//!
//! - **Exact expectation values**: Pauli strings by bit masks, dense matrices by direct product
//! - **Shot-based estimation**: optional, per Pauli term in its rotated basis
//! - **Measurement sampling**: over the measured classical bits, seedable RNG
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 24 | ~256 MB | Slow |
//!
//! # Example
//!
//! ```rust
//! use qtg_adapter_sim::SimulatorOracle;
//! use qtg_hal::Oracle;
//! use qtg_ir::{Circuit, QubitId};
//!
//! let oracle = SimulatorOracle::new().with_seed(42);
//! let mut circuit = Circuit::with_size("bell", 2, 0);
//! circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let counts = oracle.sample(&circuit, 1000).unwrap();
//! assert_eq!(counts.get("00") + counts.get("11"), 1000);
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, SimulatorConfig, SimulatorOracle};
pub use statevector::Statevector;
