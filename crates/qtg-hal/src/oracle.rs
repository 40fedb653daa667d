//! The oracle trait.
//!
//! An [`Oracle`] answers two questions about a fully bound circuit:
//!
//! | Method | Returns |
//! |--------|---------|
//! | `evaluate()` | `⟨ψ|O|ψ⟩` for an observable `O` |
//! | `sample()` | measurement [`Counts`] |
//!
//! Calls are blocking and take `&self`; implementations that hold mutable
//! state (an RNG, a connection) guard it internally so the oracle can be
//! shared across threads.

use qtg_ir::Circuit;
use qtg_sim::Operator;

use crate::error::HalResult;
use crate::result::Counts;

/// An expectation-value and sampling oracle.
pub trait Oracle: Send + Sync {
    /// Name of the oracle.
    fn name(&self) -> &str;

    /// Expectation value of `observable` in the state prepared by `circuit`.
    ///
    /// The circuit must be fully bound and as wide as the observable.
    fn evaluate(&self, circuit: &Circuit, observable: &Operator) -> HalResult<f64>;

    /// Run `circuit` `shots` times and histogram the measured bits.
    ///
    /// Returns [`HalError::NoCounts`](crate::HalError::NoCounts) when no
    /// outcome was produced.
    fn sample(&self, circuit: &Circuit, shots: u32) -> HalResult<Counts>;

    /// Largest circuit width the oracle accepts, if bounded.
    fn max_qubits(&self) -> Option<u32> {
        None
    }
}

impl<T: Oracle + ?Sized> Oracle for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn evaluate(&self, circuit: &Circuit, observable: &Operator) -> HalResult<f64> {
        (**self).evaluate(circuit, observable)
    }

    fn sample(&self, circuit: &Circuit, shots: u32) -> HalResult<Counts> {
        (**self).sample(circuit, shots)
    }

    fn max_qubits(&self) -> Option<u32> {
        (**self).max_qubits()
    }
}
