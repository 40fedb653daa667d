//! Pass manager for orchestrating compilation.

use tracing::{debug, info, instrument};

use qtg_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::passes::{CancelInverses, GateCounts, LowerToPrimitives};
use crate::property::PropertySet;

/// Runs an ordered pipeline of passes over a circuit.
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowering followed by gate statistics.
    pub fn lowering() -> Self {
        Self::new().with_pass(LowerToPrimitives).with_pass(GateCounts)
    }

    /// Lowering, self-inverse cancellation, then gate statistics.
    pub fn optimizing() -> Self {
        Self::lowering().with_pass_before_last(CancelInverses)
    }

    #[must_use]
    pub fn with_pass(mut self, pass: impl Pass + 'static) -> Self {
        self.add_pass(pass);
        self
    }

    fn with_pass_before_last(mut self, pass: impl Pass + 'static) -> Self {
        let at = self.passes.len().saturating_sub(1);
        self.passes.insert(at, Box::new(pass));
        self
    }

    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Pass names in execution order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    #[instrument(skip_all, fields(circuit = circuit.name(), passes = self.passes.len()))]
    pub fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        info!(qubits = circuit.num_qubits(), ops = circuit.num_ops(), "compiling");

        for pass in &self.passes {
            if !pass.should_run(circuit, properties) {
                debug!(pass = pass.name(), "skipped");
                continue;
            }
            let before = circuit.num_ops();
            pass.run(circuit, properties)?;
            match pass.kind() {
                PassKind::Analysis => debug!(pass = pass.name(), "analysed"),
                PassKind::Transformation => {
                    debug!(pass = pass.name(), before, after = circuit.num_ops(), "rewrote");
                }
            }
        }

        info!(depth = circuit.depth(), ops = circuit.num_ops(), "compiled");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

/// Lower a copy of `circuit` to primitive gates.
pub fn lower(circuit: &Circuit) -> CompileResult<Circuit> {
    let mut lowered = circuit.clone();
    LowerToPrimitives.run(&mut lowered, &mut PropertySet::new())?;
    Ok(lowered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtg_ir::{ComparatorGate, QubitId};

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);
    }

    #[test]
    fn test_lowering_preset() {
        let pm = PassManager::lowering();
        assert_eq!(pm.pass_names(), vec!["lower_to_primitives", "gate_counts"]);
        assert_eq!(
            PassManager::optimizing().pass_names(),
            vec!["lower_to_primitives", "cancel_inverses", "gate_counts"]
        );

        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit
            .comparator(
                ComparatorGate::less_than(2, 2),
                &[QubitId(0), QubitId(1)],
                QubitId(2),
            )
            .unwrap();

        let mut props = PropertySet::new();
        pm.run(&mut circuit, &mut props).unwrap();

        assert!(props.lowered);
        assert_eq!(props.expanded, 1);
        let stats = props.stats.unwrap();
        assert!(!stats.counts.contains_key("cmp"));
        assert_eq!(stats.num_ops, circuit.num_ops());
    }

    #[test]
    fn test_lower_leaves_source() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit
            .comparator(
                ComparatorGate::greater_equal(2, 1),
                &[QubitId(0), QubitId(1)],
                QubitId(2),
            )
            .unwrap();
        let lowered = lower(&circuit).unwrap();
        assert_eq!(circuit.count_ops()["cmp"], 1);
        assert!(!lowered.count_ops().contains_key("cmp"));
    }
}
