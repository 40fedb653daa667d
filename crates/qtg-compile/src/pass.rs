//! The [`Pass`] trait.

use qtg_ir::Circuit;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// Whether a pass may change the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Reads the circuit and writes to the [`PropertySet`] only.
    Analysis,
    /// Replaces the circuit with a rebuilt one over the same registers.
    Transformation,
}

/// One step of a [`crate::PassManager`] pipeline.
pub trait Pass: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> PassKind;

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()>;

    /// Skip the pass when earlier passes already did its work.
    fn should_run(&self, _circuit: &Circuit, _properties: &PropertySet) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtg_ir::QubitId;

    /// Counts the Hadamards of a circuit.
    struct CountHadamards;

    impl Pass for CountHadamards {
        fn name(&self) -> &'static str {
            "count_h"
        }

        fn kind(&self) -> PassKind {
            PassKind::Analysis
        }

        fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
            properties.expanded = circuit.instructions().filter(|i| i.name() == "h").count();
            Ok(())
        }
    }

    #[test]
    fn test_default_should_run() {
        let mut circuit = Circuit::with_size("c", 2, 0);
        circuit.h(QubitId(0)).unwrap().h(QubitId(1)).unwrap();
        let mut props = PropertySet::new();

        let pass = CountHadamards;
        assert_eq!(pass.kind(), PassKind::Analysis);
        assert!(pass.should_run(&circuit, &props));
        pass.run(&mut circuit, &mut props).unwrap();
        assert_eq!(props.expanded, 2);
        assert_eq!(circuit.num_ops(), 2);
    }
}
