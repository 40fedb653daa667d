//! State shared between the passes of one pipeline run.

use std::collections::BTreeMap;

/// Gate statistics recorded by [`crate::passes::GateCounts`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircuitStats {
    pub counts: BTreeMap<String, usize>,
    pub num_ops: usize,
    pub depth: usize,
}

impl CircuitStats {
    pub fn of(circuit: &qtg_ir::Circuit) -> Self {
        Self {
            counts: circuit.count_ops(),
            num_ops: circuit.num_ops(),
            depth: circuit.depth(),
        }
    }

    /// Instructions that are neither barriers nor measurements.
    pub fn num_gates(&self) -> usize {
        self.counts
            .iter()
            .filter(|(name, _)| !matches!(name.as_str(), "barrier" | "measure"))
            .map(|(_, n)| n)
            .sum()
    }
}

/// Results written by passes, read by later passes and by callers.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    /// Latest gate-count analysis.
    pub stats: Option<CircuitStats>,
    /// Set once only primitive gates remain.
    pub lowered: bool,
    /// Composite gates expanded by lowering.
    pub expanded: usize,
    /// Gates removed by inverse cancellation.
    pub cancelled: usize,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtg_ir::{Circuit, ClbitId, QubitId};

    #[test]
    fn test_stats_of_circuit() {
        let mut circuit = Circuit::with_size("c", 2, 1);
        circuit
            .h(QubitId(0))
            .unwrap()
            .barrier([QubitId(0), QubitId(1)])
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(1), ClbitId(0))
            .unwrap();

        let stats = CircuitStats::of(&circuit);
        assert_eq!(stats.num_ops, 4);
        assert_eq!(stats.num_gates(), 2);
        assert_eq!(stats.depth, 3);
        assert!(PropertySet::new().stats.is_none());
    }
}
