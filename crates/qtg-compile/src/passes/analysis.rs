//! Analysis passes.

use qtg_ir::Circuit;
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::{CircuitStats, PropertySet};

/// Records gate counts and depth into [`PropertySet::stats`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GateCounts;

impl Pass for GateCounts {
    fn name(&self) -> &'static str {
        "gate_counts"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let stats = CircuitStats::of(circuit);
        debug!(ops = stats.num_ops, depth = stats.depth, "gate counts");
        properties.stats = Some(stats);
        Ok(())
    }
}
