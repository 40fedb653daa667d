//! Cancellation of adjacent self-inverse gates.

use qtg_ir::{Circuit, GateKind, Instruction, is_self_inverse};
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Removes pairs of identical self-inverse gates that are adjacent on every
/// wire they touch (X·X, CX·CX, CCX·CCX, MCX·MCX, ...).
///
/// X-conjugated controls in lowered comparators and adders leave many such
/// pairs behind. Cancellation cascades: removing an inner pair can expose an
/// outer one.
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelInverses;

impl CancelInverses {
    fn cancels(a: &Instruction, b: &Instruction) -> bool {
        let (Some(ga), Some(gb)) = (a.as_gate(), b.as_gate()) else {
            return false;
        };
        match (&ga.kind, &gb.kind) {
            (GateKind::Standard(sa), GateKind::Standard(sb)) => {
                sa == sb && is_self_inverse(sa) && a.qubits == b.qubits
            }
            _ => false,
        }
    }
}

impl Pass for CancelInverses {
    fn name(&self) -> &'static str {
        "cancel_inverses"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let mut kept: Vec<Option<Instruction>> = Vec::with_capacity(circuit.num_ops());
        // Per qubit: indices into `kept` of the live instructions on that wire.
        let mut wires: Vec<Vec<usize>> = vec![Vec::new(); circuit.num_qubits()];
        let mut removed = 0usize;

        for inst in circuit.instructions() {
            let front = inst
                .qubits
                .first()
                .and_then(|q| wires.get(q.index()).and_then(|w| w.last().copied()));
            let adjacent = front.filter(|&idx| {
                inst.qubits
                    .iter()
                    .all(|q| wires.get(q.index()).and_then(|w| w.last()) == Some(&idx))
                    && inst.clbits.is_empty()
            });

            if let Some(idx) = adjacent {
                if kept[idx].as_ref().is_some_and(|prev| Self::cancels(prev, inst)) {
                    kept[idx] = None;
                    for q in &inst.qubits {
                        wires[q.index()].pop();
                    }
                    removed += 2;
                    continue;
                }
            }

            let idx = kept.len();
            for q in &inst.qubits {
                if let Some(w) = wires.get_mut(q.index()) {
                    w.push(idx);
                }
            }
            kept.push(Some(inst.clone()));
        }

        if removed > 0 {
            let mut out = circuit.empty_like();
            for inst in kept.into_iter().flatten() {
                out.append(inst)?;
            }
            debug!(removed, "cancelled self-inverse pairs");
            *circuit = out;
        }
        properties.cancelled += removed;
        Ok(())
    }
}
