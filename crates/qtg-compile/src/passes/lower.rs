//! Lowering of composite primitives.
//!
//! The tree generator is built from two composite operations: the integer
//! comparator and the multi-controlled X that borrows clean scratch qubits.
//! [`LowerToPrimitives`] expands both into X, CX, CCX and MCX gates. Every
//! other instruction is copied unchanged, so running the pass twice yields
//! the same circuit as running it once.

use qtg_ir::{Circuit, ComparatorGate, GateKind, Instruction, QubitId, StandardGate};
use tracing::{debug, instrument};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Expands comparators and v-chain multi-controlled X gates.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowerToPrimitives;

impl Pass for LowerToPrimitives {
    fn name(&self) -> &'static str {
        "lower_to_primitives"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    #[instrument(skip_all, fields(circuit = circuit.name()))]
    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let mut out = circuit.empty_like();
        let mut expanded = 0usize;

        for inst in circuit.instructions() {
            let Some(gate) = inst.as_gate() else {
                out.append(inst.clone())?;
                continue;
            };
            match &gate.kind {
                GateKind::Comparator(cmp) => {
                    let (flag, register) = split_last(inst, self.name())?;
                    lower_comparator(&mut out, cmp, register, flag)?;
                    expanded += 1;
                }
                GateKind::Standard(StandardGate::MCXVChain(n)) => {
                    let n = *n as usize;
                    let controls = &inst.qubits[..n];
                    let target = inst.qubits[n];
                    lower_mcx_vchain(&mut out, controls, target, &inst.qubits[n + 1..])?;
                    expanded += 1;
                }
                _ => {
                    out.append(inst.clone())?;
                }
            }
        }

        debug!(expanded, before = circuit.num_ops(), after = out.num_ops(), "lowered circuit");
        *circuit = out;
        properties.lowered = true;
        properties.expanded += expanded;
        Ok(())
    }

    fn should_run(&self, _circuit: &Circuit, properties: &PropertySet) -> bool {
        !properties.lowered
    }
}

fn split_last<'a>(inst: &'a Instruction, pass: &str) -> CompileResult<(QubitId, &'a [QubitId])> {
    inst.qubits
        .split_last()
        .map(|(flag, register)| (*flag, register))
        .ok_or_else(|| CompileError::PassFailed {
            name: pass.to_string(),
            reason: format!("'{}' has no operands", inst.name()),
        })
}

/// Append the X/MCX expansion of a comparator.
///
/// For `t` inside `(0, 2^m)`, `s < t` holds exactly when some set bit `k`
/// of `t` has `s_k = 0` while every higher bit of `s` matches `t`. At most
/// one `k` qualifies, so the flag is flipped by one MCX per set bit of `t`,
/// each controlled on that bit pattern with zero-controls conjugated by X.
pub fn lower_comparator(
    circuit: &mut Circuit,
    gate: &ComparatorGate,
    register: &[QubitId],
    flag: QubitId,
) -> CompileResult<()> {
    let width = register.len();
    let range = if width >= 63 { i64::MAX } else { 1i64 << width };

    // Outside the register range the strict comparison is constant.
    let always_less = gate.value >= range;
    let never_less = gate.value <= 0;

    if always_less || never_less {
        if always_less != gate.geq {
            circuit.x(flag)?;
        }
        return Ok(());
    }

    #[allow(clippy::cast_sign_loss)]
    let t = gate.value as u64;
    for k in (0..width).filter(|&k| (t >> k) & 1 == 1) {
        let zero_controls: Vec<QubitId> = std::iter::once(register[k])
            .chain(
                (k + 1..width)
                    .filter(|&j| (t >> j) & 1 == 0)
                    .map(|j| register[j]),
            )
            .collect();
        let controls = &register[k..];

        for &q in &zero_controls {
            circuit.x(q)?;
        }
        circuit.mcx(controls, flag)?;
        for &q in &zero_controls {
            circuit.x(q)?;
        }
    }

    if gate.geq {
        circuit.x(flag)?;
    }
    Ok(())
}

/// Append a Toffoli ladder computing a multi-controlled X with clean
/// scratch qubits, which are returned to |0⟩.
pub fn lower_mcx_vchain(
    circuit: &mut Circuit,
    controls: &[QubitId],
    target: QubitId,
    scratch: &[QubitId],
) -> CompileResult<()> {
    let n = controls.len();
    if n < 3 {
        circuit.mcx(controls, target)?;
        return Ok(());
    }
    if scratch.len() < n - 2 {
        return Err(CompileError::PassFailed {
            name: "lower_to_primitives".into(),
            reason: format!("v-chain with {n} controls needs {} scratch qubits", n - 2),
        });
    }

    let ladder: Vec<(QubitId, QubitId, QubitId)> =
        std::iter::once((controls[0], controls[1], scratch[0]))
            .chain((2..n - 1).map(|i| (controls[i], scratch[i - 2], scratch[i - 1])))
            .collect();

    for &(a, b, c) in &ladder {
        circuit.ccx(a, b, c)?;
    }
    circuit.ccx(controls[n - 1], scratch[n - 3], target)?;
    for &(a, b, c) in ladder.iter().rev() {
        circuit.ccx(a, b, c)?;
    }
    Ok(())
}
