//! Gate inversion.

use crate::error::{IrError, IrResult};
use crate::gate::{EvolutionGate, Gate, GateKind, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::parameter::ParameterExpression;

/// Compute the inverse of a standard gate.
///
/// - H† = H, X† = X and every multi-controlled X is self-inverse
/// - S† = Sdg, T† = Tdg
/// - Rotations and phases negate their angle
pub fn inverse_gate(gate: &StandardGate) -> StandardGate {
    match gate {
        StandardGate::S => StandardGate::Sdg,
        StandardGate::Sdg => StandardGate::S,
        StandardGate::T => StandardGate::Tdg,
        StandardGate::Tdg => StandardGate::T,
        StandardGate::SX => StandardGate::SXdg,
        StandardGate::SXdg => StandardGate::SX,

        // U(θ, φ, λ)† = U(-θ, -λ, -φ)
        StandardGate::U(theta, phi, lambda) => {
            StandardGate::U(negate(theta), negate(lambda), negate(phi))
        }

        g if is_self_inverse(g) => g.clone(),
        g => g.map_parameters(negate),
    }
}

fn negate(param: &ParameterExpression) -> ParameterExpression {
    -param.clone()
}

/// Compute the inverse of any gate kind.
pub fn inverse_gate_kind(kind: &GateKind) -> GateKind {
    match kind {
        GateKind::Standard(g) => GateKind::Standard(inverse_gate(g)),
        GateKind::Custom(g) => GateKind::Custom(g.adjoint()),
        GateKind::Comparator(g) => GateKind::Comparator(g.clone()),
        GateKind::Evolution(g) => GateKind::Evolution(EvolutionGate {
            time: negate(&g.time),
            ..g.clone()
        }),
    }
}

/// Compute the inverse of an instruction.
///
/// Barriers invert to themselves; measurement and reset are rejected.
pub fn inverse_instruction(instruction: &Instruction) -> IrResult<Instruction> {
    match &instruction.kind {
        InstructionKind::Gate(gate) => Ok(Instruction {
            kind: InstructionKind::Gate(Gate {
                kind: inverse_gate_kind(&gate.kind),
                label: gate.label.clone(),
            }),
            qubits: instruction.qubits.clone(),
            clbits: instruction.clbits.clone(),
        }),
        InstructionKind::Barrier => Ok(instruction.clone()),
        InstructionKind::Measure | InstructionKind::Reset => {
            Err(IrError::NotInvertible(instruction.name().to_string()))
        }
    }
}

/// Check if a gate is self-inverse (Hermitian).
pub fn is_self_inverse(gate: &StandardGate) -> bool {
    matches!(
        gate,
        StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CCX
            | StandardGate::CSwap
            | StandardGate::MCX(_)
            | StandardGate::MCXVChain(_)
    )
}
