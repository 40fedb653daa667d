//! Quantum gate types.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::parameter::ParameterExpression;

/// Standard gates with known semantics.
///
/// Multi-controlled gates list their controls first and the target last.
/// [`StandardGate::MCXVChain`] additionally appends its scratch ancillas
/// after the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    I,
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
    SX,
    SXdg,
    Rx(ParameterExpression),
    Ry(ParameterExpression),
    Rz(ParameterExpression),
    P(ParameterExpression),
    /// U(θ, φ, λ).
    U(
        ParameterExpression,
        ParameterExpression,
        ParameterExpression,
    ),
    CX,
    CY,
    CZ,
    CH,
    Swap,
    CRx(ParameterExpression),
    CRy(ParameterExpression),
    CRz(ParameterExpression),
    CP(ParameterExpression),
    /// exp(-iθ/2 X⊗X), and likewise for `RYY` and `RZZ`.
    RXX(ParameterExpression),
    RYY(ParameterExpression),
    RZZ(ParameterExpression),
    CCX,
    CSwap,
    /// X on the target when every one of the `n` controls is |1⟩.
    MCX(u32),
    /// Phase e^{iλ} on the all-ones state of `n` controls and the target.
    MCP(ParameterExpression, u32),
    /// Multi-controlled X with `n` controls that borrows `n - 2` clean
    /// scratch ancillas (v-chain). Scratch qubits must enter in |0⟩ and are
    /// returned to |0⟩.
    MCXVChain(u32),
}

impl StandardGate {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(_, _, _) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::CRx(_) => "crx",
            StandardGate::CRy(_) => "cry",
            StandardGate::CRz(_) => "crz",
            StandardGate::CP(_) => "cp",
            StandardGate::RXX(_) => "rxx",
            StandardGate::RYY(_) => "ryy",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
            StandardGate::MCX(_) => "mcx",
            StandardGate::MCP(_, _) => "mcp",
            StandardGate::MCXVChain(_) => "mcx_vchain",
        }
    }

    /// Operand count; the v-chain variant includes its scratch qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(_, _, _) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CRx(_)
            | StandardGate::CRy(_)
            | StandardGate::CRz(_)
            | StandardGate::CP(_)
            | StandardGate::RXX(_)
            | StandardGate::RYY(_)
            | StandardGate::RZZ(_) => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,

            StandardGate::MCX(n) | StandardGate::MCP(_, n) => n + 1,
            StandardGate::MCXVChain(n) => n + 1 + n.saturating_sub(2),
        }
    }

    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CRx(p)
            | StandardGate::CRy(p)
            | StandardGate::CRz(p)
            | StandardGate::CP(p)
            | StandardGate::RXX(p)
            | StandardGate::RYY(p)
            | StandardGate::RZZ(p)
            | StandardGate::MCP(p, _) => vec![p],

            StandardGate::U(a, b, c) => vec![a, b, c],

            _ => vec![],
        }
    }

    /// Rebuild the gate with every parameter passed through `f`.
    #[must_use]
    pub fn map_parameters(&self, f: impl Fn(&ParameterExpression) -> ParameterExpression) -> Self {
        match self {
            StandardGate::Rx(p) => StandardGate::Rx(f(p)),
            StandardGate::Ry(p) => StandardGate::Ry(f(p)),
            StandardGate::Rz(p) => StandardGate::Rz(f(p)),
            StandardGate::P(p) => StandardGate::P(f(p)),
            StandardGate::U(a, b, c) => StandardGate::U(f(a), f(b), f(c)),
            StandardGate::CRx(p) => StandardGate::CRx(f(p)),
            StandardGate::CRy(p) => StandardGate::CRy(f(p)),
            StandardGate::CRz(p) => StandardGate::CRz(f(p)),
            StandardGate::CP(p) => StandardGate::CP(f(p)),
            StandardGate::RXX(p) => StandardGate::RXX(f(p)),
            StandardGate::RYY(p) => StandardGate::RYY(f(p)),
            StandardGate::RZZ(p) => StandardGate::RZZ(f(p)),
            StandardGate::MCP(p, n) => StandardGate::MCP(f(p), *n),
            other => other.clone(),
        }
    }
}

/// Reversible integer comparator over an unsigned little-endian register.
///
/// Acts on `width` register qubits followed by one flag qubit and flips the
/// flag when `register < value` (or `register >= value` when `geq` is set).
/// The register is left untouched, so the gate is its own inverse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparatorGate {
    /// Width of the compared register.
    pub width: u32,
    /// Classical threshold. May be negative or exceed the register range.
    pub value: i64,
    /// Compare with `>=` instead of `<`.
    pub geq: bool,
}

impl ComparatorGate {
    /// Strict less-than comparator.
    pub fn less_than(width: u32, value: i64) -> Self {
        Self {
            width,
            value,
            geq: false,
        }
    }

    /// Greater-or-equal comparator.
    pub fn greater_equal(width: u32, value: i64) -> Self {
        Self {
            width,
            value,
            geq: true,
        }
    }

    /// Classical truth value of the comparison for a register value.
    pub fn evaluate(&self, register: u64) -> bool {
        let less = i128::from(register) < i128::from(self.value);
        less != self.geq
    }
}

/// Time evolution exp(-i·t·H) under a dense Hermitian generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionGate {
    /// Display label.
    pub label: String,
    /// Number of qubits the generator acts on.
    pub num_qubits: u32,
    /// Row-major 2^n × 2^n Hermitian generator.
    pub generator: Vec<Complex64>,
    /// Evolution time, typically a symbolic layer angle.
    pub time: ParameterExpression,
}

impl EvolutionGate {
    /// Create an evolution gate, checking the generator dimension.
    pub fn new(
        label: impl Into<String>,
        num_qubits: u32,
        generator: Vec<Complex64>,
        time: impl Into<ParameterExpression>,
    ) -> IrResult<Self> {
        check_matrix_len(num_qubits, generator.len())?;
        Ok(Self {
            label: label.into(),
            num_qubits,
            generator,
            time: time.into(),
        })
    }
}

/// A gate given by its row-major 2^n × 2^n unitary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    pub name: String,
    pub num_qubits: u32,
    pub matrix: Vec<Complex64>,
}

impl CustomGate {
    pub fn new(name: impl Into<String>, num_qubits: u32, matrix: Vec<Complex64>) -> IrResult<Self> {
        check_matrix_len(num_qubits, matrix.len())?;
        Ok(Self {
            name: name.into(),
            num_qubits,
            matrix,
        })
    }

    /// The conjugate transpose of this gate.
    #[must_use]
    pub fn adjoint(&self) -> Self {
        let dim = 1usize << self.num_qubits;
        let mut matrix = vec![Complex64::new(0.0, 0.0); dim * dim];
        for r in 0..dim {
            for c in 0..dim {
                matrix[c * dim + r] = self.matrix[r * dim + c].conj();
            }
        }
        Self {
            name: format!("{}_dg", self.name),
            num_qubits: self.num_qubits,
            matrix,
        }
    }
}

fn check_matrix_len(num_qubits: u32, len: usize) -> IrResult<()> {
    let dim = 1usize << num_qubits;
    if len == dim * dim {
        Ok(())
    } else {
        Err(IrError::MatrixDimension {
            num_qubits,
            got: len,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    Standard(StandardGate),
    Custom(CustomGate),
    Comparator(ComparatorGate),
    Evolution(EvolutionGate),
}

impl GateKind {
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Custom(g) => &g.name,
            GateKind::Comparator(_) => "cmp",
            GateKind::Evolution(_) => "evolution",
        }
    }

    /// Operand count, including the comparator flag qubit.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Custom(g) => g.num_qubits,
            GateKind::Comparator(g) => g.width + 1,
            GateKind::Evolution(g) => g.num_qubits,
        }
    }

    /// Parameter expressions carried by the gate.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            GateKind::Standard(g) => g.parameters(),
            GateKind::Evolution(g) => vec![&g.time],
            GateKind::Custom(_) | GateKind::Comparator(_) => vec![],
        }
    }

    /// Rebuild the gate with every parameter passed through `f`.
    #[must_use]
    pub fn map_parameters(&self, f: impl Fn(&ParameterExpression) -> ParameterExpression) -> Self {
        match self {
            GateKind::Standard(g) => GateKind::Standard(g.map_parameters(f)),
            GateKind::Evolution(g) => GateKind::Evolution(EvolutionGate {
                time: f(&g.time),
                ..g.clone()
            }),
            other => other.clone(),
        }
    }
}

/// A gate as placed in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub kind: GateKind,
    /// Display label; inversion keeps it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }
}

macro_rules! gate_from {
    ($ty:ident, $variant:ident) => {
        impl From<$ty> for Gate {
            fn from(gate: $ty) -> Self {
                Self {
                    kind: GateKind::$variant(gate),
                    label: None,
                }
            }
        }
    };
}

gate_from!(StandardGate, Standard);
gate_from!(CustomGate, Custom);
gate_from!(ComparatorGate, Comparator);
gate_from!(EvolutionGate, Evolution);
