//! High-level circuit builder API.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::dag::CircuitDag;
use crate::error::{IrError, IrResult};
use crate::gate::{ComparatorGate, EvolutionGate, Gate, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::inverse::inverse_instruction;
use crate::parameter::ParameterExpression;
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};

macro_rules! fixed_gates {
    ($($method:ident => $gate:ident),* $(,)?) => {
        $(
            pub fn $method(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
                self.apply_gate(StandardGate::$gate, [qubit])
            }
        )*
    };
}

macro_rules! rotation_gates {
    ($($method:ident => $gate:ident),* $(,)?) => {
        $(
            pub fn $method(
                &mut self,
                theta: impl Into<ParameterExpression>,
                qubit: QubitId,
            ) -> IrResult<&mut Self> {
                self.apply_gate(StandardGate::$gate(theta.into()), [qubit])
            }
        )*
    };
}

macro_rules! pair_rotation_gates {
    ($($method:ident => $gate:ident),* $(,)?) => {
        $(
            /// exp(-iθ/2 P⊗P) on `a` and `b`.
            pub fn $method(
                &mut self,
                theta: impl Into<ParameterExpression>,
                a: QubitId,
                b: QubitId,
            ) -> IrResult<&mut Self> {
                self.apply_gate(StandardGate::$gate(theta.into()), [a, b])
            }
        )*
    };
}

/// A quantum circuit.
///
/// Gates are appended through builder methods that validate their operands
/// against the underlying DAG. Transformations such as [`Circuit::inverse`],
/// [`Circuit::bind_parameters`] and [`Circuit::compose`] never touch the
/// source circuit's gates in place; the first two return new circuits.
#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    qubits: Vec<Qubit>,
    clbits: Vec<Clbit>,
    dag: CircuitDag,
    next_qubit_id: u32,
    next_clbit_id: u32,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            dag: CircuitDag::new(),
            next_qubit_id: 0,
            next_clbit_id: 0,
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    /// A circuit with the same name, qubits and classical bits but no
    /// operations.
    pub fn empty_like(&self) -> Self {
        let mut dag = CircuitDag::new();
        for q in &self.qubits {
            dag.add_qubit(q.id);
        }
        for c in &self.clbits {
            dag.add_clbit(c.id);
        }
        Self {
            name: self.name.clone(),
            qubits: self.qubits.clone(),
            clbits: self.clbits.clone(),
            dag,
            next_qubit_id: self.next_qubit_id,
            next_clbit_id: self.next_clbit_id,
        }
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.next_qubit_id);
        self.next_qubit_id += 1;
        self.qubits.push(Qubit::loose(id));
        self.dag.add_qubit(id);
        id
    }

    /// Add a named quantum register of `size` qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let name = name.into();
        (0..size)
            .map(|offset| {
                let id = QubitId(self.next_qubit_id);
                self.next_qubit_id += 1;
                self.qubits.push(Qubit::in_register(id, &name, offset));
                self.dag.add_qubit(id);
                id
            })
            .collect()
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.next_clbit_id);
        self.next_clbit_id += 1;
        self.clbits.push(Clbit::loose(id));
        self.dag.add_clbit(id);
        id
    }

    /// Add a named classical register of `size` bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let name = name.into();
        (0..size)
            .map(|offset| {
                let id = ClbitId(self.next_clbit_id);
                self.next_clbit_id += 1;
                self.clbits.push(Clbit::in_register(id, &name, offset));
                self.dag.add_clbit(id);
                id
            })
            .collect()
    }

    /// Qubits of a named register, in register order.
    pub fn qreg(&self, name: &str) -> Vec<QubitId> {
        let mut members: Vec<_> = self
            .qubits
            .iter()
            .filter_map(|q| match &q.slot {
                Some(slot) if slot.register == name => Some((slot.offset, q.id)),
                _ => None,
            })
            .collect();
        members.sort_unstable();
        members.into_iter().map(|(_, id)| id).collect()
    }

    fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(instruction)?;
        Ok(self)
    }

    fn apply_gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, qubits))
    }

    // =========================================================================
    // Fixed-arity gates
    // =========================================================================

    fixed_gates! {
        h => H,
        x => X,
        y => Y,
        z => Z,
        s => S,
        sdg => Sdg,
        t => T,
    }

    rotation_gates! {
        rx => Rx,
        ry => Ry,
        rz => Rz,
    }

    /// CNOT.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply_gate(StandardGate::CX, [control, target])
    }

    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply_gate(StandardGate::CZ, [control, target])
    }

    pub fn swap(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.apply_gate(StandardGate::Swap, [a, b])
    }

    /// Toffoli.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply_gate(StandardGate::CCX, [c1, c2, target])
    }

    pub fn cry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_gate(StandardGate::CRy(theta.into()), [control, target])
    }

    pair_rotation_gates! {
        rxx => RXX,
        ryy => RYY,
        rzz => RZZ,
    }

    // =========================================================================
    // Multi-controlled and arithmetic gates
    // =========================================================================

    /// Apply X to `target` when every control is |1⟩.
    ///
    /// Zero controls degrade to a plain X.
    #[allow(clippy::cast_possible_truncation)]
    pub fn mcx(&mut self, controls: &[QubitId], target: QubitId) -> IrResult<&mut Self> {
        let gate = match controls.len() {
            0 => StandardGate::X,
            1 => StandardGate::CX,
            2 => StandardGate::CCX,
            n => StandardGate::MCX(n as u32),
        };
        self.apply_gate(gate, controls.iter().copied().chain([target]))
    }

    /// Apply a phase to the state where every control and the target are |1⟩.
    #[allow(clippy::cast_possible_truncation)]
    pub fn mcp(
        &mut self,
        lambda: impl Into<ParameterExpression>,
        controls: &[QubitId],
        target: QubitId,
    ) -> IrResult<&mut Self> {
        let lambda = lambda.into();
        let gate = match controls.len() {
            0 => StandardGate::P(lambda),
            1 => StandardGate::CP(lambda),
            n => StandardGate::MCP(lambda, n as u32),
        };
        self.apply_gate(gate, controls.iter().copied().chain([target]))
    }

    /// Multi-controlled X using clean scratch qubits (v-chain).
    ///
    /// Needs `controls.len() - 2` scratch qubits, which must be |0⟩ on
    /// entry and are |0⟩ again on exit. With fewer than three controls
    /// this is an ordinary [`Circuit::mcx`] and the scratch is ignored.
    #[allow(clippy::cast_possible_truncation)]
    pub fn mcx_vchain(
        &mut self,
        controls: &[QubitId],
        target: QubitId,
        scratch: &[QubitId],
    ) -> IrResult<&mut Self> {
        if controls.len() < 3 {
            return self.mcx(controls, target);
        }
        let needed = controls.len() - 2;
        if scratch.len() < needed {
            return Err(IrError::QubitCountMismatch {
                gate_name: "mcx_vchain".into(),
                expected: (controls.len() + 1 + needed) as u32,
                got: (controls.len() + 1 + scratch.len()) as u32,
            });
        }
        let qubits = controls
            .iter()
            .copied()
            .chain([target])
            .chain(scratch[..needed].iter().copied());
        self.apply_gate(StandardGate::MCXVChain(controls.len() as u32), qubits)
    }

    /// Apply an integer comparator writing into `flag`.
    pub fn comparator(
        &mut self,
        gate: ComparatorGate,
        register: &[QubitId],
        flag: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_gate(gate, register.iter().copied().chain([flag]))
    }

    /// Apply a Hamiltonian evolution gate.
    pub fn evolution(&mut self, gate: EvolutionGate, qubits: &[QubitId]) -> IrResult<&mut Self> {
        self.apply_gate(gate, qubits.iter().copied())
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Append an instruction as-is.
    pub fn append(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.apply(instruction)
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Measure the given qubits into a fresh classical register `meas`.
    ///
    /// Classical bit `k` receives `qubits[k]`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn measure_qubits(&mut self, qubits: &[QubitId]) -> IrResult<&mut Self> {
        let clbits = self.add_creg("meas", qubits.len() as u32);
        self.apply(Instruction::measure_all(qubits.iter().copied(), clbits)?)
    }

    /// Measure all qubits to corresponding classical bits.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.clbits.len() < self.qubits.len() {
            self.add_clbit();
        }

        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        let clbits: Vec<_> = self
            .clbits
            .iter()
            .map(|c| c.id)
            .take(qubits.len())
            .collect();

        self.apply(Instruction::measure_all(qubits, clbits)?)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::reset(qubit))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits))
    }

    // =========================================================================
    // Composition and transformation
    // =========================================================================

    /// Append every instruction of `other`.
    ///
    /// `qubit_map[k]` is the wire of this circuit that receives qubit `k` of
    /// `other`; `None` maps qubit `k` onto qubit `k`. Classical bits are
    /// mapped one to one.
    pub fn compose(&mut self, other: &Circuit, qubit_map: Option<&[QubitId]>) -> IrResult<&mut Self> {
        let map: Vec<QubitId> = match qubit_map {
            Some(map) if map.len() == other.num_qubits() => map.to_vec(),
            None if other.num_qubits() <= self.num_qubits() => {
                self.qubits.iter().map(|q| q.id).collect()
            }
            _ => {
                return Err(IrError::ComposeMismatch {
                    other: other.num_qubits(),
                    target: qubit_map.map_or(self.num_qubits(), <[QubitId]>::len),
                });
            }
        };
        for (_, inst) in other.dag.topological_ops() {
            self.dag.apply(inst.remapped(&map)?)?;
        }
        Ok(self)
    }

    /// The inverse circuit: inverted instructions in reverse order.
    ///
    /// Fails on measurement or reset.
    pub fn inverse(&self) -> IrResult<Circuit> {
        let ops: Vec<_> = self.dag.topological_ops().map(|(_, inst)| inst).collect();
        let mut out = self.empty_like();
        out.name = format!("{}_dg", self.name);
        for inst in ops.into_iter().rev() {
            out.dag.apply(inverse_instruction(inst)?)?;
        }
        Ok(out)
    }

    /// Rebuild the circuit with every gate parameter passed through `f`.
    fn map_parameters(
        &self,
        f: impl Fn(&ParameterExpression) -> ParameterExpression,
    ) -> IrResult<Circuit> {
        let mut out = self.empty_like();
        for (_, inst) in self.dag.topological_ops() {
            let kind = match &inst.kind {
                InstructionKind::Gate(gate) => InstructionKind::Gate(Gate {
                    kind: gate.kind.map_parameters(&f),
                    label: gate.label.clone(),
                }),
                other => other.clone(),
            };
            out.dag.apply(Instruction {
                kind,
                ..inst.clone()
            })?;
        }
        Ok(out)
    }

    /// Bind named parameters to values. Names not present are ignored and
    /// symbols without a value stay symbolic.
    pub fn bind_parameters(&self, values: &FxHashMap<String, f64>) -> IrResult<Circuit> {
        self.map_parameters(|p| {
            let mut bound = p.clone();
            for symbol in p.symbols() {
                if let Some(&v) = values.get(&symbol) {
                    bound = bound.bind(&symbol, v);
                }
            }
            bound.simplify()
        })
    }

    /// Bind every free parameter, in [`Circuit::parameters`] order.
    pub fn bind_values(&self, values: &[f64]) -> IrResult<Circuit> {
        let names = self.parameters();
        if names.len() != values.len() {
            return Err(IrError::ParameterCountMismatch {
                expected: names.len(),
                got: values.len(),
            });
        }
        let map: FxHashMap<String, f64> = names.into_iter().zip(values.iter().copied()).collect();
        self.bind_parameters(&map)
    }

    /// Replace a symbol with another expression everywhere.
    pub fn substitute_parameter(
        &self,
        name: &str,
        replacement: &ParameterExpression,
    ) -> IrResult<Circuit> {
        self.map_parameters(|p| p.substitute(name, replacement))
    }

    /// Free parameter names.
    ///
    /// Sorted by base name, then by numeric index for names of the form
    /// `base[k]`, so `β[2]` precedes `β[10]`.
    pub fn parameters(&self) -> Vec<String> {
        let mut set = std::collections::BTreeSet::new();
        for (_, inst) in self.dag.topological_ops() {
            if let Some(gate) = inst.as_gate() {
                for p in gate.kind.parameters() {
                    p.collect_symbols(&mut set);
                }
            }
        }
        let mut names: Vec<String> = set.into_iter().collect();
        names.sort_by(|a, b| parameter_sort_key(a).cmp(&parameter_sort_key(b)));
        names
    }

    /// Whether any gate still carries a symbolic parameter.
    pub fn is_parameterized(&self) -> bool {
        !self.parameters().is_empty()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the circuit.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    /// Layers of non-barrier operations.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Instructions in topological order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.dag.topological_ops().map(|(_, inst)| inst)
    }

    /// Number of instructions per name.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for inst in self.instructions() {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }
}

fn parameter_sort_key(name: &str) -> (&str, Option<u64>, &str) {
    if let Some(open) = name.rfind('[') {
        if let Some(inner) = name[open + 1..].strip_suffix(']') {
            if let Ok(index) = inner.parse::<u64>() {
                return (&name[..open], Some(index), name);
            }
        }
    }
    (name, None, name)
}
