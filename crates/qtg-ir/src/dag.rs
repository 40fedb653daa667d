//! Wire-level dependency graph of a circuit.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

pub type NodeIndex = PetNodeIndex<u32>;

/// Node of the dependency graph. Every wire starts at an `In` node and ends
/// at an `Out` node, with the operations touching it in between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    In(WireId),
    Out(WireId),
    Op(Instruction),
}

/// A quantum or classical wire; also the weight of every edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireId {
    Qubit(QubitId),
    Clbit(ClbitId),
}

#[derive(Debug, Clone, Copy)]
struct Terminals {
    input: NodeIndex,
    output: NodeIndex,
    /// Last node on the wire before `output`.
    front: NodeIndex,
}

/// Append-only dependency graph of a circuit.
///
/// Operations are recorded in insertion order, which is always a valid
/// topological order. Rewrites build a fresh DAG rather than editing nodes.
#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    graph: DiGraph<DagNode, WireId, u32>,
    wires: FxHashMap<WireId, Terminals>,
    num_qubits: usize,
    op_order: Vec<NodeIndex>,
}

impl CircuitDag {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_wire(&mut self, wire: WireId) -> bool {
        if self.wires.contains_key(&wire) {
            return false;
        }
        let input = self.graph.add_node(DagNode::In(wire));
        let output = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(input, output, wire);
        self.wires.insert(
            wire,
            Terminals {
                input,
                output,
                front: input,
            },
        );
        true
    }

    /// Register a qubit wire. Adding an existing qubit is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.add_wire(WireId::Qubit(qubit)) {
            self.num_qubits += 1;
        }
    }

    /// Register a classical wire. Adding an existing bit is a no-op.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        self.add_wire(WireId::Clbit(clbit));
    }

    fn check_operands(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = || match &instruction.kind {
            InstructionKind::Gate(gate) => Some(gate.name().to_string()),
            _ => None,
        };

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let got = instruction.qubits.len() as u32;
            if gate.num_qubits() != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: gate.num_qubits(),
                    got,
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !self.wires.contains_key(&WireId::Qubit(qubit)) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name(),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name(),
                });
            }
        }
        if let Some(&clbit) = instruction
            .clbits
            .iter()
            .find(|c| !self.wires.contains_key(&WireId::Clbit(**c)))
        {
            return Err(IrError::ClbitNotFound {
                clbit,
                gate_name: gate_name(),
            });
        }
        Ok(())
    }

    /// Append an instruction after everything already on its wires.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        self.check_operands(&instruction)?;

        let touched: Vec<WireId> = instruction
            .qubits
            .iter()
            .map(|&q| WireId::Qubit(q))
            .chain(instruction.clbits.iter().map(|&c| WireId::Clbit(c)))
            .collect();
        let node = self.graph.add_node(DagNode::Op(instruction));

        for wire in touched {
            let Some(ends) = self.wires.get_mut(&wire) else {
                continue;
            };
            let tail = self
                .graph
                .edges_directed(ends.front, Direction::Outgoing)
                .find(|e| *e.weight() == wire && e.target() == ends.output)
                .map(|e| e.id())
                .ok_or_else(|| {
                    IrError::InvalidDag(format!("wire {wire:?} is detached from its output"))
                })?;
            self.graph.remove_edge(tail);
            self.graph.add_edge(ends.front, node, wire);
            self.graph.add_edge(node, ends.output, wire);
            ends.front = node;
        }

        self.op_order.push(node);
        Ok(node)
    }

    /// Operations in insertion order.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        self.op_order.iter().filter_map(|&idx| match &self.graph[idx] {
            DagNode::Op(inst) => Some((idx, inst)),
            _ => None,
        })
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.wires.len() - self.num_qubits
    }

    #[inline]
    pub fn num_ops(&self) -> usize {
        self.op_order.len()
    }

    /// Longest chain of operations along any path. Barriers do not add a layer.
    pub fn depth(&self) -> usize {
        let mut layer: FxHashMap<NodeIndex, usize> =
            FxHashMap::with_capacity_and_hasher(self.op_order.len(), Default::default());

        self.op_order
            .iter()
            .map(|&node| {
                let below = self
                    .graph
                    .neighbors_directed(node, Direction::Incoming)
                    .filter_map(|pred| layer.get(&pred).copied())
                    .max()
                    .unwrap_or(0);
                let own = match &self.graph[node] {
                    DagNode::Op(inst) if !inst.is_barrier() => below + 1,
                    _ => below,
                };
                layer.insert(node, own);
                own
            })
            .max()
            .unwrap_or(0)
    }

    /// Check that the graph is acyclic and every wire is a single unbroken
    /// path from its input to its output.
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("graph contains a cycle".into()));
        }

        for (&wire, ends) in &self.wires {
            let mut current = ends.input;
            for _ in 0..=self.graph.node_count() {
                if current == ends.output {
                    break;
                }
                let mut next = self
                    .graph
                    .edges_directed(current, Direction::Outgoing)
                    .filter(|e| *e.weight() == wire)
                    .map(|e| e.target());
                current = match (next.next(), next.next()) {
                    (Some(target), None) => target,
                    _ => {
                        return Err(IrError::InvalidDag(format!(
                            "wire {wire:?} branches or breaks at node {}",
                            current.index()
                        )));
                    }
                };
            }
            if current != ends.output {
                return Err(IrError::InvalidDag(format!("wire {wire:?} does not terminate")));
            }
        }
        Ok(())
    }
}
