//! QAOA ansatz on a fixed subsystem.
//!
//! ```text
//! |ψ(γ, β)⟩ = Π_k [ U_M(β_k) · exp(−iγ_k H_C) ] · U_init |0⟩
//! ```
//!
//! The circuit has exactly as many qubits as the cost operator (or the width
//! given with [`AnsatzBuilder::num_qubits`]). Parameters are ordered
//! `γ[0], β[0…], γ[1], β[…], …`; a layer whose operator is a multiple of the
//! identity contributes neither gates nor parameters.

use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use qtg_ir::{Circuit, ParameterExpression, QubitId};
use qtg_sim::{Hamiltonian, Operator, synthesis::append_evolution};

use crate::error::{QaoaError, QaoaResult};
use crate::mixer::Mixer;

/// Symbol of the cost angle of repetition `k`.
pub fn gamma(k: usize) -> String {
    format!("γ[{k}]")
}

/// Symbol of mixer angle `k`.
pub fn beta(k: usize) -> String {
    format!("β[{k}]")
}

/// Builder for [`SubsystemAnsatz`].
#[derive(Debug, Clone)]
pub struct AnsatzBuilder {
    cost: Option<Operator>,
    num_qubits: Option<usize>,
    initial_state: Option<Circuit>,
    mixer: Option<Mixer>,
    reps: usize,
    insert_barriers: bool,
    name: String,
}

impl Default for AnsatzBuilder {
    fn default() -> Self {
        Self {
            cost: None,
            num_qubits: None,
            initial_state: None,
            mixer: None,
            reps: 1,
            insert_barriers: false,
            name: "qaoa".into(),
        }
    }
}

impl AnsatzBuilder {
    /// Set the cost operator.
    #[must_use]
    pub fn cost(mut self, cost: impl Into<Operator>) -> Self {
        self.cost = Some(cost.into());
        self
    }

    /// Set the subsystem width explicitly. A narrower cost operator is padded
    /// with identity on the extra qubits.
    #[must_use]
    pub fn num_qubits(mut self, num_qubits: usize) -> Self {
        self.num_qubits = Some(num_qubits);
        self
    }

    /// Set the initial-state circuit (default: `H` on every qubit).
    #[must_use]
    pub fn initial_state(mut self, circuit: Circuit) -> Self {
        self.initial_state = Some(circuit);
        self
    }

    /// Set the mixer (default: `Σ Xᵢ`).
    #[must_use]
    pub fn mixer(mut self, mixer: impl Into<Mixer>) -> Self {
        self.mixer = Some(mixer.into());
        self
    }

    /// Set the number of repetitions.
    #[must_use]
    pub fn reps(mut self, reps: usize) -> Self {
        self.reps = reps;
        self
    }

    /// Put a barrier between blocks.
    #[must_use]
    pub fn insert_barriers(mut self, enabled: bool) -> Self {
        self.insert_barriers = enabled;
        self
    }

    /// Set the circuit name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Validate the configuration and build the circuit.
    #[instrument(skip(self), fields(name = %self.name, reps = self.reps))]
    #[allow(clippy::cast_possible_truncation)]
    pub fn build(&self) -> QaoaResult<SubsystemAnsatz> {
        let cost = self.cost.as_ref().ok_or(QaoaError::MissingCostOperator)?;
        if self.reps == 0 {
            return Err(QaoaError::InvalidReps);
        }
        let n = self.num_qubits.unwrap_or(cost.num_qubits() as usize);
        if (cost.num_qubits() as usize) > n {
            return Err(QaoaError::QubitCountMismatch {
                component: "cost operator",
                expected: n,
                got: cost.num_qubits() as usize,
            });
        }
        let cost = cost.extend(n as u32)?;

        let initial_state = match &self.initial_state {
            Some(c) if c.num_qubits() != n => {
                return Err(QaoaError::QubitCountMismatch {
                    component: "initial state",
                    expected: n,
                    got: c.num_qubits(),
                });
            }
            Some(c) => c.clone(),
            None => hadamard_layer(n)?,
        };
        let mixer = match &self.mixer {
            Some(m) if m.num_qubits() != n => {
                return Err(QaoaError::QubitCountMismatch {
                    component: "mixer",
                    expected: n,
                    got: m.num_qubits(),
                });
            }
            Some(m) => m.clone(),
            None => Mixer::Operator(Operator::Pauli(Hamiltonian::transverse_field(n as u32))),
        };

        let mut circuit = Circuit::new(self.name.clone());
        let qubits = circuit.add_qreg("q", n as u32);
        let mut parameters = Vec::new();

        circuit.compose(&initial_state, Some(&qubits))?;
        self.barrier(&mut circuit, &qubits)?;

        let cost_active = !cost.is_identity();
        let layer = MixerLayer::new(&mixer)?;
        for k in 0..self.reps {
            if cost_active {
                let name = gamma(k);
                append_evolution(
                    &mut circuit,
                    &cost,
                    ParameterExpression::symbol(name.clone()),
                    &qubits,
                    "cost",
                )?;
                parameters.push(name);
            }
            parameters.extend(layer.append(&mut circuit, &qubits, k)?);
            if k + 1 < self.reps {
                self.barrier(&mut circuit, &qubits)?;
            }
        }

        debug!(
            qubits = n,
            parameters = parameters.len(),
            ops = circuit.num_ops(),
            cost_active,
            "built ansatz"
        );
        Ok(SubsystemAnsatz {
            circuit,
            parameters,
            cost,
            reps: self.reps,
        })
    }

    fn barrier(&self, circuit: &mut Circuit, qubits: &[QubitId]) -> QaoaResult<()> {
        if self.insert_barriers {
            circuit.barrier(qubits.iter().copied())?;
        }
        Ok(())
    }
}

/// Mixer prepared for repeated insertion.
enum MixerLayer {
    Skip,
    Operator(Operator),
    /// Template with parameters renamed to placeholders, and their count.
    Circuit(Circuit, usize),
}

impl MixerLayer {
    fn new(mixer: &Mixer) -> QaoaResult<Self> {
        if mixer.is_identity() {
            return Ok(Self::Skip);
        }
        Ok(match mixer {
            Mixer::Operator(op) => Self::Operator(op.clone()),
            Mixer::Circuit(c) => {
                let names = c.parameters();
                let mut template = c.clone();
                for (j, name) in names.iter().enumerate() {
                    template = template
                        .substitute_parameter(name, &ParameterExpression::symbol(placeholder(j)))?;
                }
                Self::Circuit(template, names.len())
            }
        })
    }

    /// Append repetition `k`, returning the new parameter names in order.
    fn append(&self, circuit: &mut Circuit, qubits: &[QubitId], k: usize) -> QaoaResult<Vec<String>> {
        match self {
            Self::Skip => Ok(Vec::new()),
            Self::Operator(op) => {
                let name = beta(k);
                append_evolution(
                    circuit,
                    op,
                    ParameterExpression::symbol(name.clone()),
                    qubits,
                    "mixer",
                )?;
                Ok(vec![name])
            }
            Self::Circuit(template, p) => {
                let mut layer = template.clone();
                let mut names = Vec::with_capacity(*p);
                for j in 0..*p {
                    let name = beta(k * p + j);
                    layer = layer.substitute_parameter(
                        &placeholder(j),
                        &ParameterExpression::symbol(name.clone()),
                    )?;
                    names.push(name);
                }
                circuit.compose(&layer, Some(qubits))?;
                Ok(names)
            }
        }
    }
}

fn placeholder(j: usize) -> String {
    format!("__mixer_{j}")
}

#[allow(clippy::cast_possible_truncation)]
fn hadamard_layer(n: usize) -> QaoaResult<Circuit> {
    let mut circuit = Circuit::with_size("initial_state", n as u32, 0);
    for q in 0..n {
        circuit.h(QubitId(q as u32))?;
    }
    Ok(circuit)
}

/// A built QAOA ansatz.
///
/// The circuit is symbolic; [`bind`](Self::bind) produces bound copies.
#[derive(Debug, Clone)]
pub struct SubsystemAnsatz {
    circuit: Circuit,
    parameters: Vec<String>,
    cost: Operator,
    reps: usize,
}

impl SubsystemAnsatz {
    /// Start a builder.
    pub fn builder() -> AnsatzBuilder {
        AnsatzBuilder::default()
    }

    /// The symbolic circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Parameter names in canonical order.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Number of free parameters.
    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// The cost operator at the full ansatz width.
    pub fn cost(&self) -> &Operator {
        &self.cost
    }

    /// Ansatz width.
    pub fn num_qubits(&self) -> usize {
        self.circuit.num_qubits()
    }

    /// Number of repetitions.
    pub fn reps(&self) -> usize {
        self.reps
    }

    /// Bind `values`, given in canonical order.
    pub fn bind(&self, values: &[f64]) -> QaoaResult<Circuit> {
        if values.len() != self.parameters.len() {
            return Err(QaoaError::ParameterCountMismatch {
                expected: self.parameters.len(),
                got: values.len(),
            });
        }
        let map: FxHashMap<String, f64> = self
            .parameters
            .iter()
            .cloned()
            .zip(values.iter().copied())
            .collect();
        Ok(self.circuit.bind_parameters(&map)?)
    }
}
