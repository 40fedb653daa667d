//! Grover-style mixer around a state-preparation circuit.
//!
//! `U_M(β) = G · R(β) · G†`, where `G` prepares the feasible superposition
//! |F⟩ from |0…0⟩ and `R(β)` puts a phase `e^{−iβ}` on the all-zero state of
//! the item qubits. On states whose ancillas are clean this is
//! `1 − (1 − e^{−iβ})|F⟩⟨F|`, which never leaves the feasible subspace.

use tracing::debug;

use qtg_core::QuantumTreeGenerator;
use qtg_ir::{Circuit, ParameterExpression, QubitId};

use crate::error::{QaoaError, QaoaResult};

/// Name of the free parameter of [`GroverMixer::circuit`].
pub const GROVER_PARAMETER: &str = "β";

/// Mixer `G·R(β)·G†` for a preparation circuit `G`.
#[derive(Debug, Clone)]
pub struct GroverMixer {
    preparation: Circuit,
    items: Vec<QubitId>,
}

impl GroverMixer {
    /// Mixer around the lowered tree generator.
    pub fn new(qtg: &QuantumTreeGenerator) -> QaoaResult<Self> {
        Self::from_preparation(qtg.build_lowered()?, qtg.item_qubits())
    }

    /// Mixer around any parameter-free preparation circuit; `items` are the
    /// qubits the reflection acts on.
    pub fn from_preparation(preparation: Circuit, items: Vec<QubitId>) -> QaoaResult<Self> {
        if items.is_empty() || items.len() > preparation.num_qubits() {
            return Err(QaoaError::TooManyItems {
                n_items: items.len(),
                total_qubits: preparation.num_qubits(),
            });
        }
        if preparation.is_parameterized() {
            return Err(QaoaError::InvalidConfig(
                "preparation circuit must not have free parameters".into(),
            ));
        }
        Ok(Self { preparation, items })
    }

    /// Total width, items and ancillas.
    pub fn num_qubits(&self) -> usize {
        self.preparation.num_qubits()
    }

    /// Qubits the reflection acts on.
    pub fn items(&self) -> &[QubitId] {
        &self.items
    }

    /// The preparation circuit `G`.
    pub fn preparation(&self) -> &Circuit {
        &self.preparation
    }

    /// The reflection `R(β)` alone.
    pub fn reflection(&self) -> QaoaResult<Circuit> {
        let mut circuit = self.preparation.empty_like().with_name("reflection");
        self.append_reflection(&mut circuit)?;
        Ok(circuit)
    }

    fn append_reflection(&self, circuit: &mut Circuit) -> QaoaResult<()> {
        let angle = -ParameterExpression::symbol(GROVER_PARAMETER);
        let (target, controls) = match self.items.split_last() {
            Some((t, c)) => (*t, c),
            None => return Ok(()),
        };
        for &q in &self.items {
            circuit.x(q)?;
        }
        circuit.mcp(angle, controls, target)?;
        for &q in &self.items {
            circuit.x(q)?;
        }
        Ok(())
    }

    /// Mixer circuit with one free parameter `β`, in time order `G†`,
    /// `R(β)`, `G`.
    pub fn circuit(&self) -> QaoaResult<Circuit> {
        let mut circuit = self.preparation.empty_like().with_name("qtg_mixer");
        circuit.compose(&self.preparation.inverse()?, None)?;
        self.append_reflection(&mut circuit)?;
        circuit.compose(&self.preparation, None)?;
        debug!(
            qubits = circuit.num_qubits(),
            items = self.items.len(),
            ops = circuit.num_ops(),
            "built grover mixer"
        );
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_item_reflection_is_phase() {
        let qtg = QuantumTreeGenerator::new(&[1], 1).unwrap();
        let mixer = GroverMixer::new(&qtg).unwrap();
        let r = mixer.reflection().unwrap();
        let ops = r.count_ops();
        assert_eq!(ops.get("p"), Some(&1));
        assert_eq!(ops.get("x"), Some(&2));
    }

    #[test]
    fn test_reflection_touches_items_only() {
        let qtg = QuantumTreeGenerator::new(&[1, 2, 3], 3).unwrap();
        let mixer = GroverMixer::new(&qtg).unwrap();
        let items = qtg.item_qubits();
        for inst in mixer.reflection().unwrap().instructions() {
            assert!(inst.qubits.iter().all(|q| items.contains(q)));
        }
    }

    #[test]
    fn test_single_parameter() {
        let qtg = QuantumTreeGenerator::new(&[2, 1], 2).unwrap();
        let circuit = GroverMixer::new(&qtg).unwrap().circuit().unwrap();
        assert_eq!(circuit.parameters(), vec![GROVER_PARAMETER.to_string()]);
        assert_eq!(circuit.num_qubits(), qtg.num_qubits());
        assert!(!circuit.count_ops().contains_key("cmp"));
    }

    #[test]
    fn test_rejects_parameterized_preparation() {
        let mut prep = Circuit::with_size("p", 2, 0);
        prep.ry(ParameterExpression::symbol("θ"), QubitId(0)).unwrap();
        assert!(GroverMixer::from_preparation(prep, vec![QubitId(0)]).is_err());
    }
}
