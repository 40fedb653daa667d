//! Controlled ripple-carry addition of a classical weight.
//!
//! `sum ← (sum + w·q) mod 2^m` for an item qubit `q`. A forward pass over
//! the bits of `w` writes the new sum while computing carries; a reverse pass
//! clears every carry that is not consumed by a higher bit. Three-control
//! NOTs go through [`Circuit::mcx_vchain`] with the `control` ancilla as
//! scratch.

use qtg_ir::{Circuit, QubitId};

use crate::error::{CoreError, CoreResult};
use crate::layout::RegisterLayout;

/// Adder over a fixed sum register and its ancillas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedAdder {
    sum: Vec<QubitId>,
    carry: Vec<QubitId>,
    control: Option<QubitId>,
}

impl WeightedAdder {
    /// Create an adder over explicit registers.
    ///
    /// `carry` must hold `m − 1` qubits and a `control` qubit is required
    /// once `m > 2`.
    pub fn new(sum: Vec<QubitId>, carry: Vec<QubitId>, control: Option<QubitId>) -> CoreResult<Self> {
        let m = sum.len();
        if m == 0 {
            return Err(CoreError::InvalidLayout("sum register is empty".into()));
        }
        if carry.len() != m - 1 {
            return Err(CoreError::InvalidLayout(format!(
                "{m}-bit sum needs {} carry qubits, got {}",
                m - 1,
                carry.len()
            )));
        }
        if m > 2 && control.is_none() {
            return Err(CoreError::InvalidLayout(format!(
                "{m}-bit sum needs a control ancilla"
            )));
        }
        Ok(Self { sum, carry, control })
    }

    /// The adder over a generator layout.
    pub fn from_layout(layout: &RegisterLayout) -> Self {
        Self {
            sum: layout.sum_qubits(),
            carry: layout.carry_qubits(),
            control: layout.control_qubits().first().copied(),
        }
    }

    /// Width `m` of the sum register.
    pub fn width(&self) -> usize {
        self.sum.len()
    }

    /// Append `sum += weight` controlled on `item`.
    ///
    /// Only the low `m` bits of `weight` matter; a zero weight emits nothing.
    pub fn append(&self, circuit: &mut Circuit, item: QubitId, weight: u64) -> CoreResult<()> {
        if weight == 0 {
            return Ok(());
        }
        let m = self.width();
        let top = m - 1;
        let bits: Vec<bool> = (0..m).map(|j| j < 64 && (weight >> j) & 1 == 1).collect();
        let s = &self.sum;
        let c = &self.carry;

        // Forward pass
        for (j, &bit) in bits.iter().enumerate() {
            match (bit, j) {
                (true, _) if m == 1 => {
                    circuit.cx(item, s[0])?;
                }
                (true, 0) => {
                    circuit.ccx(item, s[0], c[0])?.cx(item, s[0])?;
                }
                (true, j) if j == top => {
                    circuit.cx(item, s[j])?.ccx(item, c[j - 1], s[j])?;
                }
                (true, j) => {
                    circuit.x(s[j])?.x(c[j - 1])?;
                    self.carry_out(circuit, item, j)?;
                    circuit
                        .cx(item, c[j])?
                        .x(s[j])?
                        .x(c[j - 1])?
                        .cx(item, s[j])?
                        .ccx(item, c[j - 1], s[j])?;
                }
                (false, 0) => {}
                (false, j) if j == top => {
                    circuit.ccx(item, c[j - 1], s[j])?;
                }
                (false, j) => {
                    self.carry_out(circuit, item, j)?;
                    circuit.ccx(item, c[j - 1], s[j])?;
                }
            }
        }

        // Reverse pass: clear carries below the top bit
        for (j, &bit) in bits.iter().enumerate().rev() {
            if j == top {
                continue;
            }
            match (bit, j) {
                (true, 0) => {
                    circuit.x(s[0])?.ccx(item, s[0], c[0])?.x(s[0])?;
                }
                (true, j) => {
                    circuit.x(c[j - 1])?;
                    self.carry_out(circuit, item, j)?;
                    circuit.cx(item, c[j])?.x(c[j - 1])?;
                }
                (false, 0) => {}
                (false, j) => {
                    circuit.x(s[j])?;
                    self.carry_out(circuit, item, j)?;
                    circuit.x(s[j])?;
                }
            }
        }
        Ok(())
    }

    /// `c_j ^= q · s_j · c_{j−1}` for `0 < j < m − 1`.
    fn carry_out(&self, circuit: &mut Circuit, item: QubitId, j: usize) -> CoreResult<()> {
        let scratch: Vec<QubitId> = self.control.into_iter().collect();
        circuit.mcx_vchain(
            &[item, self.sum[j], self.carry[j - 1]],
            self.carry[j],
            &scratch,
        )?;
        Ok(())
    }
}
