//! Biased single-qubit rotations.
//!
//! For bias strength `b ≥ 0` and guide bit `y`:
//!
//! ```text
//! H_b(0) = 1/√(b+2) · [[√(1+b),  1      ],
//!                      [1,       −√(1+b)]]
//!
//! H_b(1) = 1/√(b+2) · [[1,       √(1+b) ],
//!                      [√(1+b),  −1     ]]
//! ```
//!
//! Both are `Ry(2θ)·Z` with `θ₀ = atan2(1, √(1+b))` and
//! `θ₁ = atan2(√(1+b), 1)`. `b = 0` gives the Hadamard gate for either bit;
//! large `b` sends |0⟩ towards |y⟩.

use serde::{Deserialize, Serialize};

use qtg_compile::Unitary2x2;
use qtg_ir::{Circuit, IrResult, QubitId};

use crate::error::{CoreError, CoreResult};

/// Guide bitstring and bias strength for the tree generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasAnsatz {
    y: Vec<bool>,
    strength: f64,
}

impl BiasAnsatz {
    /// Create a bias ansatz, rejecting negative or non-finite strengths.
    pub fn new(y: Vec<bool>, strength: f64) -> CoreResult<Self> {
        if !strength.is_finite() || strength < 0.0 {
            return Err(CoreError::InvalidBiasStrength(strength));
        }
        Ok(Self { y, strength })
    }

    /// The unbiased ansatz `y = 0…0`, `b = 0`.
    pub fn unbiased(n: usize) -> Self {
        Self {
            y: vec![false; n],
            strength: 0.0,
        }
    }

    /// Parse the guide from a `0`/`1` string, character `i` = item `i`.
    pub fn from_bitstring(bits: &str, strength: f64) -> CoreResult<Self> {
        let y = bits
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(CoreError::InvalidCharacter {
                    bitstring: bits.to_string(),
                    character: other,
                }),
            })
            .collect::<CoreResult<Vec<_>>>()?;
        Self::new(y, strength)
    }

    /// The guide bits.
    pub fn y(&self) -> &[bool] {
        &self.y
    }

    /// The bias strength `b`.
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Number of guide bits.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// True if there are no guide bits.
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// The rotation for item `i`.
    pub fn rotation(&self, i: usize) -> BiasedRotation {
        BiasedRotation::new(self.strength, self.y.get(i).copied().unwrap_or(false))
    }
}

/// One member of the biased rotation family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasedRotation {
    strength: f64,
    bit: bool,
}

impl BiasedRotation {
    /// Rotation with strength `b` guided towards `bit`.
    pub fn new(strength: f64, bit: bool) -> Self {
        Self { strength, bit }
    }

    /// Half-angle `θ` of the `Ry(2θ)·Z` form.
    pub fn theta(&self) -> f64 {
        let r = (1.0 + self.strength).sqrt();
        if self.bit { r.atan2(1.0) } else { 1.0f64.atan2(r) }
    }

    /// The 2×2 matrix.
    pub fn matrix(&self) -> Unitary2x2 {
        let norm = (self.strength + 2.0).sqrt();
        let r = (1.0 + self.strength).sqrt() / norm;
        let one = 1.0 / norm;
        if self.bit {
            Unitary2x2::real(one, r, r, -one)
        } else {
            Unitary2x2::real(r, one, one, -r)
        }
    }

    /// Append the uncontrolled rotation to `target`.
    pub fn append(&self, circuit: &mut Circuit, target: QubitId) -> IrResult<()> {
        circuit.z(target)?.ry(2.0 * self.theta(), target)?;
        Ok(())
    }

    /// Append the rotation on `target`, active only when `control` is |1⟩.
    pub fn append_controlled(
        &self,
        circuit: &mut Circuit,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<()> {
        circuit
            .cz(control, target)?
            .cry(2.0 * self.theta(), control, target)?;
        Ok(())
    }
}
