//! Register layout of the tree generator.
//!
//! Qubits are laid out in one flat array, in this order:
//!
//! | Register | Size | Role |
//! |----------|------|------|
//! | `state` | n | one qubit per item |
//! | `sum` | m | running weight, least significant bit first |
//! | `carry` | m − 1 | ripple-carry ancillas |
//! | `control` | 1 if m > 2 | scratch for three-control NOTs |
//! | `flag` | 1 | comparator output |
//!
//! with `m = ⌊log₂ max(1, Σw)⌋ + 1`, the number of bits of the total weight.
//! Every ancilla is |0⟩ before and after the generator.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use qtg_ir::{Circuit, QubitId};

/// Register names, in allocation order.
pub const REGISTERS: [&str; 5] = ["state", "sum", "carry", "control", "flag"];

/// Named, disjoint qubit ranges for one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterLayout {
    state: Range<u32>,
    sum: Range<u32>,
    carry: Range<u32>,
    control: Range<u32>,
    flag: u32,
    capacity: u64,
}

/// Number of bits needed to hold `total`, at least one.
pub fn sum_width(total: u64) -> u32 {
    u64::BITS - total.max(1).leading_zeros()
}

impl RegisterLayout {
    /// Compute the layout for a weight vector and capacity.
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(weights: &[u64], capacity: u64) -> Self {
        let n = weights.len() as u32;
        let total = weights.iter().fold(0u64, |acc, w| acc.saturating_add(*w));
        let m = sum_width(total);
        let controls = u32::from(m > 2);

        let state = 0..n;
        let sum = n..n + m;
        let carry = sum.end..sum.end + m - 1;
        let control = carry.end..carry.end + controls;
        let flag = control.end;
        Self {
            state,
            sum,
            carry,
            control,
            flag,
            capacity,
        }
    }

    /// Add the five registers to `circuit`, in layout order.
    ///
    /// The circuit must be empty so that register offsets match the layout.
    pub fn allocate(&self, circuit: &mut Circuit) {
        circuit.add_qreg("state", self.num_items() as u32);
        circuit.add_qreg("sum", self.sum_width());
        circuit.add_qreg("carry", range_len(&self.carry));
        circuit.add_qreg("control", range_len(&self.control));
        circuit.add_qreg("flag", 1);
    }

    /// Total number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.flag as usize + 1
    }

    /// Number of items.
    pub fn num_items(&self) -> usize {
        range_len(&self.state) as usize
    }

    /// Width `m` of the sum register.
    pub fn sum_width(&self) -> u32 {
        range_len(&self.sum)
    }

    /// Capacity the layout was computed for.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Item qubits; `state_qubits()[i]` is item `i`.
    pub fn state_qubits(&self) -> Vec<QubitId> {
        ids(&self.state)
    }

    /// Sum register, least significant bit first.
    pub fn sum_qubits(&self) -> Vec<QubitId> {
        ids(&self.sum)
    }

    /// Carry ancillas.
    pub fn carry_qubits(&self) -> Vec<QubitId> {
        ids(&self.carry)
    }

    /// The control ancilla, empty when `m ≤ 2`.
    pub fn control_qubits(&self) -> Vec<QubitId> {
        ids(&self.control)
    }

    /// The comparator flag.
    pub fn flag_qubit(&self) -> QubitId {
        QubitId(self.flag)
    }

    /// Every ancilla: carry, control and flag.
    pub fn ancilla_qubits(&self) -> Vec<QubitId> {
        let mut v = self.carry_qubits();
        v.extend(self.control_qubits());
        v.push(self.flag_qubit());
        v
    }

    /// Mask over basis indices selecting the ancilla bits.
    ///
    /// Basis indices are 64 bits wide; ancillas past bit 63 are left out.
    pub fn ancilla_mask(&self) -> u64 {
        self.ancilla_qubits()
            .iter()
            .fold(0, |m, q| m | bit(q.0))
    }

    /// Item bits of a basis index, as an integer with item `i` in bit `i`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn items_of(&self, index: u64) -> u64 {
        index & low_mask(self.num_items() as u32)
    }

    /// Value held in the sum register of a basis index.
    pub fn sum_of(&self, index: u64) -> u64 {
        index.checked_shr(self.sum.start).unwrap_or(0) & low_mask(self.sum_width())
    }

    /// Item bits of a basis index as a bitstring, character `i` = item `i`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn bitstring_of(&self, index: u64) -> String {
        (0..self.num_items())
            .map(|i| if index & bit(i as u32) != 0 { '1' } else { '0' })
            .collect()
    }

    /// `(name, qubits)` for each register, in layout order.
    pub fn registers(&self) -> Vec<(&'static str, Vec<QubitId>)> {
        vec![
            (REGISTERS[0], self.state_qubits()),
            (REGISTERS[1], self.sum_qubits()),
            (REGISTERS[2], self.carry_qubits()),
            (REGISTERS[3], self.control_qubits()),
            (REGISTERS[4], vec![self.flag_qubit()]),
        ]
    }
}

fn bit(q: u32) -> u64 {
    1u64.checked_shl(q).unwrap_or(0)
}

fn low_mask(width: u32) -> u64 {
    if width >= 64 { u64::MAX } else { (1u64 << width) - 1 }
}

fn range_len(range: &Range<u32>) -> u32 {
    range.end - range.start
}

fn ids(range: &Range<u32>) -> Vec<QubitId> {
    range.clone().map(QubitId).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_width() {
        assert_eq!(sum_width(0), 1);
        assert_eq!(sum_width(1), 1);
        assert_eq!(sum_width(2), 2);
        assert_eq!(sum_width(3), 2);
        assert_eq!(sum_width(4), 3);
        assert_eq!(sum_width(6), 3);
        assert_eq!(sum_width(7), 3);
        assert_eq!(sum_width(8), 4);
    }

    #[test]
    fn test_layout_small() {
        // Σw = 3 → m = 2, no control ancilla
        let layout = RegisterLayout::new(&[1, 2], 2);
        assert_eq!(layout.state_qubits(), vec![QubitId(0), QubitId(1)]);
        assert_eq!(layout.sum_qubits(), vec![QubitId(2), QubitId(3)]);
        assert_eq!(layout.carry_qubits(), vec![QubitId(4)]);
        assert!(layout.control_qubits().is_empty());
        assert_eq!(layout.flag_qubit(), QubitId(5));
        assert_eq!(layout.num_qubits(), 6);
    }

    #[test]
    fn test_layout_with_control() {
        // Σw = 6 → m = 3
        let layout = RegisterLayout::new(&[1, 2, 3], 2);
        assert_eq!(layout.sum_width(), 3);
        assert_eq!(layout.carry_qubits().len(), 2);
        assert_eq!(layout.control_qubits(), vec![QubitId(8)]);
        assert_eq!(layout.flag_qubit(), QubitId(9));
        assert_eq!(layout.num_qubits(), 10);
        assert_eq!(layout.ancilla_mask(), 0b11_1100_0000);
    }

    #[test]
    fn test_zero_weights_keep_one_sum_bit() {
        let layout = RegisterLayout::new(&[0, 0], 0);
        assert_eq!(layout.sum_width(), 1);
        assert!(layout.carry_qubits().is_empty());
        assert_eq!(layout.num_qubits(), 4);
    }

    #[test]
    fn test_allocate_matches_layout() {
        let layout = RegisterLayout::new(&[3, 4, 5], 6);
        let mut circuit = Circuit::new("qtg");
        layout.allocate(&mut circuit);
        assert_eq!(circuit.num_qubits(), layout.num_qubits());
        for (name, qubits) in layout.registers() {
            assert_eq!(circuit.qreg(name), qubits, "register {name}");
        }
    }

    #[test]
    fn test_index_decoding() {
        let layout = RegisterLayout::new(&[1, 2], 2);
        // items 10 (item 0 chosen), sum = 1
        let index = 0b0001 | (1 << 2);
        assert_eq!(layout.bitstring_of(index), "10");
        assert_eq!(layout.items_of(index), 1);
        assert_eq!(layout.sum_of(index), 1);
    }

    #[test]
    fn test_wide_layout_masks() {
        // 70 items of weight 1: Σw = 70 → m = 7, qubits 0..70 hold items
        let layout = RegisterLayout::new(&[1; 70], 35);
        assert!(layout.num_qubits() > 64);
        assert_eq!(layout.ancilla_mask(), 0);
        assert_eq!(layout.items_of(u64::MAX), u64::MAX);
        assert_eq!(layout.sum_of(u64::MAX), 0);

        let bits = layout.bitstring_of(0b101);
        assert_eq!(bits.len(), 70);
        assert!(bits.starts_with("101"));
        assert!(bits[3..].chars().all(|c| c == '0'));
    }
}
